//! Core module - catalog, naming, run context, configuration and layout

pub mod catalog;
pub mod config;
pub mod context;
pub mod layout;
pub mod naming;

pub use catalog::{Catalog, CatalogError, Theme};
pub use config::{ConfigError, GeneratorConfig};
pub use context::GenerationContext;
pub use layout::{AdminDocument, ArtifactName};
