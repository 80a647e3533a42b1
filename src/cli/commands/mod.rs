//! CLI command implementations

pub mod audit;
pub mod completions;
pub mod generate;
pub mod themes;
