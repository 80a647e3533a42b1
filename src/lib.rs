//! Testbed: synthetic aerospace test-program directory generator
//!
//! Produces project trees of purchase orders, quotes, specifications,
//! test logs, notices of deviation, data plots and hardware images that
//! look like a real hardware test program, for exercising document
//! indexing and report assembly tools. A companion auditor checks trees
//! against the same folder and filename conventions.

pub mod audit;
pub mod cli;
pub mod content;
pub mod core;
pub mod generator;
pub mod hardware;
pub mod plot;
pub mod raster;
pub mod render;
