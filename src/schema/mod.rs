//! Schema module - Configuration and manifest types for the show viewer.

mod config;
mod manifest;

pub use config::*;
pub use manifest::*;
