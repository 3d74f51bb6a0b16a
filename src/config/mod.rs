//! Configuration module for the converter
//!
//! Provides types and parsing for `ldtk2tscn.toml` configuration.

pub mod loader;
pub mod schema;

pub use schema::*;
