//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema (replacement tables, format
//! lists, library location) and helpers to load it from disk.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
