//! Text normalization for tag values and file names.
//!
//! `Sanitizer` applies the configured character replacement tables and the
//! word capitalization rules; `sanitize_number` cleans numeric tags.

pub mod roman;
mod sanitize;

pub use sanitize::*;

#[cfg(test)]
mod tests;
