//! The interactive per-album review loop.
//!
//! Each line typed at the prompt is resolved to a command through a fixed
//! table of exact keywords and then of prefixes; [`Session`] applies it to
//! the album under review.

mod command;
mod range;
mod session;

pub use session::{ReviewOptions, Session};
