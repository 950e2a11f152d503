//! Query helpers for page handlers: pagination and random sampling.

mod listing;
pub use listing::*;
