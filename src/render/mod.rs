//! Theme template loading and rendering.

mod cache;
mod helpers;

pub use cache::*;
pub use helpers::*;

/// Template rendered when a page handler fails.
pub const ERROR_TEMPLATE: &str = "error.html";
