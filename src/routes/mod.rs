pub mod common;
pub mod site;

pub use common::*;
pub use site::*;
