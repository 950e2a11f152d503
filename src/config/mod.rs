pub mod types;
pub mod loader;
pub mod validator;
pub mod store;

pub use types::*;
pub use loader::*;
pub use validator::*;
pub use store::*;
