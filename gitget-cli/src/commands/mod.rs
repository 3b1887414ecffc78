//! CLI command implementations

pub mod get;
pub mod list;
pub mod status;

pub use get::{GetArgs, PathArgs};
pub use list::ListArgs;
pub use status::StatusArgs;
