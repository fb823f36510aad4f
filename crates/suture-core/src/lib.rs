//! Core data structures and error types for suture (pure Rust)

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod coo;
pub mod error;
pub mod partial;

pub use coo::Coo;
pub use error::{Error, Result};
pub use partial::RowPartial;
