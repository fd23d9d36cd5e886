//! # Commons Shared
//!
//! Common types used across the permission crates.

pub mod error;
pub mod role;
pub mod module;
pub mod capability;
pub mod config;

// Re-exports
pub use error::*;
pub use role::*;
pub use module::*;
pub use capability::*;
pub use config::*;
