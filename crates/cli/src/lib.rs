//! # Commons CLI
//!
//! Inspect the permission matrix and resolve effective permissions from the terminal.

pub mod commands;
pub mod context;
pub mod interactive;
pub mod render;
