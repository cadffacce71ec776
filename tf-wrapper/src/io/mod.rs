//! I/O helpers for the wrapper stages.

pub mod archive;
pub mod config;
pub mod download;
pub mod env;
pub mod executor;
pub mod process;
pub mod resolver;
