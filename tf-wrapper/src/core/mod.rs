//! Pure, deterministic logic for the wrapper.
//!
//! Nothing here touches the filesystem, network, or child processes.

pub mod credentials;
pub mod menu;
pub mod platform;
pub mod step;
