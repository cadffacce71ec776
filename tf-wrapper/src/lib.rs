//! Operator-facing wrapper that provisions and drives Terraform.
//!
//! One invocation runs a fixed sequence of stages:
//!
//! - **[`io::resolver`]**: find `terraform` on `PATH` or in the working
//!   directory, or download and unzip the pinned release.
//! - **[`io::config`]**: load `wrapper.cfg` into an immutable key/value map.
//! - **[`io::env`]**: provision Dynatrace credentials for the child process.
//! - **[`dispatch`]**: run `init`, then a flag-mode action or the menu loop.
//!
//! **[`core`]** holds the pure pieces (platform naming, step arguments, menu
//! parsing, credential lists). **[`session`]** wires the stages together for
//! the binary.

pub mod cli;
pub mod core;
pub mod dispatch;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
