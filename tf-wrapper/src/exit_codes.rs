//! Stable exit codes for the wrapper binary.

/// Menu exited normally or the flag-mode action succeeded.
pub const OK: i32 = 0;
/// Any fatal condition: conflicting flags, resolve/config/log failures,
/// failed `init`, or a failed flag-mode action.
pub const FATAL: i32 = 1;
