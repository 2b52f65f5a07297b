//! Stable exit codes for the `gitusers` CLI.

/// Command succeeded (including "nothing to print" outcomes).
pub const OK: i32 = 0;
/// Environment error: missing executable, unreadable or malformed config.
pub const INVALID: i32 = 1;
/// `gitusers -g` found no registered identity in effect.
pub const NO_IDENTITY: i32 = 2;
