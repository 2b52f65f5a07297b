//! Git identity switcher and prompt status renderer.
//!
//! Identifies which registered identity (name, email, ssh key) is active in
//! the current repository, switches between identities, and renders a compact
//! repository status for shell prompts. The architecture keeps a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (config parsing, identity
//!   resolution, git output parsing, prompt rendering). No I/O.
//! - **[`io`]**: Side-effecting operations (process execution, git, files).
//!   Process execution sits behind [`io::process::CommandRunner`] so tests can
//!   script git output.
//!
//! Orchestration modules ([`session`], [`status`], [`identity`], [`prompt`])
//! coordinate core logic with I/O to implement CLI commands.

pub mod core;
pub mod exit_codes;
pub mod identity;
pub mod io;
pub mod logging;
pub mod prompt;
pub mod session;
pub mod status;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
