//! I/O adapters: processes, git, and the files the CLI reads.

pub mod editor;
pub mod git;
pub mod gitconfig;
pub mod locator;
pub mod process;
pub mod registry;
pub mod settings;
