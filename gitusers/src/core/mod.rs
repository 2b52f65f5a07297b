//! Deterministic, pure logic shared by the CLI.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! strings and values and return deterministic outputs suitable for tests.

pub mod gitconfig;
pub mod render;
pub mod resolver;
pub mod status_parse;
pub mod types;
