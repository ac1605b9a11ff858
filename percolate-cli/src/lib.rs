//! Driver surface for the percolate simulation engine.
//!
//! The library half of the CLI: argument types, command execution, and CSV
//! rendering live here so they can be exercised in tests without spawning a
//! process. The binary in `main.rs` only parses arguments, initialises
//! logging, and maps errors to exit codes.

pub mod cli;
pub mod logging;
