//! # CLI Layer
//!
//! This module is **one possible UI client** for bookfy, not the application itself.
//!
//! It is the only place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Installs the `tracing` subscriber
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - [`setup`]: clap definitions
//! - [`commands`]: `run()`, context setup and per-command handlers
//! - [`print`]: Output formatting functions

mod commands;
mod print;
mod setup;

pub use commands::run;
