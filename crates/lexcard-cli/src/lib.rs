//! Lexcard CLI library.
//!
//! Argument parsing, profile configuration, command execution and output
//! formatting for the `lexcard` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
