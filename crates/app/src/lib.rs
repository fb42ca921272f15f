//! Quay - command-line client for the container-terminal API
//!
//! The binary parses a [`cli::Cli`], builds a [`context::Quay`] from the
//! environment and runs one command through [`commands::run`].

pub mod cli;
pub mod commands;
pub mod context;
pub mod logging;
pub mod output;

pub use cli::{Cli, Command, OutputFormat};
pub use commands::run;
pub use context::Quay;
