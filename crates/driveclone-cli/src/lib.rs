//! # driveclone-cli
//!
//! The `driveclone` command line: clap command definitions, terminal
//! confirmation, and table/JSON output. The binary in the workspace root
//! loads configuration, installs logging, and hands off to [`Cli::execute`].

pub mod commands;
pub mod confirm;
pub mod output;

pub use commands::Cli;
