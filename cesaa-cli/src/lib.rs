//! # cesaa-cli
//!
//! Command-line front end for the chat history queries: argument parsing, config overrides and
//! output formatting.

pub mod cli;
pub mod output;

pub use cli::{load_config, Cli, Commands, QueryArgs};
