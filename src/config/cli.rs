//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::decode::TargetKind;

/// Bastion: send one HTTP request and decode the response
///
/// Executes the described request, decodes the body as text or JSON,
/// and checks the expected status codes.
#[derive(Debug, Parser)]
#[command(name = "bastion")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Request URL (required for run mode)
    #[arg(long)]
    pub url: Option<String>,

    /// HTTP method (default: GET)
    #[arg(long)]
    pub method: Option<String>,

    /// HTTP headers in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", value_name = "K=V")]
    pub headers: Vec<String>,

    /// Query parameters in 'Key=Value' format (can be specified multiple times)
    #[arg(long = "query", value_name = "K=V")]
    pub query: Vec<String>,

    /// Request body, sent for POST, PUT, PATCH and DELETE
    #[arg(long)]
    pub body: Option<String>,

    /// Content type of the request body
    #[arg(long = "content-type")]
    pub content_type: Option<String>,

    /// Acceptable response status (can be specified multiple times)
    #[arg(long = "expect-status", value_name = "CODE")]
    pub expect_status: Vec<u16>,

    /// How to decode the response body
    #[arg(long, value_enum)]
    pub decode: Option<DecodeArg>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for bastion
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = super::defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

/// Decoding target argument for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecodeArg {
    /// Print the body as text
    #[value(name = "text")]
    Text,
    /// Parse the body as JSON and pretty-print it
    #[value(name = "json")]
    Json,
}

impl From<DecodeArg> for TargetKind {
    fn from(arg: DecodeArg) -> Self {
        match arg {
            DecodeArg::Text => Self::Text,
            DecodeArg::Json => Self::Structured,
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
