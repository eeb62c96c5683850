//! Configuration layer for the `bastion` binary.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The only required field is `url`.
//!
//! For list options (`headers`, `query`, `expect.status`), a non-empty CLI list
//! **replaces** the TOML list entirely (not merged).
//!
//! The timeout is handed to the transport as is; the core never interprets it.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;
#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, DecodeArg};
pub use error::{ConfigError, field};
pub use toml::{ClientSection, ExpectSection, RequestSection, TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
