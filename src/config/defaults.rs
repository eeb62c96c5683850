//! Default values for configuration options.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

/// Default HTTP method for requests.
pub const METHOD: &str = "GET";

/// Default decoding target printed by the binary.
pub const DECODE: &str = "text";

/// Default config file written by `bastion init`.
pub const CONFIG_FILE: &str = "bastion.toml";

/// Lowest accepted expected status code.
pub const MIN_STATUS: u16 = 100;

/// Highest accepted expected status code.
pub const MAX_STATUS: u16 = 999;
