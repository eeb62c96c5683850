//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Request description
    #[serde(default)]
    pub request: RequestSection,

    /// Response expectations
    #[serde(default)]
    pub expect: ExpectSection,

    /// Transport configuration
    #[serde(default)]
    pub client: ClientSection,
}

/// Request configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestSection {
    /// Request URL
    pub url: Option<String>,

    /// HTTP method (default: GET)
    pub method: Option<String>,

    /// Content type of the body
    pub content_type: Option<String>,

    /// Request body
    pub body: Option<String>,

    /// Headers as ordered `["Name", "value"]` pairs; names may repeat
    #[serde(default)]
    pub headers: Vec<(String, String)>,

    /// Query parameters as ordered `["name", "value"]` pairs
    #[serde(default)]
    pub query: Vec<(String, String)>,
}

/// Expectation configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectSection {
    /// Acceptable status codes (empty = any)
    #[serde(default)]
    pub status: Vec<u16>,

    /// Decoding target: "text" or "json"
    pub decode: Option<String>,
}

/// Transport configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Bastion Configuration File

[request]
# Request URL (required)
# url = "https://api.example.com/sushi"

# HTTP method (default: GET, can be overridden by --method CLI flag)
# Supported: GET, POST, PUT, PATCH, DELETE, OPTIONS, HEAD
# method = "GET"

# Content type of the body (default: text/plain; charset=utf-8)
# content_type = "application/json"

# Request body, sent for POST, PUT, PATCH and DELETE only
# body = '{"name": "salmon"}'

# Headers as ordered pairs; the same name may appear more than once
# Note: CLI headers REPLACE these entirely (not merged)
# headers = [["Accept", "application/json"], ["X-Trace", "1"]]

# Query parameters as ordered pairs
# Note: CLI parameters REPLACE these entirely (not merged)
# query = [["page", "1"]]

[expect]
# Acceptable status codes (empty = any status passes)
# status = [200, 201]

# Decoding target: "text" or "json" (default: text)
# decode = "text"

[client]
# Request timeout in seconds (default: none)
# timeout = 30
"#
    .to_string()
}
