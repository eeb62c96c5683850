//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the binary. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use http::Method;
use http::header::{HeaderName, HeaderValue};
use url::Url;

use crate::decode::TargetKind;
use crate::request::{ApiRequest, ContentType};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the binary.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// The request to execute
    pub request: ApiRequest,

    /// Acceptable status codes; empty accepts any status
    pub expect_status: Vec<u16>,

    /// How the response body is decoded
    pub decode: TargetKind,

    /// Transport timeout, if any
    pub timeout: Option<Duration>,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let timeout_str = self
            .timeout
            .map_or_else(|| "none".to_string(), |t| format!("{}s", t.as_secs()));

        write!(
            f,
            "Config {{ url: {}, method: {}, headers: {}, query: {}, body: {}, \
             expect_status: {:?}, decode: {}, timeout: {} }}",
            self.request.url(),
            self.request.method(),
            self.request.headers().len(),
            self.request.query_params().len(),
            self.request.body().map_or(0, str::len),
            self.expect_status,
            self.decode,
            timeout_str,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL is missing or invalid
    /// - The method is not a valid HTTP token
    /// - A header or query parameter is malformed
    /// - The timeout is zero
    /// - An expected status is outside 100..=999
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let url = Self::resolve_url(cli, toml)?;
        let method = Self::resolve_method(cli, toml)?;

        let mut request = ApiRequest::new(method, url);

        for (name, value) in Self::resolve_headers(cli, toml)? {
            request = request.with_header(name, value);
        }

        for (name, value) in Self::resolve_query(cli, toml)? {
            request = request.with_query_param(name, value);
        }

        if let Some(content_type) = Self::resolve_content_type(cli, toml)? {
            request = request.with_content_type(content_type);
        }

        let body = cli
            .body
            .clone()
            .or_else(|| toml.and_then(|t| t.request.body.clone()));
        if let Some(body) = body {
            request = request.with_body(body);
        }

        Ok(Self {
            request,
            expect_status: Self::resolve_expect_status(cli, toml)?,
            decode: Self::resolve_decode(cli, toml)?,
            timeout: Self::resolve_timeout(cli, toml)?,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let url_str = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.request.url.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(field::URL, "Use --url or set request.url in config file")
            })?;

        Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        Ok(url_str.to_string())
    }

    fn resolve_method(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Method, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let method_str = cli
            .method
            .as_deref()
            .or_else(|| toml.and_then(|t| t.request.method.as_deref()))
            .unwrap_or(defaults::METHOD);

        method_str
            .parse::<Method>()
            .map_err(|_| ConfigError::InvalidMethod(method_str.to_string()))
    }

    fn resolve_headers(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Vec<(String, String)>, ConfigError> {
        let pairs = if cli.headers.is_empty() {
            toml.map(|t| t.request.headers.clone()).unwrap_or_default()
        } else {
            cli.headers
                .iter()
                .map(String::as_str)
                .map(parse_header_string)
                .collect::<Result<Vec<_>, _>>()?
        };

        for (name, value) in &pairs {
            parse_header_name(name)?;
            parse_header_value(name, value)?;
        }

        Ok(pairs)
    }

    fn resolve_query(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Vec<(String, String)>, ConfigError> {
        if cli.query.is_empty() {
            return Ok(toml.map(|t| t.request.query.clone()).unwrap_or_default());
        }

        cli.query
            .iter()
            .map(String::as_str)
            .map(parse_query_string)
            .collect()
    }

    fn resolve_content_type(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<ContentType>, ConfigError> {
        let content_type = cli
            .content_type
            .as_deref()
            .or_else(|| toml.and_then(|t| t.request.content_type.as_deref()));

        let Some(value) = content_type else {
            return Ok(None);
        };

        parse_header_value("Content-Type", value)?;
        Ok(Some(ContentType::new(value)))
    }

    fn resolve_expect_status(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Vec<u16>, ConfigError> {
        let codes = if cli.expect_status.is_empty() {
            toml.map(|t| t.expect.status.clone()).unwrap_or_default()
        } else {
            cli.expect_status.clone()
        };

        if let Some(&code) = codes
            .iter()
            .find(|code| !(defaults::MIN_STATUS..=defaults::MAX_STATUS).contains(*code))
        {
            return Err(ConfigError::InvalidStatus(code));
        }

        Ok(codes)
    }

    fn resolve_decode(cli: &Cli, toml: Option<&TomlConfig>) -> Result<TargetKind, ConfigError> {
        if let Some(decode) = cli.decode {
            return Ok(decode.into());
        }

        let decode_str = toml
            .and_then(|t| t.expect.decode.as_deref())
            .unwrap_or(defaults::DECODE);

        parse_decode(decode_str)
    }

    fn resolve_timeout(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<Duration>, ConfigError> {
        let Some(seconds) = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.client.timeout))
        else {
            return Ok(None);
        };

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Some(Duration::from_secs(seconds)))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_decode(s: &str) -> Result<TargetKind, ConfigError> {
    match s.to_lowercase().as_str() {
        "text" => Ok(TargetKind::Text),
        "json" | "structured" => Ok(TargetKind::Structured),
        _ => Err(ConfigError::InvalidDecode(s.to_string())),
    }
}

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // Try "Key=Value" format first
    if let Some((name, value)) = s.split_once('=') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    // Try "Key: Value" format
    if let Some((name, value)) = s.split_once(':') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    Err(ConfigError::InvalidHeader {
        value: s.to_string(),
    })
}

fn parse_query_string(s: &str) -> Result<(String, String), ConfigError> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(ConfigError::InvalidQuery {
            value: s.to_string(),
        }),
    }
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
