//! Tests for validated configuration.

use std::time::Duration;

use http::Method;

use crate::decode::TargetKind;

use super::ConfigError;
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::{ValidatedConfig, write_default_config};

/// Helper to create CLI args from a slice
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["bastion"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

fn header_pairs(config: &ValidatedConfig) -> Vec<(&str, &str)> {
    config
        .request
        .headers()
        .iter()
        .map(|h| (h.name(), h.value()))
        .collect()
}

mod required_fields {
    use super::*;

    #[test]
    fn missing_url_returns_error() {
        let result = ValidatedConfig::from_raw(&cli(&[]), None);

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequired { field: "url", .. })
        ));
    }

    #[test]
    fn url_from_cli_with_defaults() {
        let config =
            ValidatedConfig::from_raw(&cli(&["--url", "https://example.com/sushi"]), None).unwrap();

        assert_eq!(config.request.url(), "https://example.com/sushi");
        assert_eq!(config.request.method(), &Method::GET);
        assert!(!config.request.has_explicit_content_type());
        assert!(config.request.body().is_none());
        assert!(config.expect_status.is_empty());
        assert_eq!(config.decode, TargetKind::Text);
        assert!(config.timeout.is_none());
    }

    #[test]
    fn url_from_toml() {
        let toml = toml(
            r#"
            [request]
            url = "https://example.com/from-toml"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.request.url(), "https://example.com/from-toml");
    }
}

mod cli_precedence {
    use super::*;

    #[test]
    fn cli_scalars_override_toml() {
        let cli = cli(&[
            "--url",
            "https://cli.example.com",
            "--method",
            "PUT",
            "--body",
            "from cli",
            "--decode",
            "json",
            "--timeout",
            "5",
        ]);
        let toml = toml(
            r#"
            [request]
            url = "https://toml.example.com"
            method = "POST"
            body = "from toml"

            [expect]
            decode = "text"

            [client]
            timeout = 60
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.request.url(), "https://cli.example.com");
        assert_eq!(config.request.method(), &Method::PUT);
        assert_eq!(config.request.body(), Some("from cli"));
        assert_eq!(config.decode, TargetKind::Structured);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn toml_values_used_without_cli() {
        let toml = toml(
            r#"
            [request]
            url = "https://example.com"
            method = "DELETE"
            content_type = "application/json"
            body = "{}"

            [expect]
            status = [204]
            decode = "json"

            [client]
            timeout = 30
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.request.method(), &Method::DELETE);
        assert_eq!(config.request.content_type().as_str(), "application/json");
        assert_eq!(config.request.body(), Some("{}"));
        assert_eq!(config.expect_status, [204]);
        assert_eq!(config.decode, TargetKind::Structured);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn cli_headers_replace_toml_headers() {
        let cli = cli(&["--url", "https://example.com", "--header", "X-Cli=1"]);
        let toml = toml(
            r#"
            [request]
            headers = [["X-Toml", "1"]]
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(header_pairs(&config), [("X-Cli", "1")]);
    }

    #[test]
    fn toml_headers_keep_order_and_duplicates() {
        let toml = toml(
            r#"
            [request]
            url = "https://example.com"
            headers = [["X-Trace", "1"], ["Accept", "text/plain"], ["X-Trace", "2"]]
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(
            header_pairs(&config),
            [("X-Trace", "1"), ("Accept", "text/plain"), ("X-Trace", "2")]
        );
    }

    #[test]
    fn cli_query_replaces_toml_query() {
        let cli = cli(&[
            "--url",
            "https://example.com",
            "--query",
            "page=2",
            "--query",
            "page=3",
        ]);
        let toml = toml(
            r#"
            [request]
            query = [["page", "1"]]
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();
        let params: Vec<_> = config
            .request
            .query_params()
            .iter()
            .map(|p| (p.name(), p.value()))
            .collect();

        assert_eq!(params, [("page", "2"), ("page", "3")]);
    }

    #[test]
    fn cli_status_replaces_toml_status() {
        let cli = cli(&["--url", "https://example.com", "--expect-status", "201"]);
        let toml = toml(
            r"
            [expect]
            status = [200, 204]
        ",
        );

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.expect_status, [201]);
    }
}

mod header_parsing {
    use super::*;

    #[test]
    fn accepts_equals_and_colon_formats() {
        let cli = cli(&[
            "--url",
            "https://example.com",
            "--header",
            "X-Api-Key=secret",
            "--header",
            "Accept: application/json",
        ]);

        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(
            header_pairs(&config),
            [("X-Api-Key", "secret"), ("Accept", "application/json")]
        );
    }

    #[test]
    fn rejects_header_without_separator() {
        let cli = cli(&["--url", "https://example.com", "--header", "NoSeparator"]);

        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::InvalidHeader { .. })));
    }

    #[test]
    fn rejects_invalid_header_name() {
        let cli = cli(&["--url", "https://example.com", "--header", "Bad Name=x"]);

        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::InvalidHeaderName { .. })));
    }

    #[test]
    fn rejects_invalid_toml_header_value() {
        let toml = toml(
            r#"
            [request]
            url = "https://example.com"
            headers = [["X-Bad", "line\nbreak"]]
        "#,
        );

        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidHeaderValue { .. })
        ));
    }
}

mod validation {
    use super::*;

    #[test]
    fn invalid_url_returns_error() {
        let result = ValidatedConfig::from_raw(&cli(&["--url", "not a url"]), None);

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn invalid_method_returns_error() {
        let cli = cli(&["--url", "https://example.com", "--method", "BAD METHOD"]);

        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::InvalidMethod(_))));
    }

    #[test]
    fn unsupported_but_valid_method_is_accepted() {
        let cli = cli(&["--url", "https://example.com", "--method", "TRACE"]);

        let config = ValidatedConfig::from_raw(&cli, None).unwrap();

        assert_eq!(config.request.method(), &Method::TRACE);
    }

    #[test]
    fn zero_timeout_returns_error() {
        let cli = cli(&["--url", "https://example.com", "--timeout", "0"]);

        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "timeout",
                ..
            })
        ));
    }

    #[test]
    fn out_of_range_status_returns_error() {
        let cli = cli(&["--url", "https://example.com", "--expect-status", "42"]);

        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::InvalidStatus(42))));
    }

    #[test]
    fn malformed_query_returns_error() {
        let cli = cli(&["--url", "https://example.com", "--query", "=orphan"]);

        let result = ValidatedConfig::from_raw(&cli, None);

        assert!(matches!(result, Err(ConfigError::InvalidQuery { .. })));
    }

    #[test]
    fn unknown_toml_decode_returns_error() {
        let toml = toml(
            r#"
            [request]
            url = "https://example.com"

            [expect]
            decode = "xml"
        "#,
        );

        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidDecode(_))));
    }
}

mod loading {
    use std::io::Write;

    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    #[test]
    fn load_reads_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [request]
            url = "https://example.com/loaded"
        "#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = ValidatedConfig::load(&cli(&["--config", path.as_str()])).unwrap();

        assert_eq!(config.request.url(), "https://example.com/loaded");
    }

    #[test]
    fn load_missing_file_returns_error() {
        let result = ValidatedConfig::load(&cli(&["--config", "missing_bastion_12345.toml"]));

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn written_template_loads_with_cli_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bastion.toml");

        write_default_config(&path).unwrap();
        let path_str = path.to_str().unwrap().to_string();
        let config = ValidatedConfig::load(&cli(&[
            "--config",
            path_str.as_str(),
            "--url",
            "https://example.com",
        ]))
        .unwrap();

        assert_eq!(config.decode, TargetKind::Text);
    }

    #[test]
    fn write_to_missing_directory_returns_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("bastion.toml");

        let result = write_default_config(&path);

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}

mod display {
    use super::*;

    #[test]
    fn summarizes_request_and_expectations() {
        let cli = cli(&[
            "--url",
            "https://example.com",
            "--method",
            "POST",
            "--expect-status",
            "201",
            "--timeout",
            "3",
        ]);

        let config = ValidatedConfig::from_raw(&cli, None).unwrap();
        let rendered = config.to_string();

        assert!(rendered.contains("url: https://example.com"));
        assert!(rendered.contains("method: POST"));
        assert!(rendered.contains("expect_status: [201]"));
        assert!(rendered.contains("timeout: 3s"));
    }
}
