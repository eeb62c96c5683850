//! Tests for TOML configuration parsing.

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [request]
            url = "https://example.com/sushi"
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        assert_eq!(
            config.request.url.as_deref(),
            Some("https://example.com/sushi")
        );
        assert!(config.request.headers.is_empty());
    }

    #[test]
    fn parse_full_request_section() {
        let toml = r#"
            [request]
            url = "https://api.example.com/sushi"
            method = "POST"
            content_type = "application/json"
            body = '{"name": "salmon"}'
            headers = [["X-Trace", "1"], ["X-Trace", "2"], ["Accept", "application/json"]]
            query = [["page", "1"]]
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let request = &config.request;

        assert_eq!(request.method.as_deref(), Some("POST"));
        assert_eq!(request.content_type.as_deref(), Some("application/json"));
        assert_eq!(request.body.as_deref(), Some(r#"{"name": "salmon"}"#));
        assert_eq!(
            request.headers,
            [
                ("X-Trace".to_string(), "1".to_string()),
                ("X-Trace".to_string(), "2".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ]
        );
        assert_eq!(request.query, [("page".to_string(), "1".to_string())]);
    }

    #[test]
    fn parse_expect_and_client_sections() {
        let toml = r#"
            [expect]
            status = [200, 204]
            decode = "json"

            [client]
            timeout = 15
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.expect.status, [200, 204]);
        assert_eq!(config.expect.decode.as_deref(), Some("json"));
        assert_eq!(config.client.timeout, Some(15));
    }

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.request.url.is_none());
        assert!(config.expect.status.is_empty());
        assert!(config.client.timeout.is_none());
    }

    #[test]
    fn reject_unknown_fields() {
        let toml = r#"
            [request]
            url = "https://example.com"
            unknown_field = "value"
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn reject_unknown_sections() {
        let toml = r"
            [retry]
            max_attempts = 3
        ";

        assert!(TomlConfig::parse(toml).is_err());
    }

    #[test]
    fn reject_header_without_value() {
        let toml = r#"
            [request]
            headers = [["Accept"]]
        "#;

        assert!(TomlConfig::parse(toml).is_err());
    }
}

mod default_template {
    use super::*;

    #[test]
    fn template_is_valid_toml() {
        let template = default_config_template();

        let config = TomlConfig::parse(&template).unwrap();
        assert!(config.request.url.is_none());
    }

    #[test]
    fn template_contains_all_sections() {
        let template = default_config_template();

        for section in ["[request]", "[expect]", "[client]"] {
            assert!(template.contains(section), "Template should have {section}");
        }
    }

    #[test]
    fn template_documents_options() {
        let template = default_config_template();

        for option in ["url", "method", "headers", "query", "status", "decode", "timeout"] {
            assert!(template.contains(option), "Template should document {option}");
        }
    }
}

mod file_loading {
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn load_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [request]
            url = "https://example.com"
        "#
        )
        .unwrap();

        let config = TomlConfig::load(file.path()).unwrap();
        assert_eq!(config.request.url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn load_nonexistent_file_returns_error() {
        let path = Path::new("nonexistent_config_file_12345.toml");
        let result = TomlConfig::load(path);

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn load_invalid_toml_file_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();

        let result = TomlConfig::load(file.path());

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }
}
