//! Structured JSON decoder.

use crate::request::ContentType;
use crate::response::ApiResponse;

use super::{DecodeError, Decoded, ResponseDecoder, TargetKind};

/// Parses JSON bodies (`application/json` and `+json` types) into a
/// structured document for binding to a typed model.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    /// Name reported in logs and errors.
    pub const NAME: &'static str = "json";
}

impl ResponseDecoder for JsonDecoder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn handles(&self, content_type: Option<&ContentType>) -> bool {
        content_type.is_some_and(ContentType::is_json)
    }

    fn produces(&self, target: TargetKind) -> bool {
        target == TargetKind::Structured
    }

    fn decode(&self, response: &ApiResponse) -> Result<Decoded, DecodeError> {
        serde_json::from_slice(response.body())
            .map(Decoded::Structured)
            .map_err(|e| {
                DecodeError::malformed(
                    Self::NAME,
                    response.header(http::header::CONTENT_TYPE.as_str()),
                    e,
                    response.body(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ApiHeader;

    fn json_response(body: &[u8]) -> ApiResponse {
        ApiResponse::new(
            200,
            "OK",
            vec![ApiHeader::new("Content-Type", "application/json")],
            body.to_vec(),
        )
    }

    #[test]
    fn handles_json_content_types_only() {
        assert!(JsonDecoder.handles(Some(&ContentType::json())));
        assert!(JsonDecoder.handles(Some(&ContentType::new("application/hal+json"))));
        assert!(!JsonDecoder.handles(Some(&ContentType::text_plain())));
        assert!(!JsonDecoder.handles(None));
    }

    #[test]
    fn produces_structured_targets_only() {
        assert!(JsonDecoder.produces(TargetKind::Structured));
        assert!(!JsonDecoder.produces(TargetKind::Text));
    }

    #[test]
    fn parses_document() {
        let decoded = JsonDecoder.decode(&json_response(br#"{"x":1}"#)).unwrap();

        assert_eq!(decoded, Decoded::Structured(serde_json::json!({"x": 1})));
    }

    #[test]
    fn malformed_document_reports_context() {
        let error = JsonDecoder.decode(&json_response(b"{not json")).unwrap_err();

        match error {
            DecodeError::Malformed {
                decoder,
                content_type,
                preview,
                ..
            } => {
                assert_eq!(decoder, "json");
                assert_eq!(content_type, "application/json");
                assert_eq!(preview.text(), "{not json");
            }
            other => panic!("Expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn empty_body_is_an_error() {
        assert!(JsonDecoder.decode(&json_response(b"")).is_err());
    }
}
