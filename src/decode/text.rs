//! Catch-all text decoder.

use crate::request::ContentType;
use crate::response::ApiResponse;

use super::{DecodeError, Decoded, ResponseDecoder, TargetKind};

/// Reads the body as text using the charset the response declares.
///
/// Matches every content type, so it belongs at the end of a registry
/// where it only answers what more specific decoders declined.
///
/// Without a declared charset the body is read as UTF-8. Bytes that are
/// invalid for the charset are an error, never replaced.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDecoder;

impl TextDecoder {
    /// Name reported in logs and errors.
    pub const NAME: &'static str = "text";
}

impl ResponseDecoder for TextDecoder {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn handles(&self, _content_type: Option<&ContentType>) -> bool {
        true
    }

    fn produces(&self, target: TargetKind) -> bool {
        target == TargetKind::Text
    }

    fn decode(&self, response: &ApiResponse) -> Result<Decoded, DecodeError> {
        let content_type = response.content_type();
        let charset = content_type.as_ref().and_then(ContentType::charset);
        let body = response.body();
        let malformed = |reason: &str| {
            DecodeError::malformed(
                Self::NAME,
                content_type.as_ref().map(ContentType::as_str),
                reason,
                body,
            )
        };

        let text = match charset.as_deref() {
            None | Some("utf-8" | "utf8") => std::str::from_utf8(body)
                .map_err(|e| malformed(&format!("invalid UTF-8: {e}")))?
                .to_string(),
            Some("us-ascii" | "ascii") => {
                if !body.is_ascii() {
                    return Err(malformed("non-ASCII byte in US-ASCII body"));
                }
                body.iter().copied().map(char::from).collect()
            }
            // Latin-1 maps every byte to the code point of the same value
            Some("iso-8859-1" | "latin1" | "latin-1") => body.iter().copied().map(char::from).collect(),
            Some(other) => {
                return Err(DecodeError::UnsupportedCharset {
                    charset: other.to_string(),
                });
            }
        };

        Ok(Decoded::Text(text))
    }
}
