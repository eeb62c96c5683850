//! Error types for response decoding.

use std::fmt;

use thiserror::Error;

use super::TargetKind;

/// Maximum number of body bytes quoted in a parse error.
pub const BODY_PREVIEW_LIMIT: usize = 256;

/// Error type for decoder selection and decoding.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No registered decoder accepts the response's content type for the
    /// requested target kind.
    #[error("No decoder found for content type '{content_type}' and {target} target")]
    NoDecoder {
        /// The response content type, or `<none>` when absent
        content_type: String,
        /// The requested target kind
        target: TargetKind,
    },

    /// The response declares a charset the text decoder cannot read.
    #[error("Unsupported charset '{charset}'")]
    UnsupportedCharset {
        /// The declared charset
        charset: String,
    },

    /// A selected decoder could not turn the body into the target.
    #[error("Decoder '{decoder}' failed on content type '{content_type}': {reason} (body: {preview})")]
    Malformed {
        /// Name of the decoder that failed
        decoder: &'static str,
        /// The response content type, or `<none>` when absent
        content_type: String,
        /// What went wrong
        reason: String,
        /// The start of the body, lossily decoded
        preview: BodyPreview,
    },
}

impl DecodeError {
    /// Builds a [`DecodeError::Malformed`] quoting the start of `body`.
    #[must_use]
    pub fn malformed(
        decoder: &'static str,
        content_type: Option<&str>,
        reason: impl fmt::Display,
        body: &[u8],
    ) -> Self {
        Self::Malformed {
            decoder,
            content_type: content_type.unwrap_or("<none>").to_string(),
            reason: reason.to_string(),
            preview: BodyPreview::of(body),
        }
    }
}

/// The leading bytes of a body, kept for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPreview {
    text: String,
    truncated: bool,
}

impl BodyPreview {
    /// Captures up to [`BODY_PREVIEW_LIMIT`] bytes of `body`.
    #[must_use]
    pub fn of(body: &[u8]) -> Self {
        let end = body.len().min(BODY_PREVIEW_LIMIT);
        Self {
            text: String::from_utf8_lossy(&body[..end]).into_owned(),
            truncated: body.len() > BODY_PREVIEW_LIMIT,
        }
    }

    /// The captured text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true if the body was longer than the preview.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl fmt::Display for BodyPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.truncated {
            write!(f, "{:?}...", self.text)
        } else {
            write!(f, "{:?}", self.text)
        }
    }
}
