//! Response decoding: maps an [`ApiResponse`] to a caller-chosen model.
//!
//! This module provides:
//! - The decoder capability ([`ResponseDecoder`])
//! - The ordered, first-match decoder registry ([`DecoderRegistry`])
//! - The default decoders ([`JsonDecoder`], [`TextDecoder`])
//! - Target model types ([`Model`], [`Json`])
//!
//! Decoding is a pure function of the response and the target kind.

mod error;
mod json;
mod registry;
mod text;


pub use error::{BODY_PREVIEW_LIMIT, BodyPreview, DecodeError};
pub use json::JsonDecoder;
pub use registry::DecoderRegistry;
pub use text::TextDecoder;

use std::fmt;

use serde::de::DeserializeOwned;

use crate::request::ContentType;
use crate::response::ApiResponse;

/// The shape of model a caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Plain text (`String`).
    Text,
    /// A structured document bound into a typed value.
    Structured,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Structured => write!(f, "structured"),
        }
    }
}

/// Intermediate result produced by a decoder, before binding to a [`Model`].
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Body read as text.
    Text(String),
    /// Body parsed as a structured document.
    Structured(serde_json::Value),
}

/// A decoder capability: a content-type predicate, a target predicate and
/// the decode step itself.
///
/// Implementations must be stateless with respect to exchanges; the
/// registry shares one instance between all concurrent exchanges.
pub trait ResponseDecoder: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Returns true if this decoder reads responses declaring `content_type`.
    ///
    /// `None` means the response carries no `Content-Type` header.
    fn handles(&self, content_type: Option<&ContentType>) -> bool;

    /// Returns true if this decoder can produce the given target kind.
    fn produces(&self, target: TargetKind) -> bool;

    /// Decodes the response body.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the body cannot be read; a decoder never
    /// returns an empty value in place of a failure.
    fn decode(&self, response: &ApiResponse) -> Result<Decoded, DecodeError>;
}

/// A type a response can be decoded into.
pub trait Model: Sized {
    /// The kind of decoder this model needs.
    const KIND: TargetKind;

    /// Binds a decoder's output to this type. `content_type` is the
    /// response's declared type, reported if binding fails.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Malformed`] when the decoded value does not fit.
    fn from_decoded(
        decoded: Decoded,
        content_type: Option<&ContentType>,
    ) -> Result<Self, DecodeError>;
}

impl Model for String {
    const KIND: TargetKind = TargetKind::Text;

    fn from_decoded(
        decoded: Decoded,
        _content_type: Option<&ContentType>,
    ) -> Result<Self, DecodeError> {
        match decoded {
            Decoded::Text(text) => Ok(text),
            Decoded::Structured(value) => Ok(value.to_string()),
        }
    }
}

impl Model for serde_json::Value {
    const KIND: TargetKind = TargetKind::Structured;

    fn from_decoded(
        decoded: Decoded,
        content_type: Option<&ContentType>,
    ) -> Result<Self, DecodeError> {
        match decoded {
            Decoded::Structured(value) => Ok(value),
            Decoded::Text(text) => serde_json::from_str(&text).map_err(|e| {
                DecodeError::malformed(
                    "model",
                    content_type.map(ContentType::as_str),
                    e,
                    text.as_bytes(),
                )
            }),
        }
    }
}

/// Wraps any deserializable type as a structured [`Model`].
///
/// # Example
///
/// ```
/// use bastion_core::decode::{DecoderRegistry, Json};
/// use bastion_core::request::ApiHeader;
/// use bastion_core::response::ApiResponse;
///
/// #[derive(serde::Deserialize)]
/// struct Point {
///     x: i64,
/// }
///
/// let response = ApiResponse::new(
///     200,
///     "OK",
///     vec![ApiHeader::new("Content-Type", "application/json")],
///     br#"{"x":1}"#.to_vec(),
/// );
///
/// let Json(point) = DecoderRegistry::default()
///     .decode::<Json<Point>>(&response)
///     .unwrap();
/// assert_eq!(point.x, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Returns the wrapped value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned> Model for Json<T> {
    const KIND: TargetKind = TargetKind::Structured;

    fn from_decoded(
        decoded: Decoded,
        content_type: Option<&ContentType>,
    ) -> Result<Self, DecodeError> {
        let value = serde_json::Value::from_decoded(decoded, content_type)?;
        T::deserialize(&value).map(Json).map_err(|e| {
            DecodeError::malformed(
                "model",
                content_type.map(ContentType::as_str),
                e,
                value.to_string().as_bytes(),
            )
        })
    }
}
