//! Ordered, first-match decoder registry.

use crate::request::ContentType;
use crate::response::ApiResponse;

use super::{DecodeError, Decoded, JsonDecoder, Model, ResponseDecoder, TargetKind, TextDecoder};

/// Decoders tried in registration order; the first one whose content-type
/// and target predicates both match wins.
///
/// Built once at set-up and only read afterwards, so a single registry can
/// be shared by concurrent exchanges without locking.
///
/// # Examples
///
/// ```
/// use bastion_core::decode::{DecoderRegistry, JsonDecoder, TextDecoder};
///
/// // Same set as DecoderRegistry::default(): specific decoders
/// // first, the catch-all text decoder last.
/// let registry = DecoderRegistry::new()
///     .with(JsonDecoder)
///     .with(TextDecoder);
///
/// assert_eq!(registry.names(), ["json", "text"]);
/// ```
pub struct DecoderRegistry {
    decoders: Vec<Box<dyn ResponseDecoder>>,
}

impl DecoderRegistry {
    /// Creates an empty registry; every selection fails until a decoder is added.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoders: Vec::new(),
        }
    }

    /// Appends a decoder (builder pattern).
    #[must_use]
    pub fn with<D: ResponseDecoder + 'static>(mut self, decoder: D) -> Self {
        self.register(decoder);
        self
    }

    /// Appends a decoder.
    pub fn register<D: ResponseDecoder + 'static>(&mut self, decoder: D) {
        self.decoders.push(Box::new(decoder));
    }

    /// Returns the number of registered decoders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Returns `true` if no decoder is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decoder names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.decoders.iter().map(|d| d.name()).collect()
    }

    /// Selects the first decoder handling `content_type` that can produce `target`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NoDecoder`] if no registered decoder matches.
    pub fn select(
        &self,
        content_type: Option<&ContentType>,
        target: TargetKind,
    ) -> Result<&dyn ResponseDecoder, DecodeError> {
        self.decoders
            .iter()
            .map(|decoder| &**decoder)
            .find(|decoder| decoder.handles(content_type) && decoder.produces(target))
            .ok_or_else(|| DecodeError::NoDecoder {
                content_type: content_type.map_or_else(|| "<none>".to_string(), ToString::to_string),
                target,
            })
    }

    /// Decodes `response` with the decoder selected for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NoDecoder`] if selection fails, or the
    /// selected decoder's error.
    pub fn decode_as(
        &self,
        response: &ApiResponse,
        target: TargetKind,
    ) -> Result<Decoded, DecodeError> {
        let content_type = response.content_type();
        let decoder = self.select(content_type.as_ref(), target)?;

        tracing::debug!(
            decoder = decoder.name(),
            content_type = content_type.as_ref().map_or("<none>", ContentType::as_str),
            %target,
            "Selected response decoder"
        );

        decoder.decode(response)
    }

    /// Decodes `response` into the model type `M`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if no decoder matches, the decoder fails, or
    /// the decoded value does not fit `M`.
    pub fn decode<M: Model>(&self, response: &ApiResponse) -> Result<M, DecodeError> {
        let decoded = self.decode_as(response, M::KIND)?;
        M::from_decoded(decoded, response.content_type().as_ref())
    }
}

impl Default for DecoderRegistry {
    /// The default decoder set: [`JsonDecoder`] then the catch-all [`TextDecoder`].
    fn default() -> Self {
        Self::new().with(JsonDecoder).with(TextDecoder)
    }
}

// Manual Debug impl since Box<dyn ResponseDecoder> doesn't implement Debug
impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("decoders", &self.names())
            .finish()
    }
}
