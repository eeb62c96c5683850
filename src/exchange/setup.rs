//! Set-up object shared by every exchange.

use std::sync::Arc;

use crate::decode::{DecoderRegistry, ResponseDecoder};

use super::{EventDispatcher, ExchangeListener, PropagationPolicy};

/// Decoders and listeners, configured once before any exchange runs.
///
/// Wrap it in an [`Arc`] and hand it to every [`Bastion`](super::Bastion);
/// it is never mutated once exchanges are in flight.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use bastion_core::decode::{JsonDecoder, TextDecoder};
/// use bastion_core::exchange::{CollectingListener, ExchangeSetup};
///
/// let collector = Arc::new(CollectingListener::new());
/// let setup = ExchangeSetup::new()
///     .with_decoder(JsonDecoder)
///     .with_decoder(TextDecoder)
///     .with_shared_listener(collector.clone());
///
/// assert_eq!(setup.decoders().len(), 2);
/// assert_eq!(setup.dispatcher().len(), 1);
/// ```
#[derive(Debug)]
pub struct ExchangeSetup {
    decoders: DecoderRegistry,
    dispatcher: EventDispatcher,
}

impl ExchangeSetup {
    /// Creates a set-up with no decoders and no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoders: DecoderRegistry::new(),
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Replaces the decoder registry.
    #[must_use]
    pub fn with_decoders(mut self, decoders: DecoderRegistry) -> Self {
        self.decoders = decoders;
        self
    }

    /// Appends a decoder to the registry.
    #[must_use]
    pub fn with_decoder<D: ResponseDecoder + 'static>(mut self, decoder: D) -> Self {
        self.decoders.register(decoder);
        self
    }

    /// Appends a listener.
    #[must_use]
    pub fn with_listener<L: ExchangeListener + 'static>(self, listener: L) -> Self {
        self.with_shared_listener(Arc::new(listener))
    }

    /// Appends a listener the caller keeps a handle to.
    #[must_use]
    pub fn with_shared_listener(mut self, listener: Arc<dyn ExchangeListener>) -> Self {
        self.dispatcher.register(listener);
        self
    }

    /// The decoder registry.
    #[must_use]
    pub const fn decoders(&self) -> &DecoderRegistry {
        &self.decoders
    }

    /// The listener dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }
}

impl Default for ExchangeSetup {
    /// The default set-up: [`DecoderRegistry::default`] and a fail-loud
    /// [`PropagationPolicy`].
    fn default() -> Self {
        Self::new()
            .with_decoders(DecoderRegistry::default())
            .with_listener(PropagationPolicy::fail_loud())
    }
}
