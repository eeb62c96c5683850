//! Error types for whole exchanges.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::executor::ExecuteError;

use super::AssertionFailure;

/// Everything that can end an exchange unsuccessfully.
///
/// Each variant holds the original error unchanged; propagation hands the
/// same value back to the caller.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The request could not be executed.
    #[error(transparent)]
    Execute(#[from] ExecuteError),

    /// The response could not be decoded into the requested model.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A caller-supplied assertion rejected the response.
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
}

/// Coarse classification of an [`ExchangeError`], used by propagation policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request method has no transport verb.
    UnsupportedMethod,
    /// The transport call could not be built or completed.
    Execution,
    /// No decoder matched the response.
    NoDecoder,
    /// The selected decoder failed to read the body.
    DecoderParse,
    /// A caller assertion failed.
    Assertion,
}

impl ExchangeError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Execute(ExecuteError::UnsupportedMethod(_)) => ErrorKind::UnsupportedMethod,
            Self::Execute(ExecuteError::Failed(_)) => ErrorKind::Execution,
            Self::Decode(DecodeError::NoDecoder { .. }) => ErrorKind::NoDecoder,
            Self::Decode(DecodeError::UnsupportedCharset { .. } | DecodeError::Malformed { .. }) => {
                ErrorKind::DecoderParse
            }
            Self::Assertion(_) => ErrorKind::Assertion,
        }
    }

    /// Returns the assertion failure, if that is what ended the exchange.
    #[must_use]
    pub const fn as_assertion(&self) -> Option<&AssertionFailure> {
        match self {
            Self::Assertion(failure) => Some(failure),
            _ => None,
        }
    }
}
