//! Caller-supplied checks run against a decoded exchange.

use thiserror::Error;

use crate::response::ApiResponse;

/// A failed caller assertion.
///
/// Propagated to the caller exactly as constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionFailure {
    message: String,
}

impl AssertionFailure {
    /// Creates a failure with a free-form message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Creates a failure describing an expected/actual mismatch.
    #[must_use]
    pub fn mismatch(
        what: &str,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        Self::new(format!("{what}: expected {expected} but was {actual}"))
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Checks run after a successful execute-and-decode.
///
/// Closures of the shape `Fn(&ApiResponse, &M) -> Result<(), AssertionFailure>`
/// implement this trait directly.
pub trait Assertions<M> {
    /// Inspects the exchange.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure`] when the exchange does not meet expectations.
    fn check(&self, response: &ApiResponse, model: &M) -> Result<(), AssertionFailure>;
}

impl<M, F> Assertions<M> for F
where
    F: Fn(&ApiResponse, &M) -> Result<(), AssertionFailure>,
{
    fn check(&self, response: &ApiResponse, model: &M) -> Result<(), AssertionFailure> {
        self(response, model)
    }
}

/// Accepts every exchange.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssertions;

impl<M> Assertions<M> for NoAssertions {
    fn check(&self, _response: &ApiResponse, _model: &M) -> Result<(), AssertionFailure> {
        Ok(())
    }
}

/// Requires the response status to be one of a set of codes.
///
/// # Example
///
/// ```
/// use bastion_core::exchange::{Assertions, ExpectStatus};
/// use bastion_core::response::ApiResponse;
///
/// let created = ApiResponse::new(201, "Created", vec![], vec![]);
///
/// assert!(ExpectStatus::new([200, 201]).check(&created, &()).is_ok());
/// assert!(ExpectStatus::new([200]).check(&created, &()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectStatus {
    codes: Vec<u16>,
}

impl ExpectStatus {
    /// Accepts any of `codes`.
    #[must_use]
    pub fn new(codes: impl IntoIterator<Item = u16>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    /// The accepted codes.
    #[must_use]
    pub fn codes(&self) -> &[u16] {
        &self.codes
    }
}

impl<M> Assertions<M> for ExpectStatus {
    fn check(&self, response: &ApiResponse, _model: &M) -> Result<(), AssertionFailure> {
        if self.codes.contains(&response.status()) {
            return Ok(());
        }

        let expected = match self.codes.as_slice() {
            [single] => single.to_string(),
            codes => format!(
                "one of [{}]",
                codes
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        Err(AssertionFailure::mismatch(
            "HTTP status code",
            expected,
            response.status(),
        ))
    }
}
