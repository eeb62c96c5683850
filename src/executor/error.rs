//! Error types for request execution.

use thiserror::Error;

use crate::transport::HttpError;

/// Error type for [`RequestExecutor::execute`](super::RequestExecutor::execute).
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The request's method has no transport verb.
    ///
    /// Raised before any transport work; never downgraded to an empty call.
    #[error("Unsupported HTTP method '{0}'")]
    UnsupportedMethod(http::Method),

    /// The transport call could not be built or completed.
    ///
    /// Carries the original transport error as its source.
    #[error("Failed executing request: {0}")]
    Failed(#[source] HttpError),
}

impl From<HttpError> for ExecuteError {
    fn from(error: HttpError) -> Self {
        Self::Failed(error)
    }
}
