//! Transport request/response types and client trait.

use super::HttpError;

/// An HTTP request ready to be handed to a transport.
///
/// This is a value type produced by the executor and passed to any
/// [`HttpClient`] implementation. It uses standard `http` crate types
/// for method and headers; query parameters are already encoded into `url`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: http::Method,
    /// Target URL, query string included
    pub url: url::Url,
    /// HTTP headers to send
    pub headers: http::HeaderMap,
    /// Optional request body
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a new HTTP request with the given method and URL.
    ///
    /// Headers are initialized to an empty map and body is `None`.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: None,
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header to the request.
    ///
    /// If the header name already exists, the value is appended
    /// (HTTP headers can have multiple values).
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Returns the query string entries in the order they appear in the URL.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect()
    }
}

/// An HTTP response received from a transport.
///
/// Contains the status code, headers, and body of the response.
/// The body is the raw binary payload, fully buffered and not interpreted.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Reason phrase as received
    pub status_text: String,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Response body (raw bytes)
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new HTTP response whose reason phrase is the canonical
    /// one for `status`, or empty for codes without one.
    #[must_use]
    pub fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        }
    }

    /// Replaces the reason phrase with the one the server sent.
    #[must_use]
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// Returns the reason phrase.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }
}

/// Trait for performing transport calls.
///
/// # Design
///
/// This trait abstracts the HTTP client implementation, enabling:
/// - Dependency injection for testing with fake transports
/// - Swapping HTTP libraries without changing the executor
///
/// # Example
///
/// ```ignore
/// use bastion_core::transport::{HttpClient, HttpRequest, HttpResponse, HttpError};
///
/// struct FakeTransport {
///     response: HttpResponse,
/// }
///
/// impl HttpClient for FakeTransport {
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(self.response.clone())
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Sends an HTTP request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when:
    /// - Network connection fails ([`HttpError::Connection`])
    /// - Request times out ([`HttpError::Timeout`])
    /// - URL is rejected by the client ([`HttpError::InvalidUrl`])
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}

impl<T: HttpClient> HttpClient for std::sync::Arc<T> {
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send {
        (**self).request(req)
    }
}
