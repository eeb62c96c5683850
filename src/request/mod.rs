//! Abstract request description consumed by the executor.
//!
//! An [`ApiRequest`] says what to call, never how: it carries the method,
//! target, ordered headers and query parameters, a content-type descriptor
//! and an optional textual body. It is built once and consumed by exactly
//! one exchange.

mod content_type;


pub use content_type::ContentType;

use serde::Serialize;

/// A single name/value pair, used for both request and response headers.
///
/// Names compare case-insensitively through [`ApiHeader::is`]; the stored
/// name keeps the caller's spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiHeader {
    name: String,
    value: String,
}

impl ApiHeader {
    /// Creates a header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The header name as given.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The header value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns true if this header's name equals `name`, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A query-string parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiQueryParam {
    name: String,
    value: String,
}

impl ApiQueryParam {
    /// Creates a query parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameter value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Protocol-agnostic description of an HTTP call.
///
/// The method is any [`http::Method`]; whether the executor can map it to
/// a transport verb is decided at execution time. The URL stays textual so
/// that a malformed target surfaces as an execution failure.
///
/// # Example
///
/// ```
/// use bastion_core::request::{ApiRequest, ContentType};
///
/// let request = ApiRequest::post("https://api.example.com/sushi")
///     .with_header("X-Trace", "abc")
///     .with_query_param("dry_run", "true")
///     .with_content_type(ContentType::json())
///     .with_body(r#"{"name":"maguro"}"#);
///
/// assert_eq!(request.headers().len(), 1);
/// assert_eq!(request.body(), Some(r#"{"name":"maguro"}"#));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    method: http::Method,
    url: String,
    headers: Vec<ApiHeader>,
    query_params: Vec<ApiQueryParam>,
    content_type: ContentType,
    body: Option<String>,
}

impl ApiRequest {
    /// Creates a request with no headers, no query parameters, no body and
    /// the default content type ([`ContentType::text_plain`]).
    #[must_use]
    pub fn new(method: http::Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query_params: Vec::new(),
            content_type: ContentType::text_plain(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(http::Method::GET, url)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(http::Method::POST, url)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(http::Method::PUT, url)
    }

    /// Creates a PATCH request.
    #[must_use]
    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(http::Method::PATCH, url)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(http::Method::DELETE, url)
    }

    /// Creates an OPTIONS request.
    #[must_use]
    pub fn options(url: impl Into<String>) -> Self {
        Self::new(http::Method::OPTIONS, url)
    }

    /// Creates a HEAD request.
    #[must_use]
    pub fn head(url: impl Into<String>) -> Self {
        Self::new(http::Method::HEAD, url)
    }

    /// Creates a request whose body is `payload` serialized as JSON, with
    /// the content type set to `application/json`.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if `payload` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(
        method: http::Method,
        url: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_string(payload)?;
        Ok(Self::new(method, url)
            .with_content_type(ContentType::json())
            .with_body(body))
    }

    /// Appends a header. Repeated names are kept as separate entries.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(ApiHeader::new(name, value));
        self
    }

    /// Appends a query parameter. Repeated names are kept as separate entries.
    #[must_use]
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push(ApiQueryParam::new(name, value));
        self
    }

    /// Sets the content-type descriptor.
    #[must_use]
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Sets the textual body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The request method.
    #[must_use]
    pub const fn method(&self) -> &http::Method {
        &self.method
    }

    /// The target URL as given.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[ApiHeader] {
        &self.headers
    }

    /// Query parameters in insertion order.
    #[must_use]
    pub fn query_params(&self) -> &[ApiQueryParam] {
        &self.query_params
    }

    /// The declared content type.
    #[must_use]
    pub const fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// The textual body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns true if any header is named `Content-Type`, ignoring case.
    #[must_use]
    pub fn has_explicit_content_type(&self) -> bool {
        self.headers
            .iter()
            .any(|header| header.is(http::header::CONTENT_TYPE.as_str()))
    }
}
