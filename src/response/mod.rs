//! Normalized response produced by the executor.

use crate::request::{ApiHeader, ContentType};
use crate::transport::HttpResponse;

/// Immutable response of a single exchange.
///
/// Headers are flattened: a name carrying several values appears once per
/// value, in the order the transport reported them. The body is the raw
/// payload, left for a decoder to interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: u16,
    status_text: String,
    headers: Vec<ApiHeader>,
    body: Vec<u8>,
}

impl ApiResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub fn new(
        status: u16,
        status_text: impl Into<String>,
        headers: Vec<ApiHeader>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers,
            body,
        }
    }

    /// Numeric status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Status reason phrase.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Every header entry, in transport order.
    #[must_use]
    pub fn headers(&self) -> &[ApiHeader] {
        &self.headers
    }

    /// The first value of the header called `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|header| header.is(name))
            .map(ApiHeader::value)
    }

    /// All values of the header called `name` (case-insensitive).
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |header| header.is(name))
            .map(ApiHeader::value)
    }

    /// The declared content type, if the response carries one.
    #[must_use]
    pub fn content_type(&self) -> Option<ContentType> {
        self.header(http::header::CONTENT_TYPE.as_str())
            .map(ContentType::from)
    }

    /// The raw body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consumes the response and returns the raw body.
    #[must_use]
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Returns true if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

impl From<HttpResponse> for ApiResponse {
    fn from(response: HttpResponse) -> Self {
        // HeaderMap keys iterate in insertion order; get_all keeps value order
        let headers = response
            .headers
            .keys()
            .flat_map(|name| {
                response.headers.get_all(name).iter().map(move |value| {
                    ApiHeader::new(
                        name.as_str(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
            })
            .collect();

        Self {
            status: response.status.as_u16(),
            status_text: response.status_text,
            headers,
            body: response.body,
        }
    }
}
