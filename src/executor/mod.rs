//! Request executor: turns an [`ApiRequest`] into a transport call and the
//! transport's answer into an [`ApiResponse`].
//!
//! Application order is fixed: method dispatch, headers (with content-type
//! injection), query parameters, body, transport call, response conversion.

mod error;


pub use error::ExecuteError;

use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};

use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::transport::{HttpClient, HttpError, HttpRequest};

/// The seven transport verbs an [`ApiRequest`] can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// `OPTIONS`
    Options,
    /// `HEAD`
    Head,
}

impl Verb {
    /// Every supported verb.
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Options,
        Self::Head,
    ];

    /// Returns true if calls built with this verb carry a request body.
    #[must_use]
    pub const fn accepts_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch | Self::Delete)
    }

    /// The `http` method this verb sends.
    #[must_use]
    pub const fn method(self) -> http::Method {
        match self {
            Self::Get => http::Method::GET,
            Self::Post => http::Method::POST,
            Self::Put => http::Method::PUT,
            Self::Patch => http::Method::PATCH,
            Self::Delete => http::Method::DELETE,
            Self::Options => http::Method::OPTIONS,
            Self::Head => http::Method::HEAD,
        }
    }
}

impl TryFrom<&http::Method> for Verb {
    type Error = ExecuteError;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        match *method {
            http::Method::GET => Ok(Self::Get),
            http::Method::POST => Ok(Self::Post),
            http::Method::PUT => Ok(Self::Put),
            http::Method::PATCH => Ok(Self::Patch),
            http::Method::DELETE => Ok(Self::Delete),
            http::Method::OPTIONS => Ok(Self::Options),
            http::Method::HEAD => Ok(Self::Head),
            _ => Err(ExecuteError::UnsupportedMethod(method.clone())),
        }
    }
}

/// Executes abstract requests against an [`HttpClient`].
///
/// Holds no per-exchange state, so one executor can serve any number of
/// concurrent exchanges.
///
/// # Example
///
/// ```no_run
/// use bastion_core::executor::RequestExecutor;
/// use bastion_core::request::ApiRequest;
/// use bastion_core::transport::ReqwestClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = RequestExecutor::new(ReqwestClient::new());
/// let response = executor
///     .execute(&ApiRequest::get("https://api.example.com/sushi"))
///     .await?;
/// println!("{} {}", response.status(), response.status_text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RequestExecutor<H> {
    client: H,
}

impl<H> RequestExecutor<H> {
    /// Creates an executor that performs calls through `client`.
    #[must_use]
    pub const fn new(client: H) -> Self {
        Self { client }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }

    /// Builds the transport request for `request` without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::UnsupportedMethod`] for methods outside
    /// [`Verb::ALL`], and [`ExecuteError::Failed`] when the URL, a header
    /// name or a header value cannot be represented.
    pub fn prepare(request: &ApiRequest) -> Result<HttpRequest, ExecuteError> {
        let verb = Verb::try_from(request.method())?;
        let url = url::Url::parse(request.url())
            .map_err(|e| HttpError::InvalidUrl(format!("'{}': {e}", request.url())))?;

        let mut call = apply_headers(HttpRequest::new(verb.method(), url), request)?;
        apply_query_params(&mut call, request);

        Ok(apply_body(call, verb, request))
    }
}

impl<H: HttpClient> RequestExecutor<H> {
    /// Performs `request` and returns the normalized response.
    ///
    /// Exactly one [`ApiResponse`] is produced per successful call; on any
    /// failure nothing partial is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ExecuteError::UnsupportedMethod`] for unmapped methods and
    /// [`ExecuteError::Failed`] wrapping the transport error otherwise.
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ExecuteError> {
        let call = Self::prepare(request)?;

        tracing::debug!(
            method = %call.method,
            url = %call.url,
            headers = call.headers.len(),
            has_body = call.body.is_some(),
            "Performing transport call"
        );

        let response = self.client.request(call).await?;

        tracing::debug!(status = response.status.as_u16(), "Transport call completed");

        Ok(ApiResponse::from(response))
    }
}

/// Injects the declared content type unless the caller already set one,
/// then appends every declared header as given.
fn apply_headers(
    mut call: HttpRequest,
    request: &ApiRequest,
) -> Result<HttpRequest, ExecuteError> {
    if !request.has_explicit_content_type() {
        let value = header_value(CONTENT_TYPE.as_str(), request.content_type().as_str())?;
        call = call.with_header(CONTENT_TYPE, value);
    }

    for header in request.headers() {
        let name = HeaderName::from_bytes(header.name().as_bytes()).map_err(|e| {
            HttpError::InvalidHeader {
                name: header.name().to_string(),
                reason: e.to_string(),
            }
        })?;
        let value = header_value(header.name(), header.value())?;
        call = call.with_header(name, value);
    }

    Ok(call)
}

fn apply_query_params(call: &mut HttpRequest, request: &ApiRequest) {
    // query_pairs_mut on an empty list would still leave a bare '?'
    if request.query_params().is_empty() {
        return;
    }

    let mut pairs = call.url.query_pairs_mut();
    for param in request.query_params() {
        pairs.append_pair(param.name(), param.value());
    }
}

fn apply_body(call: HttpRequest, verb: Verb, request: &ApiRequest) -> HttpRequest {
    let Some(body) = request.body() else {
        return call;
    };

    if verb.accepts_body() {
        call.with_body(body.as_bytes().to_vec())
    } else {
        tracing::debug!(method = %call.method, "Method carries no body; supplied body skipped");
        call
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, HttpError> {
    HeaderValue::from_str(value).map_err(|e| HttpError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
