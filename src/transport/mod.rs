//! Transport layer: the HTTP client capability the executor delegates to.
//!
//! This module provides:
//! - Transport-level requests ([`HttpRequest`]) built by the executor
//! - Fully buffered transport responses ([`HttpResponse`])
//! - The client abstraction ([`HttpClient`]) that performs the network call
//! - Production HTTP client implementation ([`ReqwestClient`])
//!
//! Connection pooling, redirects, TLS and deadlines all belong to the
//! concrete client; nothing above this module models them.

mod client;
mod error;
mod http;


pub use client::ReqwestClient;
pub use error::HttpError;
pub use http::{HttpClient, HttpRequest, HttpResponse};
