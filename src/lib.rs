//! Bastion: request execution and response decoding for HTTP API tests.
//!
//! A library for sending described HTTP requests, decoding the responses
//! into typed models and notifying listeners about every exchange.

pub mod config;
pub mod decode;
pub mod exchange;
pub mod executor;
pub mod request;
pub mod response;
pub mod transport;
