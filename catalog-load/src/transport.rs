//! Transport seam between the driver and the target service.
//!
//! Everything the driver knows about the target is that a request yields a status code or a
//! [`TransportError`]. The same transport is shared by every in-flight request of every scenario
//! in a run, so implementations must be safe for concurrent use.
mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpTransport;

use crate::endpoint::NewProduct;
use crate::error::TransportError;
use reqwest::Method;

/// A fully-resolved request against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base url, starting with `/`.
    pub path: String,
    pub tenant: String,
    pub body: Option<NewProduct>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>, tenant: &str) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            tenant: tenant.to_string(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, tenant: &str, body: NewProduct) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            tenant: tenant.to_string(),
            body: Some(body),
        }
    }
}

#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Issue one request and return its status code. The response body is discarded.
    async fn send(&self, request: ApiRequest) -> Result<u16, TransportError>;

    /// Release the underlying resources. Calling it again is a no-op; requests issued afterwards
    /// fail with [`TransportError::Closed`].
    async fn close(&self);
}
