//! Outbound HTTP transport seam.
//!
//! # Responsibilities
//! - Define the one-request contract everything above builds on
//! - Classify transport failures: connect-level vs mid-exchange
//!
//! # Design Decisions
//! - A trait seam so tests substitute a scripted transport; production uses
//!   the pooled hyper client in `hyper.rs`
//! - The transport does not enforce deadlines; callers wrap `send` in a
//!   timeout so retry and health-check budgets stay in one place
//! - Non-2xx statuses are NOT transport errors; classification into
//!   failure classes happens in the retry layer

pub mod hyper;
#[cfg(test)]
pub(crate) mod testing;

pub use self::hyper::HyperTransport;

use std::future::Future;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use thiserror::Error;

/// One outbound request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    /// Absolute URL, e.g. `http://audit:8005/api/v1/events`.
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TransportRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }
}

/// One response, body fully collected.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Transport-level failure. Both variants are connectivity-class for retry
/// purposes; the split is kept for diagnostics.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// DNS resolution or TCP connect failed; the endpoint never answered.
    #[error("connect failed: {0}")]
    Connect(String),

    /// The connection was established but the exchange broke.
    #[error("request failed: {0}")]
    Exchange(String),
}

/// Performs a single HTTP request.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}
