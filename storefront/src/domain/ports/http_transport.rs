//! Driven port for issuing one HTTP exchange with the backend.
//!
//! Implementations attach the session cookie jar and force JSON content
//! negotiation headers. They never retry; retry policy lives in the gateway.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{ApiRequest, ApiResponse};

define_port_error! {
    /// Errors raised before an HTTP response was received.
    pub enum TransportError {
        /// The request could not be built (for example, an unusable path).
        InvalidRequest { message: String } =>
            "invalid request: {message}",
        /// Connecting, sending, or reading the body failed.
        Connection { message: String } =>
            "connection failed: {message}",
        /// The request exceeded the configured timeout.
        Timeout { message: String } =>
            "request timed out: {message}",
    }
}

/// Port for sending a request and returning the raw response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` once and return whatever status the backend answered.
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}
