//! Reqwest-backed adapters.
//!
//! The transport and the token provider must share one [`reqwest::Client`]:
//! its cookie store is where the session cookie set by the token endpoint
//! lives, and the only way later requests get to carry it.

use std::time::Duration;

use reqwest::{Client, Url};

mod token_provider;
mod transport;

pub use token_provider::{ClientCredentialsTokenProvider, TOKEN_PATH};
pub use transport::ReqwestTransport;

const DEFAULT_USER_AGENT: &str = concat!("storefront-client/", env!("CARGO_PKG_VERSION"));

/// Build the cookie-enabled client shared by the adapters.
///
/// # Errors
///
/// Returns an error when the reqwest client cannot be constructed.
pub fn session_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .cookie_store(true)
        .timeout(timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .build()
}

/// Resolve `path` beneath `base`, keeping any path prefix `base` carries.
///
/// `https://host/backend` joined with `/api/menu` gives
/// `https://host/backend/api/menu`.
fn join_beneath(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let directory = format!("{}/", base.path());
        base.set_path(&directory);
    }
    base.join(path.trim_start_matches('/'))
}

fn map_transport_error(error: &reqwest::Error) -> crate::domain::ports::TransportError {
    use crate::domain::ports::TransportError;

    if error.is_timeout() {
        TransportError::timeout(error.to_string())
    } else if error.is_builder() {
        TransportError::invalid_request(error.to_string())
    } else {
        TransportError::connection(error.to_string())
    }
}
