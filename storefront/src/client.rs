//! Wiring of the reqwest adapters into a ready-to-use client.

use std::sync::Arc;

use tracing::debug;

use crate::config::ClientConfig;
use crate::domain::{AuthenticatedGateway, StorefrontActions};
use crate::outbound::http::{ClientCredentialsTokenProvider, ReqwestTransport, session_client};

/// Failures while assembling the client.
#[derive(thiserror::Error, Debug)]
pub enum ClientBuildError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    /// The token endpoint URL could not be derived from the base URL.
    #[error("failed to derive token endpoint: {0}")]
    TokenUrl(#[from] url::ParseError),
}

/// Build storefront actions backed by the real backend.
///
/// The transport and token provider share one cookie-enabled HTTP client so
/// the session cookie set during re-authentication is sent on the retry.
///
/// # Errors
///
/// Returns [`ClientBuildError`] when the HTTP client or token URL cannot be
/// built.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use storefront::{ClientConfig, ClientSecret, connect};
///
/// let config = ClientConfig::new(
///     "https://api.example.test",
///     "storefront-web",
///     ClientSecret::new("s3cret"),
///     Duration::from_secs(10),
/// )
/// .expect("valid config");
/// let actions = connect(&config).expect("client builds");
/// assert_eq!(actions.gateway().reauthentication_epoch(), 0);
/// ```
pub fn connect(config: &ClientConfig) -> Result<StorefrontActions, ClientBuildError> {
    let client = session_client(config.request_timeout())?;
    let transport = ReqwestTransport::new(client.clone(), config.base_url().clone());
    let token_provider = ClientCredentialsTokenProvider::new(
        client,
        config.base_url(),
        config.client_id(),
        config.client_secret().clone(),
    )?;
    debug!(
        base_url = %config.base_url(),
        token_url = %token_provider.token_url(),
        "storefront client ready"
    );

    let gateway = AuthenticatedGateway::new(Arc::new(transport), Arc::new(token_provider));
    Ok(StorefrontActions::new(Arc::new(gateway)))
}
