//! `OAuth2` client-credentials token provider.
//!
//! The token endpoint answers a successful grant by setting an HTTP-only
//! session cookie; this adapter never reads the token body. All failures are
//! logged and reported as `false`.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use tracing::{info, warn};

use super::{join_beneath, map_transport_error};
use crate::config::ClientSecret;
use crate::domain::ports::TokenProvider;

/// Token endpoint path beneath the backend base URL.
pub const TOKEN_PATH: &str = "/oauth2/token";

const GRANT_TYPE: &str = "client_credentials";
const SCOPE: &str = "write";

/// Performs the client-credentials grant with a Basic-auth header.
pub struct ClientCredentialsTokenProvider {
    client: Client,
    token_url: Url,
    client_id: String,
    client_secret: ClientSecret,
}

impl ClientCredentialsTokenProvider {
    /// Build a provider posting to [`TOKEN_PATH`] beneath `base_url`.
    ///
    /// `client` must be the same session client used by the transport.
    ///
    /// # Errors
    ///
    /// Returns an error when the token URL cannot be derived from `base_url`.
    pub fn new(
        client: Client,
        base_url: &Url,
        client_id: impl Into<String>,
        client_secret: ClientSecret,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            token_url: join_beneath(base_url, TOKEN_PATH)?,
            client_id: client_id.into(),
            client_secret,
        })
    }

    /// Token endpoint this provider posts to.
    #[must_use]
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }
}

impl std::fmt::Debug for ClientCredentialsTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentialsTokenProvider")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsTokenProvider {
    async fn authenticate(&self) -> bool {
        let result = self
            .client
            .post(self.token_url.clone())
            .basic_auth(&self.client_id, Some(self.client_secret.expose()))
            .header(ACCEPT, "application/json")
            .form(&[("grant_type", GRANT_TYPE), ("scope", SCOPE)])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!(status = response.status().as_u16(), "client credentials accepted");
                true
            }
            Ok(response) => {
                warn!(
                    status = response.status().as_u16(),
                    "token endpoint rejected client credentials"
                );
                false
            }
            Err(error) => {
                let error = map_transport_error(&error);
                warn!(error = %error, "token request failed");
                false
            }
        }
    }
}
