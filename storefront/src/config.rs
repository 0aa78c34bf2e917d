//! Client settings loaded via `OrthoConfig` and validated into [`ClientConfig`].
//!
//! Settings come from `STOREFRONT_*` environment variables or a config file.
//! Validation happens once, up front, so adapters can assume a usable base
//! URL and non-empty credentials.

use std::fmt;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use zeroize::Zeroize;

const BASE_URL_ENV: &str = "STOREFRONT_API_BASE_URL";
const CLIENT_ID_ENV: &str = "STOREFRONT_CLIENT_ID";
const CLIENT_SECRET_ENV: &str = "STOREFRONT_CLIENT_SECRET";
const TIMEOUT_ENV: &str = "STOREFRONT_REQUEST_TIMEOUT_SECS";

/// `OAuth2` client secret.
///
/// The value is redacted from `Debug` output and wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Wrap a raw secret.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw secret for the Basic-auth header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(<redacted>)")
    }
}

impl Drop for ClientSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Raw storefront client settings.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STOREFRONT")]
pub struct StorefrontSettings {
    /// Backend base URL, for example `https://api.example.com`.
    pub api_base_url: Option<String>,
    /// `OAuth2` client identifier.
    pub client_id: Option<String>,
    /// `OAuth2` client secret.
    pub client_secret: Option<String>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
}

impl fmt::Debug for StorefrontSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorefrontSettings")
            .field("api_base_url", &self.api_base_url)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Errors raised while validating client settings.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is missing or blank.
    #[error("missing required setting: {name}")]
    MissingSetting {
        /// Environment variable naming the setting.
        name: &'static str,
    },
    /// The base URL does not parse.
    #[error("invalid value for {name}='{value}': {reason}")]
    InvalidUrl {
        /// Environment variable naming the setting.
        name: &'static str,
        /// Value as supplied.
        value: String,
        /// Parser error.
        reason: String,
    },
    /// The base URL uses a scheme other than http or https.
    #[error("{name} must use http or https, got '{scheme}'")]
    UnsupportedScheme {
        /// Environment variable naming the setting.
        name: &'static str,
        /// Scheme found in the URL.
        scheme: String,
    },
    /// The timeout is zero.
    #[error("{name} must be at least 1 second")]
    ZeroTimeout {
        /// Environment variable naming the setting.
        name: &'static str,
    },
}

/// Validated configuration consumed by [`crate::connect`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    client_id: String,
    client_secret: ClientSecret,
    request_timeout: Duration,
}

impl ClientConfig {
    /// Validate and build a configuration from parts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL is unusable, a credential is
    /// blank or the timeout is zero.
    ///
    /// The base URL path is normalised to end in `/`, so any prefix it
    /// carries stays in front of every request path.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use storefront::{ClientConfig, ClientSecret};
    ///
    /// let config = ClientConfig::new(
    ///     "https://api.example.test",
    ///     "storefront-web",
    ///     ClientSecret::new("s3cret"),
    ///     Duration::from_secs(10),
    /// )
    /// .expect("valid config");
    /// assert_eq!(config.base_url().as_str(), "https://api.example.test/");
    /// ```
    pub fn new(
        base_url: &str,
        client_id: &str,
        client_secret: ClientSecret,
        request_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url)?;
        let client_id = client_id.trim();
        if client_id.is_empty() {
            return Err(ConfigError::MissingSetting {
                name: CLIENT_ID_ENV,
            });
        }
        if client_secret.expose().trim().is_empty() {
            return Err(ConfigError::MissingSetting {
                name: CLIENT_SECRET_ENV,
            });
        }
        if request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout { name: TIMEOUT_ENV });
        }
        Ok(Self {
            base_url,
            client_id: client_id.to_owned(),
            client_secret,
            request_timeout,
        })
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `OAuth2` client identifier.
    #[must_use]
    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    /// `OAuth2` client secret.
    #[must_use]
    pub fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    /// Per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl TryFrom<StorefrontSettings> for ClientConfig {
    type Error = ConfigError;

    fn try_from(settings: StorefrontSettings) -> Result<Self, Self::Error> {
        let base_url = required(settings.api_base_url.as_deref(), BASE_URL_ENV)?;
        let client_id = required(settings.client_id.as_deref(), CLIENT_ID_ENV)?;
        let client_secret = required(settings.client_secret.as_deref(), CLIENT_SECRET_ENV)?;
        Self::new(
            base_url,
            client_id,
            ClientSecret::new(client_secret),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingSetting { name })
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|error| ConfigError::InvalidUrl {
        name: BASE_URL_ENV,
        value: raw.to_owned(),
        reason: error.to_string(),
    })?;
    let mut url = match url.scheme() {
        "http" | "https" => url,
        other => {
            return Err(ConfigError::UnsupportedScheme {
                name: BASE_URL_ENV,
                scheme: other.to_owned(),
            });
        }
    };
    if !url.path().ends_with('/') {
        let directory = format!("{}/", url.path());
        url.set_path(&directory);
    }
    Ok(url)
}
