//! Error taxonomy for authenticated storefront calls.
//!
//! Every lower-level failure is reclassified into [`GatewayError`] before it
//! reaches the [`crate::domain::ActionResult`] wrapper.

use serde::Deserialize;

use super::ports::{TransportError, define_port_error};

const BODY_PREVIEW_CHAR_LIMIT: usize = 160;

define_port_error! {
    /// Failures surfaced by the authenticated request gateway.
    pub enum GatewayError {
        /// Re-authentication after a `401 Unauthorized` did not succeed.
        Authentication => "Authentication failed",
        /// The backend answered with a non-success status.
        Api { status: u16, message: String, code: Option<String> } =>
            "{message}",
        /// The response body did not match the declared payload shape.
        Validation { message: String } =>
            "Invalid data format: {message}",
        /// The request never produced an HTTP response.
        Transport { message: String } =>
            "Network request failed: {message}",
    }
}

impl GatewayError {
    /// Build an [`GatewayError::Api`] from a failed response.
    ///
    /// The backend's JSON error body is used when it carries a `message`
    /// (or `error`) and optional `code`; otherwise a whitespace-collapsed
    /// preview of the body, or the bare status, becomes the message.
    ///
    /// # Examples
    /// ```
    /// use storefront::domain::GatewayError;
    ///
    /// let error = GatewayError::from_status(404, br#"{"message":"No such dish","code":"NOT_FOUND"}"#);
    /// assert_eq!(error.status(), Some(404));
    /// assert_eq!(error.to_string(), "No such dish");
    /// ```
    #[must_use]
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        if let Ok(parsed) = serde_json::from_slice::<ApiErrorBodyDto>(body) {
            let message = parsed
                .message
                .or(parsed.error)
                .filter(|message| !message.trim().is_empty());
            if let Some(message) = message {
                return Self::api(status, message, parsed.code);
            }
        }

        let preview = body_preview(body);
        let message = if preview.is_empty() {
            format!("request failed with status {status}")
        } else {
            format!("request failed with status {status}: {preview}")
        };
        Self::api(status, message, None::<String>)
    }

    /// HTTP status carried by [`GatewayError::Api`], if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable failure code surfaced to callers of the wrapper.
    ///
    /// Authentication failures carry no code; API errors prefer the code
    /// reported by the backend.
    #[must_use]
    pub fn failure_code(&self) -> Option<String> {
        match self {
            Self::Authentication => None,
            Self::Api { code, .. } => Some(
                code.clone()
                    .unwrap_or_else(|| FailureCode::Api.as_str().to_owned()),
            ),
            Self::Validation { .. } => Some(FailureCode::Validation.as_str().to_owned()),
            Self::Transport { .. } => Some(FailureCode::Network.as_str().to_owned()),
        }
    }
}

impl From<TransportError> for GatewayError {
    fn from(value: TransportError) -> Self {
        Self::transport(value.to_string())
    }
}

/// Failure codes attached to [`crate::domain::ActionFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCode {
    /// Non-success HTTP status without a backend-supplied code.
    Api,
    /// Payload failed structural or semantic validation.
    Validation,
    /// Network-level failure before any response arrived.
    Network,
}

impl FailureCode {
    /// Wire representation of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Api => "API_ERROR",
            Self::Validation => "VALIDATION_ERROR",
            Self::Network => "NETWORK_ERROR",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBodyDto {
    message: Option<String>,
    error: Option<String>,
    code: Option<String>,
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact
        .chars()
        .take(BODY_PREVIEW_CHAR_LIMIT)
        .collect::<String>();
    if compact.chars().count() > BODY_PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
