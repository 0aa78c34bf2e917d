//! Uniform success/failure envelope for remote calls.
//!
//! [`run_action`] is the only place that turns a gateway outcome into an
//! [`ActionResult`]: successful responses are decoded into the declared
//! payload type, and every [`GatewayError`] becomes an [`ActionFailure`].
//! No retries happen here.

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::ser::{SerializeStruct, Serializer};
use tracing::warn;

use super::{ApiResponse, GatewayError};

/// Failure half of [`ActionResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFailure {
    error: String,
    code: Option<String>,
    status: Option<u16>,
}

impl ActionFailure {
    /// Human-readable message suitable for an error state in the UI.
    #[must_use]
    pub fn error(&self) -> &str {
        self.error.as_str()
    }

    /// Machine-readable failure code, when one applies.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// HTTP status of the failed response, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl From<GatewayError> for ActionFailure {
    fn from(value: GatewayError) -> Self {
        let code = value.failure_code();
        let status = value.status();
        Self {
            error: value.to_string(),
            code,
            status,
        }
    }
}

/// Outcome of a storefront action.
///
/// Serialises as `{"success": true, "data": ...}` or
/// `{"success": false, "error": ..., "code"?: ..., "status"?: ...}`.
///
/// # Examples
/// ```
/// use storefront::domain::{ActionResult, GatewayError};
///
/// let ok: ActionResult<u32> = Ok(7).into();
/// assert_eq!(ok.data(), Some(&7));
///
/// let failed: ActionResult<u32> = Err(GatewayError::authentication()).into();
/// let json = serde_json::to_value(&failed).expect("serialises");
/// assert_eq!(json, serde_json::json!({ "success": false, "error": "Authentication failed" }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    /// The call succeeded and the payload passed validation.
    Success {
        /// Decoded payload.
        data: T,
    },
    /// The call failed; see [`ActionFailure`].
    Failure(ActionFailure),
}

impl<T> ActionResult<T> {
    /// Whether the action succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Payload of a successful action.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure(_) => None,
        }
    }

    /// Failure details of an unsuccessful action.
    #[must_use]
    pub fn failure(&self) -> Option<&ActionFailure> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Convert into a plain `Result`.
    ///
    /// # Errors
    ///
    /// Returns the [`ActionFailure`] of an unsuccessful action.
    pub fn into_result(self) -> Result<T, ActionFailure> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure(failure) => Err(failure),
        }
    }
}

impl<T> From<Result<T, GatewayError>> for ActionResult<T> {
    fn from(value: Result<T, GatewayError>) -> Self {
        match value {
            Ok(data) => Self::Success { data },
            Err(error) => Self::Failure(error.into()),
        }
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success { data } => {
                let mut state = serializer.serialize_struct("ActionResult", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
                state.end()
            }
            Self::Failure(failure) => {
                let len = 2
                    + usize::from(failure.code.is_some())
                    + usize::from(failure.status.is_some());
                let mut state = serializer.serialize_struct("ActionResult", len)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("error", &failure.error)?;
                if let Some(code) = &failure.code {
                    state.serialize_field("code", code)?;
                }
                if let Some(status) = failure.status {
                    state.serialize_field("status", &status)?;
                }
                state.end()
            }
        }
    }
}

/// Decode a response body into `T`, reclassifying decode failures.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] when the body is not valid JSON or
/// does not satisfy `T`'s validated shape.
pub fn decode_payload<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(body).map_err(|error| GatewayError::validation(error.to_string()))
}

/// Await a gateway call and fold its outcome into an [`ActionResult`].
///
/// # Examples
/// ```
/// use storefront::domain::{ApiResponse, run_action};
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let result = run_action::<Vec<u32>, _>(async { Ok(ApiResponse::new(200, "[1,2]")) }).await;
/// assert_eq!(result.data(), Some(&vec![1, 2]));
/// # });
/// ```
pub async fn run_action<T, F>(call: F) -> ActionResult<T>
where
    T: DeserializeOwned,
    F: Future<Output = Result<ApiResponse, GatewayError>>,
{
    let outcome = match call.await {
        Ok(response) => decode_payload::<T>(response.body()),
        Err(error) => Err(error),
    };
    if let Err(error) = &outcome {
        let code = error.failure_code();
        warn!(
            error = %error,
            code = code.as_deref().unwrap_or("none"),
            "storefront action failed"
        );
    }
    outcome.into()
}
