//! Authenticated request gateway.
//!
//! The gateway sends a request through the [`HttpTransport`] port and, on a
//! `401 Unauthorized`, asks the [`TokenProvider`] to re-establish the session
//! before reissuing the identical request exactly once. A second `401` is
//! terminal.
//!
//! Re-authentication is single-flight. Each completed token exchange bumps a
//! re-authentication epoch. A call records the epoch before it sends; when its
//! `401` arrives after another call already re-authenticated (the epoch moved
//! on), it reuses that outcome instead of starting a new exchange. Only the
//! epoch and the last outcome are kept; session credentials stay in the
//! transport's cookie jar.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::ports::{HttpTransport, TokenProvider};
use super::{ApiRequest, ApiResponse, GatewayError};

#[derive(Debug, Default)]
struct ReauthState {
    epoch: u64,
    last_succeeded: bool,
}

/// Sends backend requests, re-authenticating once on `401 Unauthorized`.
pub struct AuthenticatedGateway {
    transport: Arc<dyn HttpTransport>,
    token_provider: Arc<dyn TokenProvider>,
    epoch: AtomicU64,
    reauth: Mutex<ReauthState>,
}

impl AuthenticatedGateway {
    /// Build a gateway over the given ports.
    /// ```rust,ignore
    /// let gateway = AuthenticatedGateway::new(Arc::new(transport), Arc::new(provider));
    /// ```
    pub fn new(transport: Arc<dyn HttpTransport>, token_provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            transport,
            token_provider,
            epoch: AtomicU64::new(0),
            reauth: Mutex::new(ReauthState::default()),
        }
    }

    /// Number of token exchanges performed so far.
    #[must_use]
    pub fn reauthentication_epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Send `request`, re-authenticating and retrying once on `401`.
    ///
    /// Any non-`401` response is handled without retry: `2xx` responses are
    /// returned verbatim, everything else becomes [`GatewayError::Api`].
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Transport`] when no response was received;
    /// - [`GatewayError::Authentication`] when re-authentication failed;
    /// - [`GatewayError::Api`] for a non-success status, including a `401`
    ///   on the retried request.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, GatewayError> {
        let observed_epoch = self.epoch.load(Ordering::Acquire);
        debug!(
            method = %request.method(),
            path = request.path(),
            epoch = observed_epoch,
            "sending storefront request"
        );
        let response = self.transport.execute(request).await?;
        if !response.is_unauthorized() {
            return into_outcome(request, response);
        }

        warn!(
            method = %request.method(),
            path = request.path(),
            "backend rejected session; re-authenticating"
        );
        if !self.reauthenticate(observed_epoch).await {
            return Err(GatewayError::authentication());
        }

        let retried = self.transport.execute(request).await?;
        into_outcome(request, retried)
    }

    async fn reauthenticate(&self, observed_epoch: u64) -> bool {
        let mut state = self.reauth.lock().await;
        if state.epoch > observed_epoch {
            log_reused_outcome(&state);
            return state.last_succeeded;
        }

        let succeeded = self.token_provider.authenticate().await;
        state.epoch += 1;
        state.last_succeeded = succeeded;
        self.epoch.store(state.epoch, Ordering::Release);
        log_reauthentication(state.epoch, succeeded);
        succeeded
    }
}

fn log_reused_outcome(state: &ReauthState) {
    debug!(
        epoch = state.epoch,
        succeeded = state.last_succeeded,
        "reusing concurrent re-authentication outcome"
    );
}

fn log_reauthentication(epoch: u64, succeeded: bool) {
    if succeeded {
        info!(epoch, "re-authenticated with backend");
    } else {
        warn!(epoch, "re-authentication failed");
    }
}

fn into_outcome(request: &ApiRequest, response: ApiResponse) -> Result<ApiResponse, GatewayError> {
    if response.is_success() {
        return Ok(response);
    }
    debug!(
        method = %request.method(),
        path = request.path(),
        status = response.status(),
        "storefront request failed"
    );
    Err(GatewayError::from_status(response.status(), response.body()))
}

#[cfg(test)]
mod tests;
