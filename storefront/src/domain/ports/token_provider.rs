//! Driven port for re-establishing the backend session.
//!
//! A successful call leaves a fresh session cookie in the shared cookie jar.
//! The credential itself is never handed back to the caller.

use async_trait::async_trait;

/// Port performing the client-credentials exchange.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Authenticate against the token endpoint.
    ///
    /// Returns `false` on any non-success status or network failure; never
    /// returns an error.
    async fn authenticate(&self) -> bool;
}

/// Fixture provider returning a fixed outcome.
#[derive(Debug, Clone, Copy)]
pub struct FixtureTokenProvider {
    succeeds: bool,
}

impl FixtureTokenProvider {
    /// Provider whose authentication always succeeds.
    #[must_use]
    pub const fn succeeding() -> Self {
        Self { succeeds: true }
    }

    /// Provider whose authentication always fails.
    #[must_use]
    pub const fn failing() -> Self {
        Self { succeeds: false }
    }
}

#[async_trait]
impl TokenProvider for FixtureTokenProvider {
    async fn authenticate(&self) -> bool {
        self.succeeds
    }
}
