//! Driven ports used by the gateway.

mod macros;
pub(crate) use macros::define_port_error;

mod http_transport;
mod token_provider;

#[cfg(test)]
pub use http_transport::MockHttpTransport;
pub use http_transport::{HttpTransport, TransportError};
#[cfg(test)]
pub use token_provider::MockTokenProvider;
pub use token_provider::{FixtureTokenProvider, TokenProvider};
