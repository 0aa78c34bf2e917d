//! Authenticated client for the restaurant storefront backend.
//!
//! The crate is split the same way as a hexagonal service:
//!
//! - [`domain`] owns the request descriptors, the gateway that re-authenticates
//!   on `401 Unauthorized`, the [`domain::ActionResult`] envelope, and the
//!   validated payload models;
//! - [`outbound`] provides the reqwest-backed adapters for the domain ports;
//! - [`config`] loads and validates client settings.

pub mod client;
pub mod config;
pub mod domain;
pub mod outbound;

pub use client::{ClientBuildError, connect};
pub use config::{ClientConfig, ClientSecret, ConfigError, StorefrontSettings};
pub use domain::{ActionResult, StorefrontActions};
