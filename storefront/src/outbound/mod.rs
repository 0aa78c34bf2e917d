//! Outbound adapters implementing domain ports for the remote backend.
//!
//! Adapters are thin translators between domain descriptors and reqwest.
//! They contain no retry or re-authentication logic.

pub mod http;
