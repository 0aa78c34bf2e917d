//! Domain types, services, and ports for the storefront client.
//!
//! Nothing in this module knows about reqwest or any concrete transport.
//! Adapters in [`crate::outbound`] implement the traits in [`ports`].

pub mod action_result;
pub mod actions;
pub mod error;
pub mod gateway;
pub mod menu;
pub mod ports;
pub mod request;
pub mod testimonial;
pub mod text;

pub use action_result::{ActionFailure, ActionResult, decode_payload, run_action};
pub use actions::StorefrontActions;
pub use error::{FailureCode, GatewayError};
pub use gateway::AuthenticatedGateway;
pub use menu::{MenuCategory, MenuItem, MenuValidationError, Price};
pub use request::{ApiRequest, ApiResponse, HttpMethod};
pub use testimonial::{Rating, Testimonial, TestimonialValidationError};
pub use text::{NonEmptyText, TextValidationError};
