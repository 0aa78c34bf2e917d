//! Typed storefront read actions.
//!
//! Each action is a thin pass-through: build the request, send it through
//! the gateway, and decode the payload via [`run_action`].

use std::sync::Arc;

use super::{
    ActionResult, ApiRequest, AuthenticatedGateway, MenuCategory, MenuItem, Testimonial,
    run_action,
};

/// Path of the full menu listing.
pub const MENU_PATH: &str = "/api/menu";
/// Path of the favourites carousel listing.
pub const FAVORITES_PATH: &str = "/api/menu/favorites";
/// Path of the testimonials listing.
pub const TESTIMONIALS_PATH: &str = "/api/testimonials";

/// Storefront actions backed by an [`AuthenticatedGateway`].
#[derive(Clone)]
pub struct StorefrontActions {
    gateway: Arc<AuthenticatedGateway>,
}

impl StorefrontActions {
    /// Wrap a shared gateway.
    #[must_use]
    pub fn new(gateway: Arc<AuthenticatedGateway>) -> Self {
        Self { gateway }
    }

    /// Underlying gateway, for callers issuing their own requests.
    #[must_use]
    pub fn gateway(&self) -> &AuthenticatedGateway {
        &self.gateway
    }

    /// Fetch the whole menu.
    pub async fn get_menu(&self) -> ActionResult<Vec<MenuItem>> {
        self.fetch(ApiRequest::get(MENU_PATH)).await
    }

    /// Fetch the menu items of one category.
    pub async fn get_menu_by_category(&self, category: &MenuCategory) -> ActionResult<Vec<MenuItem>> {
        self.fetch(ApiRequest::get(MENU_PATH).with_query("category", category.as_ref()))
            .await
    }

    /// Fetch the items shown in the favourites carousel.
    pub async fn get_favorites(&self) -> ActionResult<Vec<MenuItem>> {
        self.fetch(ApiRequest::get(FAVORITES_PATH)).await
    }

    /// Fetch customer testimonials.
    pub async fn get_testimonials(&self) -> ActionResult<Vec<Testimonial>> {
        self.fetch(ApiRequest::get(TESTIMONIALS_PATH)).await
    }

    async fn fetch<T>(&self, request: ApiRequest) -> ActionResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        run_action(self.gateway.send(&request)).await
    }
}
