//! Menu payload models.
//!
//! Decoding a menu response runs every field through its validated type, so a
//! successfully decoded [`MenuItem`] is structurally and semantically sound.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::NonEmptyText;

/// Validation errors for menu fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuValidationError {
    /// Price is NaN or infinite.
    NonFinitePrice,
    /// Price is below zero.
    NegativePrice,
    /// Category slug is empty.
    EmptyCategory,
    /// Category slug contains characters outside `[a-z0-9-]`.
    InvalidCategory,
}

impl fmt::Display for MenuValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinitePrice => write!(f, "price must be a finite number"),
            Self::NegativePrice => write!(f, "price must not be negative"),
            Self::EmptyCategory => write!(f, "category must not be empty"),
            Self::InvalidCategory => write!(
                f,
                "category may only contain lowercase letters, digits, or hyphens",
            ),
        }
    }
}

impl std::error::Error for MenuValidationError {}

/// Non-negative, finite item price in the restaurant's currency.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    /// Validate and construct a price.
    ///
    /// # Errors
    ///
    /// Returns [`MenuValidationError`] for non-finite or negative values.
    pub fn new(value: f64) -> Result<Self, MenuValidationError> {
        if !value.is_finite() {
            return Err(MenuValidationError::NonFinitePrice);
        }
        if value < 0.0 {
            return Err(MenuValidationError::NegativePrice);
        }
        Ok(Self(value))
    }

    /// Raw price value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

impl TryFrom<f64> for Price {
    type Error = MenuValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Category slug used to filter menu queries, such as `mains` or `hot-drinks`.
///
/// # Examples
/// ```
/// use storefront::domain::MenuCategory;
///
/// assert!(MenuCategory::new("hot-drinks").is_ok());
/// assert!(MenuCategory::new("Hot Drinks").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MenuCategory(String);

impl MenuCategory {
    /// Validate and construct a category slug.
    ///
    /// # Errors
    ///
    /// Returns [`MenuValidationError`] when the slug is empty or contains
    /// characters other than lowercase ASCII letters, digits, and hyphens.
    pub fn new(value: impl AsRef<str>) -> Result<Self, MenuValidationError> {
        let value = value.as_ref();
        if value.is_empty() {
            return Err(MenuValidationError::EmptyCategory);
        }
        let valid = value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid {
            return Err(MenuValidationError::InvalidCategory);
        }
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for MenuCategory {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<MenuCategory> for String {
    fn from(value: MenuCategory) -> Self {
        value.0
    }
}

impl TryFrom<String> for MenuCategory {
    type Error = MenuValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Backend identifier.
    pub id: u64,
    /// Display name.
    pub name: NonEmptyText,
    /// Optional description shown under the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price.
    pub price: Price,
    /// Category label as shown in the menu.
    pub category: NonEmptyText,
    /// Optional image location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Whether the item belongs to the favourites carousel.
    #[serde(default)]
    pub is_favorite: bool,
}
