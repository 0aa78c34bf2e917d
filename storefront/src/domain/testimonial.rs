//! Customer testimonial payload model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::NonEmptyText;

/// Lowest accepted star rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted star rating.
pub const RATING_MAX: u8 = 5;

/// Validation errors for testimonial fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestimonialValidationError {
    /// Rating outside `RATING_MIN..=RATING_MAX`.
    RatingOutOfRange {
        /// Rating as received.
        value: u8,
    },
}

impl fmt::Display for TestimonialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RatingOutOfRange { value } => write!(
                f,
                "rating must be between {RATING_MIN} and {RATING_MAX}, got {value}",
            ),
        }
    }
}

impl std::error::Error for TestimonialValidationError {}

/// Star rating from one to five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Validate and construct a rating.
    ///
    /// # Errors
    ///
    /// Returns [`TestimonialValidationError::RatingOutOfRange`] for values
    /// outside one to five.
    pub fn new(value: u8) -> Result<Self, TestimonialValidationError> {
        if (RATING_MIN..=RATING_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TestimonialValidationError::RatingOutOfRange { value })
        }
    }

    /// Raw star count.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = TestimonialValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One customer quote shown in the testimonials section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    /// Backend identifier.
    pub id: u64,
    /// Customer name.
    pub author: NonEmptyText,
    /// The quote itself.
    pub quote: NonEmptyText,
    /// Star rating.
    pub rating: Rating,
    /// Optional descriptor such as "Regular since 2019".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}
