//! Validated text fields shared by payload models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`NonEmptyText::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextValidationError {
    /// The value is empty once trimmed.
    Empty,
    /// The value exceeds the maximum length.
    TooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
}

impl fmt::Display for TextValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "text must not be empty"),
            Self::TooLong { max } => write!(f, "text must be at most {max} characters"),
        }
    }
}

impl std::error::Error for TextValidationError {}

/// Maximum accepted length for free text fields.
pub const TEXT_MAX: usize = 2_000;

/// A non-blank string, trimmed of surrounding whitespace.
///
/// # Examples
/// ```
/// use storefront::domain::NonEmptyText;
///
/// let name = NonEmptyText::new("  Margherita ").expect("valid text");
/// assert_eq!(name.as_ref(), "Margherita");
/// assert!(NonEmptyText::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Validate and construct from borrowed input.
    ///
    /// # Errors
    ///
    /// Returns [`TextValidationError`] when the trimmed value is empty or
    /// longer than [`TEXT_MAX`] characters.
    pub fn new(value: impl AsRef<str>) -> Result<Self, TextValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextValidationError::Empty);
        }
        if trimmed.chars().count() > TEXT_MAX {
            return Err(TextValidationError::TooLong { max: TEXT_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NonEmptyText> for String {
    fn from(value: NonEmptyText) -> Self {
        value.0
    }
}

impl TryFrom<String> for NonEmptyText {
    type Error = TextValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", TextValidationError::Empty)]
    #[case(" \t\n", TextValidationError::Empty)]
    fn blank_values_are_rejected(#[case] raw: &str, #[case] expected: TextValidationError) {
        assert_eq!(NonEmptyText::new(raw), Err(expected));
    }

    #[test]
    fn overlong_values_are_rejected() {
        let raw = "a".repeat(TEXT_MAX + 1);
        assert_eq!(
            NonEmptyText::new(raw),
            Err(TextValidationError::TooLong { max: TEXT_MAX })
        );
    }

    #[test]
    fn deserialisation_applies_validation() {
        let error = serde_json::from_str::<NonEmptyText>("\"  \"").expect_err("blank rejected");
        assert!(error.to_string().contains("text must not be empty"));
    }
}
