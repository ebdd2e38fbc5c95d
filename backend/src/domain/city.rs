//! City names used as the lookup key for weather, forecasts and favourites.
//!
//! The raw string is kept verbatim. No case folding or whitespace trimming is
//! applied, so `"London"` and `"london"` are distinct cities with distinct
//! cache entries and distinct upstream calls.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of characters accepted in a city name.
pub const CITY_MIN_CHARS: usize = 2;
/// Maximum number of characters accepted in a city name.
pub const CITY_MAX_CHARS: usize = 60;

/// Validation failures raised by [`City::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CityValidationError {
    #[error("city must not be blank")]
    Blank,
    #[error("city must be at least {min} characters")]
    TooShort { min: usize },
    #[error("city must be at most {max} characters")]
    TooLong { max: usize },
}

impl CityValidationError {
    /// Stable machine-readable code used in validation error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Blank => "blank_city",
            Self::TooShort { .. } => "city_too_short",
            Self::TooLong { .. } => "city_too_long",
        }
    }
}

/// Validated city name.
///
/// # Examples
/// ```
/// use weather_gateway::domain::City;
///
/// let city = City::new("Paris").expect("valid city");
/// assert_eq!(city.as_str(), "Paris");
/// assert!(City::new(" ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct City(String);

impl City {
    pub fn new(value: impl Into<String>) -> Result<Self, CityValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(CityValidationError::Blank);
        }
        let length = raw.chars().count();
        if length < CITY_MIN_CHARS {
            return Err(CityValidationError::TooShort {
                min: CITY_MIN_CHARS,
            });
        }
        if length > CITY_MAX_CHARS {
            return Err(CityValidationError::TooLong {
                max: CITY_MAX_CHARS,
            });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for City {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for City {
    type Error = CityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for City {
    type Error = CityValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<City> for String {
    fn from(value: City) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_names_are_rejected(#[case] raw: &str) {
        assert_eq!(City::new(raw), Err(CityValidationError::Blank));
    }

    #[rstest]
    fn single_character_is_too_short() {
        assert_eq!(
            City::new("X"),
            Err(CityValidationError::TooShort { min: 2 })
        );
    }

    #[rstest]
    fn sixty_one_characters_is_too_long() {
        let raw = "a".repeat(61);
        assert_eq!(
            City::new(raw),
            Err(CityValidationError::TooLong { max: 60 })
        );
    }

    #[rstest]
    #[case("Rio")]
    #[case("São Paulo")]
    #[case(" London ")]
    fn names_are_kept_verbatim(#[case] raw: &str) {
        let city = City::new(raw).expect("valid city");
        assert_eq!(city.as_str(), raw);
    }

    #[rstest]
    fn length_counts_characters_not_bytes() {
        let raw = "é".repeat(60);
        assert!(City::new(raw).is_ok());
    }

    #[rstest]
    fn case_is_significant() {
        let upper = City::new("London").expect("valid city");
        let lower = City::new("london").expect("valid city");
        assert_ne!(upper, lower);
    }

    #[rstest]
    fn deserialisation_validates() {
        let err = serde_json::from_str::<City>("\"A\"").expect_err("too short");
        assert!(err.to_string().contains("at least 2"));
        let city: City = serde_json::from_str("\"Oslo\"").expect("valid city");
        assert_eq!(city.as_str(), "Oslo");
    }
}
