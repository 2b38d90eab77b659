//! ISO 3166-1 alpha-2 country code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryCodeError {
    /// The input string is empty.
    #[error("country code cannot be empty")]
    Empty,
    /// The input is not exactly two characters.
    #[error("country code must be 2 letters (got {len})")]
    InvalidLength {
        /// Length of the rejected input.
        len: usize,
    },
    /// The input contains something other than ASCII letters.
    #[error("country code must only contain ASCII letters: {0}")]
    InvalidCharacters(String),
}

/// A two-letter country code, always stored upper case.
///
/// ## Examples
///
/// ```
/// use profile_select_core::CountryCode;
///
/// assert_eq!(CountryCode::parse("fr").unwrap().as_str(), "FR");
/// assert!(CountryCode::parse("").is_err());
/// assert!(CountryCode::parse("USA").is_err());
/// assert!(CountryCode::parse("1A").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a `CountryCode`, normalizing to upper case.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not two characters long, or
    /// contains anything other than ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CountryCodeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CountryCodeError::Empty);
        }

        let len = s.chars().count();
        if len != 2 {
            return Err(CountryCodeError::InvalidLength { len });
        }

        if !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CountryCodeError::InvalidCharacters(s.to_owned()));
        }

        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CountryCode {
    type Err = CountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = CountryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercases() {
        assert_eq!(CountryCode::parse("hu").unwrap().as_str(), "HU");
        assert_eq!(CountryCode::parse(" de ").unwrap().as_str(), "DE");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(CountryCode::parse(""), Err(CountryCodeError::Empty)));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            CountryCode::parse("FRA"),
            Err(CountryCodeError::InvalidLength { len: 3 })
        ));
    }

    #[test]
    fn test_parse_non_letters() {
        assert!(matches!(
            CountryCode::parse("U1"),
            Err(CountryCodeError::InvalidCharacters(_))
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let code: CountryCode = serde_json::from_str("\"tw\"").unwrap();
        assert_eq!(code.as_str(), "TW");
        assert!(serde_json::from_str::<CountryCode>("\"Taiwan\"").is_err());
    }
}
