//! The value of a profile selection control.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::ProfileId;

/// Errors that can occur when parsing a [`ProfileSelection`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionParseError {
    #[error("profile selection cannot be empty")]
    Empty,
    #[error("invalid profile selection: {0}")]
    Invalid(String),
}

/// Which profile a widget points at: a saved one, or "create new".
///
/// On the wire the "create new" choice is the `_new` sentinel and saved
/// profiles are their decimal id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProfileSelection {
    #[default]
    New,
    Existing(ProfileId),
}

impl ProfileSelection {
    /// Wire value of the "create new" choice.
    pub const NEW_SENTINEL: &'static str = "_new";

    /// Parse a submitted selection value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or neither `_new` nor an id.
    pub fn parse(s: &str) -> Result<Self, SelectionParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SelectionParseError::Empty);
        }
        if s == Self::NEW_SENTINEL {
            return Ok(Self::New);
        }
        s.parse::<ProfileId>()
            .map(Self::Existing)
            .map_err(|_| SelectionParseError::Invalid(s.to_owned()))
    }

    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::New)
    }

    /// The selected profile id, if an existing profile is selected.
    #[must_use]
    pub const fn profile_id(&self) -> Option<ProfileId> {
        match self {
            Self::New => None,
            Self::Existing(id) => Some(*id),
        }
    }
}

impl From<ProfileId> for ProfileSelection {
    fn from(id: ProfileId) -> Self {
        Self::Existing(id)
    }
}

impl fmt::Display for ProfileSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => f.write_str(Self::NEW_SENTINEL),
            Self::Existing(id) => write!(f, "{id}"),
        }
    }
}

impl std::str::FromStr for ProfileSelection {
    type Err = SelectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProfileSelection {
    type Error = SelectionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProfileSelection> for String {
    fn from(selection: ProfileSelection) -> Self {
        selection.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sentinel() {
        assert_eq!(ProfileSelection::parse("_new").unwrap(), ProfileSelection::New);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(
            ProfileSelection::parse("12").unwrap(),
            ProfileSelection::Existing(ProfileId::new(12))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            ProfileSelection::parse(""),
            Err(SelectionParseError::Empty)
        ));
        assert!(matches!(
            ProfileSelection::parse("new"),
            Err(SelectionParseError::Invalid(_))
        ));
    }

    #[test]
    fn test_display_matches_wire_format() {
        assert_eq!(ProfileSelection::New.to_string(), "_new");
        assert_eq!(ProfileSelection::Existing(ProfileId::new(4)).to_string(), "4");
    }

    #[test]
    fn test_serde_uses_wire_format() {
        let json = serde_json::to_string(&ProfileSelection::New).unwrap();
        assert_eq!(json, "\"_new\"");
        let parsed: ProfileSelection = serde_json::from_str("\"8\"").unwrap();
        assert_eq!(parsed.profile_id(), Some(ProfileId::new(8)));
    }
}
