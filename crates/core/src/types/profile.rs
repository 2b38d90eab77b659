//! Customer profiles and the entities they hang off.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Address, ProfileId, UserId};

/// A profile bundle, e.g. `customer` or `shipping`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileType {
    /// Machine name used in configuration.
    pub id: String,
    /// Human readable name.
    pub label: String,
}

impl ProfileType {
    /// Create a profile type whose label matches its id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
        }
    }
}

/// The user a profile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Owner {
    pub id: UserId,
}

impl Owner {
    /// The anonymous owner.
    pub const ANONYMOUS: Self = Self {
        id: UserId::ANONYMOUS,
    };

    #[must_use]
    pub const fn new(id: UserId) -> Self {
        Self { id }
    }

    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.id.is_anonymous()
    }
}

/// A reusable record of address and contact data owned by a user.
///
/// A profile without an id has never been saved. Stores assign the id and
/// the timestamps on first save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Option<ProfileId>,
    pub owner: UserId,
    pub profile_type: String,
    pub address: Option<Address>,
    /// Additional single-value text fields, keyed by field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
    /// Whether this is the owner's default profile of its type.
    #[serde(default)]
    pub is_default: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Create a new, unsaved profile.
    #[must_use]
    pub fn new(profile_type: &ProfileType, owner: Owner) -> Self {
        Self {
            id: None,
            owner: owner.id,
            profile_type: profile_type.id.clone(),
            address: None,
            fields: BTreeMap::new(),
            is_default: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Builder-style helper to attach an address.
    #[must_use]
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Returns `true` if this profile has never been saved.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Display label: the first address line, or a generic fallback.
    #[must_use]
    pub fn label(&self) -> String {
        let line1 = self
            .address
            .as_ref()
            .and_then(|a| a.address_line1.as_deref())
            .filter(|l| !l.is_empty());

        match (line1, self.id) {
            (Some(line), _) => line.to_owned(),
            (None, Some(id)) => format!("Profile #{id}"),
            (None, None) => "New profile".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> ProfileType {
        ProfileType::new("customer")
    }

    #[test]
    fn test_new_profile_is_unsaved() {
        let profile = Profile::new(&customer(), Owner::new(UserId::new(5)));
        assert!(profile.is_new());
        assert_eq!(profile.owner, UserId::new(5));
        assert_eq!(profile.profile_type, "customer");
        assert!(!profile.is_default);
    }

    #[test]
    fn test_label_uses_first_address_line() {
        let profile = Profile::new(&customer(), Owner::ANONYMOUS).with_address(Address {
            address_line1: Some("Thomaskirchhof 15".to_string()),
            ..Default::default()
        });
        assert_eq!(profile.label(), "Thomaskirchhof 15");
    }

    #[test]
    fn test_label_fallbacks() {
        let mut profile = Profile::new(&customer(), Owner::ANONYMOUS);
        assert_eq!(profile.label(), "New profile");
        profile.id = Some(ProfileId::new(9));
        assert_eq!(profile.label(), "Profile #9");
        profile.address = Some(Address {
            address_line1: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(profile.label(), "Profile #9");
    }
}
