//! Demo data for the in-memory profile store.
//!
//! A seed file is JSON:
//!
//! ```json
//! {
//!   "users": [{ "id": 1, "name": "Ada Lovelace" }],
//!   "profiles": [
//!     {
//!       "owner": 1,
//!       "is_default": true,
//!       "address": { "country_code": "GB", "address_line1": "12 St James's Square", "locality": "London" }
//!     }
//!   ]
//! }
//! ```
//!
//! Profiles without a `profile_type` get the checkout's configured type.

use std::collections::BTreeMap;
use std::path::Path;

use profile_select::{InMemoryProfileStore, ProfileStore, StoreError};
use profile_select_core::{Address, Owner, ProfileType, UserId};
use serde::Deserialize;
use thiserror::Error;

use crate::models::DemoUser;

/// Errors loading seed data.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid seed file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("profile owner {0} is not a seeded user")]
    UnknownOwner(UserId),
    #[error("failed to store seed profile: {0}")]
    Store(#[from] StoreError),
}

/// Users and profiles to load at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub users: Vec<DemoUser>,
    #[serde(default)]
    pub profiles: Vec<SeedProfile>,
}

/// One seeded profile.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedProfile {
    pub owner: UserId,
    #[serde(default)]
    pub profile_type: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub is_default: bool,
}

impl Seed {
    /// Read a seed file.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Built-in demo data: one customer with two saved addresses and one
    /// without any.
    #[must_use]
    pub fn demo() -> Self {
        let ada = UserId::new(1);
        Self {
            users: vec![
                DemoUser {
                    id: ada,
                    name: "Ada Lovelace".to_string(),
                },
                DemoUser {
                    id: UserId::new(2),
                    name: "Charles Babbage".to_string(),
                },
            ],
            profiles: vec![
                SeedProfile {
                    owner: ada,
                    profile_type: None,
                    address: Some(Address {
                        country_code: Some("GB".to_string()),
                        given_name: Some("Ada".to_string()),
                        family_name: Some("Lovelace".to_string()),
                        address_line1: Some("12 St James's Square".to_string()),
                        locality: Some("London".to_string()),
                        postal_code: Some("SW1Y 4LB".to_string()),
                        ..Default::default()
                    }),
                    fields: BTreeMap::new(),
                    is_default: true,
                },
                SeedProfile {
                    owner: ada,
                    profile_type: None,
                    address: Some(Address {
                        country_code: Some("GB".to_string()),
                        given_name: Some("Ada".to_string()),
                        family_name: Some("Lovelace".to_string()),
                        address_line1: Some("Horsley Towers".to_string()),
                        locality: Some("East Horsley".to_string()),
                        postal_code: Some("KT24 6DT".to_string()),
                        ..Default::default()
                    }),
                    fields: BTreeMap::new(),
                    is_default: false,
                },
            ],
        }
    }

    /// Load the seed into `store`. Returns the number of profiles saved.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if a profile's owner is not seeded or the store fails.
    pub fn load_into(&self, store: &InMemoryProfileStore, default_type: &ProfileType) -> Result<usize, SeedError> {
        for user in self.users.iter().filter(|u| !u.id.is_anonymous()) {
            store.register_user(user.id)?;
        }

        for seed in &self.profiles {
            let owner = store.owner(seed.owner)?.ok_or(SeedError::UnknownOwner(seed.owner))?;
            let profile_type = match &seed.profile_type {
                Some(id) => match store.profile_type(id)? {
                    Some(profile_type) => profile_type,
                    None => {
                        let profile_type = ProfileType::new(id.clone());
                        store.register_profile_type(profile_type.clone())?;
                        profile_type
                    }
                },
                None => default_type.clone(),
            };

            let mut profile = store.create(&profile_type, Owner::new(owner.id));
            profile.address.clone_from(&seed.address);
            profile.fields.clone_from(&seed.fields);
            profile.is_default = seed.is_default;
            store.save(&mut profile)?;
        }

        tracing::info!(
            users = self.users.len(),
            profiles = self.profiles.len(),
            "seed data loaded"
        );
        Ok(self.profiles.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn customer() -> ProfileType {
        ProfileType::new("customer")
    }

    #[test]
    fn test_demo_seed_loads() {
        let store = InMemoryProfileStore::new([customer()]);
        let count = Seed::demo().load_into(&store, &customer()).unwrap();
        assert_eq!(count, 2);

        let profiles = store
            .load_all_for_owner(Owner::new(UserId::new(1)), &customer(), true)
            .unwrap();
        assert_eq!(profiles.len(), 2);
        assert!(profiles[0].is_default);
        assert_eq!(profiles[0].label(), "12 St James's Square");
    }

    #[test]
    fn test_parse_seed_json() {
        let seed: Seed = serde_json::from_str(
            r#"{
                "users": [{ "id": 5, "name": "Grace Hopper" }],
                "profiles": [
                    { "owner": 5, "profile_type": "shipping", "address": { "locality": "Arlington" } }
                ]
            }"#,
        )
        .unwrap();

        let store = InMemoryProfileStore::new([customer()]);
        seed.load_into(&store, &customer()).unwrap();

        let shipping = store.profile_type("shipping").unwrap().unwrap();
        let profiles = store
            .load_all_for_owner(Owner::new(UserId::new(5)), &shipping, true)
            .unwrap();
        assert_eq!(profiles.len(), 1);
    }

    #[test]
    fn test_unknown_owner_rejected() {
        let seed: Seed = serde_json::from_str(r#"{ "profiles": [{ "owner": 9 }] }"#).unwrap();
        let store = InMemoryProfileStore::new([customer()]);
        assert!(matches!(
            seed.load_into(&store, &customer()),
            Err(SeedError::UnknownOwner(_))
        ));
    }
}
