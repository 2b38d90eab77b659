//! Profile storage.
//!
//! [`ProfileStore`] is the widget's only way to reach saved profiles.
//! [`InMemoryProfileStore`] backs tests and the demo checkout.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use chrono::Utc;
use profile_select_core::{Owner, Profile, ProfileId, ProfileType, UserId};
use thiserror::Error;

/// Errors from a profile store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A lock around the store data was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// Saving a profile that claims an id the store does not know.
    #[error("profile {0} does not exist")]
    NotFound(ProfileId),

    /// The backing storage failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Access to profiles, their types and their owners.
///
/// Implementations decide how concurrent saves of the same profile are
/// resolved; the widget saves at most once per instance and request.
pub trait ProfileStore {
    /// Look up a profile type by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the storage fails.
    fn profile_type(&self, id: &str) -> Result<Option<ProfileType>, StoreError>;

    /// Look up an owner. [`UserId::ANONYMOUS`] must always resolve.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the storage fails.
    fn owner(&self, id: UserId) -> Result<Option<Owner>, StoreError>;

    /// Instantiate a new, unsaved profile.
    fn create(&self, profile_type: &ProfileType, owner: Owner) -> Profile {
        Profile::new(profile_type, owner)
    }

    /// Load a saved profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the storage fails.
    fn load(&self, id: ProfileId) -> Result<Option<Profile>, StoreError>;

    /// Load every profile of `profile_type` owned by `owner`, the default one
    /// first, then newest first. With `include_default` unset the owner's
    /// default profile is left out.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the storage fails.
    fn load_all_for_owner(
        &self,
        owner: Owner,
        profile_type: &ProfileType,
        include_default: bool,
    ) -> Result<Vec<Profile>, StoreError>;

    /// Persist a profile, assigning an id to new ones.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the storage fails or the profile's id is unknown.
    fn save(&self, profile: &mut Profile) -> Result<ProfileId, StoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    types: BTreeMap<String, ProfileType>,
    users: BTreeSet<UserId>,
    profiles: BTreeMap<ProfileId, Profile>,
    last_id: i32,
    saves: usize,
}

/// Process-local profile store.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    inner: RwLock<Inner>,
}

impl InMemoryProfileStore {
    /// Create an empty store that knows the given profile types.
    #[must_use]
    pub fn new(types: impl IntoIterator<Item = ProfileType>) -> Self {
        let inner = Inner {
            types: types.into_iter().map(|t| (t.id.clone(), t)).collect(),
            ..Inner::default()
        };
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Register a user who can own profiles.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::LockPoisoned` if the lock is poisoned.
    pub fn register_user(&self, id: UserId) -> Result<(), StoreError> {
        self.write()?.users.insert(id);
        Ok(())
    }

    /// Register an additional profile type.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::LockPoisoned` if the lock is poisoned.
    pub fn register_profile_type(&self, profile_type: ProfileType) -> Result<(), StoreError> {
        self.write()?
            .types
            .insert(profile_type.id.clone(), profile_type);
        Ok(())
    }

    /// Number of successful [`ProfileStore::save`] calls so far.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::LockPoisoned` if the lock is poisoned.
    pub fn save_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.saves)
    }

    /// Number of stored profiles.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::LockPoisoned` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.profiles.len())
    }

    /// Whether no profile is stored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::LockPoisoned` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.profiles.is_empty())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn profile_type(&self, id: &str) -> Result<Option<ProfileType>, StoreError> {
        Ok(self.read()?.types.get(id).cloned())
    }

    fn owner(&self, id: UserId) -> Result<Option<Owner>, StoreError> {
        if id.is_anonymous() {
            return Ok(Some(Owner::ANONYMOUS));
        }
        Ok(self.read()?.users.contains(&id).then_some(Owner::new(id)))
    }

    fn load(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        Ok(self.read()?.profiles.get(&id).cloned())
    }

    fn load_all_for_owner(
        &self,
        owner: Owner,
        profile_type: &ProfileType,
        include_default: bool,
    ) -> Result<Vec<Profile>, StoreError> {
        let inner = self.read()?;
        let mut profiles: Vec<Profile> = inner
            .profiles
            .values()
            .filter(|p| p.owner == owner.id && p.profile_type == profile_type.id)
            .filter(|p| include_default || !p.is_default)
            .cloned()
            .collect();
        profiles.sort_by(|a, b| b.is_default.cmp(&a.is_default).then_with(|| b.id.cmp(&a.id)));
        Ok(profiles)
    }

    fn save(&self, profile: &mut Profile) -> Result<ProfileId, StoreError> {
        let mut inner = self.write()?;
        let now = Utc::now();

        let id = match profile.id {
            Some(id) if inner.profiles.contains_key(&id) => id,
            Some(id) => return Err(StoreError::NotFound(id)),
            None => {
                inner.last_id += 1;
                let id = ProfileId::new(inner.last_id);
                profile.id = Some(id);
                profile.created_at = Some(now);
                id
            }
        };
        profile.updated_at = Some(now);

        if profile.is_default {
            for other in inner.profiles.values_mut().filter(|p| {
                p.id != Some(id) && p.owner == profile.owner && p.profile_type == profile.profile_type
            }) {
                other.is_default = false;
            }
        }

        inner.profiles.insert(id, profile.clone());
        inner.saves += 1;
        tracing::debug!(profile_id = %id, owner = %profile.owner, "profile saved");
        Ok(id)
    }
}
