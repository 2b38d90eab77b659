//! The widget handle shared by the mode resolver, the selection synchronizer
//! and the persistence gate.

use profile_select_core::{Owner, Profile, ProfileSelection, ProfileType};

use crate::config::ProfileSelectConfig;
use crate::error::{ProfileSelectError, Result};
use crate::state::WidgetPath;
use crate::store::ProfileStore;

/// One widget instance: a path in the form, its configuration and the
/// collaborators it works through.
///
/// Cheap to construct; build a fresh one per request.
#[derive(Debug)]
pub struct ProfileSelect<'a, S: ?Sized, D: ?Sized> {
    pub(crate) path: WidgetPath,
    pub(crate) config: &'a ProfileSelectConfig,
    pub(crate) store: &'a S,
    pub(crate) display: &'a D,
}

impl<'a, S, D> ProfileSelect<'a, S, D>
where
    S: ProfileStore + ?Sized,
    D: ?Sized,
{
    #[must_use]
    pub const fn new(path: WidgetPath, config: &'a ProfileSelectConfig, store: &'a S, display: &'a D) -> Self {
        Self {
            path,
            config,
            store,
            display,
        }
    }

    #[must_use]
    pub const fn path(&self) -> &WidgetPath {
        &self.path
    }

    #[must_use]
    pub const fn config(&self) -> &ProfileSelectConfig {
        self.config
    }

    pub(crate) fn resolve_profile_type(&self) -> Result<ProfileType> {
        self.config.validate()?;
        self.store
            .profile_type(&self.config.profile_type)?
            .ok_or_else(|| ProfileSelectError::UnknownProfileType(self.config.profile_type.clone()))
    }

    pub(crate) fn resolve_owner(&self) -> Result<Owner> {
        self.store
            .owner(self.config.owner)?
            .ok_or(ProfileSelectError::UnknownOwner(self.config.owner))
    }

    /// The profile a selection stands for: a fresh unsaved one for "create
    /// new", otherwise the stored profile.
    pub(crate) fn resolve_profile(
        &self,
        selection: ProfileSelection,
        profile_type: &ProfileType,
        owner: Owner,
    ) -> Result<Profile> {
        match selection {
            ProfileSelection::New => Ok(self.store.create(profile_type, owner)),
            ProfileSelection::Existing(id) => self
                .store
                .load(id)?
                .ok_or(ProfileSelectError::ProfileNotFound(id)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use profile_select_core::{ProfileId, UserId};

    use super::*;
    use crate::config::ConfigError;
    use crate::display::AddressFormDisplay;
    use crate::store::InMemoryProfileStore;

    fn store() -> InMemoryProfileStore {
        let store = InMemoryProfileStore::new([ProfileType::new("customer")]);
        store.register_user(UserId::new(5)).unwrap();
        store
    }

    #[test]
    fn test_resolve_owner_and_type() {
        let store = store();
        let display = AddressFormDisplay::new();
        let config = ProfileSelectConfig::builder("customer")
            .owner(UserId::new(5))
            .build()
            .unwrap();
        let widget = ProfileSelect::new(WidgetPath::new(["profile"]), &config, &store, &display);

        assert_eq!(widget.resolve_profile_type().unwrap().id, "customer");
        assert_eq!(widget.resolve_owner().unwrap(), Owner::new(UserId::new(5)));
    }

    #[test]
    fn test_unknown_owner_and_type_are_fatal() {
        let store = store();
        let display = AddressFormDisplay::new();
        let config = ProfileSelectConfig::builder("billing")
            .owner(UserId::new(6))
            .build()
            .unwrap();
        let widget = ProfileSelect::new(WidgetPath::new(["profile"]), &config, &store, &display);

        assert!(matches!(
            widget.resolve_profile_type(),
            Err(ProfileSelectError::UnknownProfileType(t)) if t == "billing"
        ));
        assert!(matches!(
            widget.resolve_owner(),
            Err(ProfileSelectError::UnknownOwner(_))
        ));
    }

    #[test]
    fn test_empty_profile_type_is_a_config_error() {
        let store = store();
        let display = AddressFormDisplay::new();
        let mut config = ProfileSelectConfig::builder("customer").build().unwrap();
        config.profile_type = String::new();
        let widget = ProfileSelect::new(WidgetPath::new(["profile"]), &config, &store, &display);

        assert!(matches!(
            widget.resolve_profile_type(),
            Err(ProfileSelectError::Config(ConfigError::MissingProfileType))
        ));
    }

    #[test]
    fn test_resolve_missing_profile() {
        let store = store();
        let display = AddressFormDisplay::new();
        let config = ProfileSelectConfig::builder("customer").build().unwrap();
        let widget = ProfileSelect::new(WidgetPath::new(["profile"]), &config, &store, &display);
        let profile_type = widget.resolve_profile_type().unwrap();

        let new = widget
            .resolve_profile(ProfileSelection::New, &profile_type, Owner::ANONYMOUS)
            .unwrap();
        assert!(new.is_new());

        let missing = widget.resolve_profile(
            ProfileSelection::Existing(ProfileId::new(9)),
            &profile_type,
            Owner::ANONYMOUS,
        );
        assert!(matches!(missing, Err(ProfileSelectError::ProfileNotFound(_))));
    }
}
