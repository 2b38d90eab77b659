//! Application state shared across handlers.

use std::sync::Arc;

use profile_select::{
    AddressFormDisplay, ConfigError, InMemoryProfileStore, InitialValue, ProfileSelectConfig, WidgetDefinition,
    WidgetPath,
};
use profile_select_core::{ProfileType, UserId};

use crate::config::CheckoutConfig;
use crate::models::{DemoUser, SelectedProfiles};
use crate::seed::{Seed, SeedError};

/// Form key of the billing profile widget.
pub const BILLING_PROFILE: &str = "billing_profile";

/// Form key of the shipping profile widget.
pub const SHIPPING_PROFILE: &str = "shipping_profile";

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// profile store, the field display and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CheckoutConfig,
    store: InMemoryProfileStore,
    display: AddressFormDisplay,
    users: Vec<DemoUser>,
}

impl AppState {
    /// Create a new application state with `seed` loaded into a fresh store.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed cannot be loaded.
    pub fn new(config: CheckoutConfig, seed: &Seed) -> Result<Self, SeedError> {
        let profile_type = ProfileType::new(config.profile_type.clone());
        let store = InMemoryProfileStore::new([profile_type.clone()]);
        seed.load_into(&store, &profile_type)?;

        let mut users = vec![DemoUser::guest()];
        users.extend(seed.users.iter().filter(|u| !u.id.is_anonymous()).cloned());

        let display = AddressFormDisplay::new().with_text_field("phone", "Phone", false);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                display,
                users,
            }),
        })
    }

    /// Get a reference to the checkout configuration.
    #[must_use]
    pub fn config(&self) -> &CheckoutConfig {
        &self.inner.config
    }

    /// Get a reference to the profile store.
    #[must_use]
    pub fn store(&self) -> &InMemoryProfileStore {
        &self.inner.store
    }

    /// Get a reference to the profile field display.
    #[must_use]
    pub fn display(&self) -> &AddressFormDisplay {
        &self.inner.display
    }

    /// Users the checkout can run as, the guest first.
    #[must_use]
    pub fn users(&self) -> &[DemoUser] {
        &self.inner.users
    }

    /// Look up a demo user.
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&DemoUser> {
        self.inner.users.iter().find(|u| u.id == id)
    }

    /// The billing and shipping widgets of the checkout form for `owner`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configured profile type is empty.
    pub fn checkout_widgets(
        &self,
        owner: UserId,
        selected: &SelectedProfiles,
    ) -> Result<Vec<WidgetDefinition>, ConfigError> {
        [
            (BILLING_PROFILE, "Billing information"),
            (SHIPPING_PROFILE, "Shipping information"),
        ]
        .into_iter()
        .map(|(key, title)| {
            let path = WidgetPath::new([key]);
            let initial_value = selected.get(&path).map_or(InitialValue::New, InitialValue::Id);
            let mut builder = ProfileSelectConfig::builder(self.config().profile_type.clone())
                .owner(owner)
                .title(title)
                .available_countries(self.config().available_countries.iter().cloned())
                .initial_value(initial_value);
            if let Some(country) = &self.config().default_country {
                builder = builder.default_country(country.clone());
            }
            Ok(WidgetDefinition::new(path, builder.build()?))
        })
        .collect()
    }
}
