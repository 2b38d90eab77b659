//! Integration tests for the profile select widget.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p profile-select-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `profile_select_flows` - Multi-request widget scenarios against the in-memory store
//! - `checkout_http` - HTTP flows against a checkout server on an ephemeral port
//!
//! This crate only holds shared fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]

use profile_select::{
    FormInput, InMemoryProfileStore, ProfileSelectConfig, ProfileStore, WidgetDefinition, WidgetPath,
};
use profile_select_checkout::{app, config::CheckoutConfig, seed::Seed, state::AppState};
use profile_select_core::{Address, Owner, ProfileId, ProfileType, UserId};

/// Profile type every fixture uses.
pub const CUSTOMER: &str = "customer";

/// A complete US address that passes the required-part checks.
#[must_use]
pub fn address(line1: &str, locality: &str) -> Address {
    Address {
        country_code: Some("US".to_string()),
        given_name: Some("Homer".to_string()),
        family_name: Some("Simpson".to_string()),
        address_line1: Some(line1.to_string()),
        locality: Some(locality.to_string()),
        postal_code: Some("49007".to_string()),
        ..Default::default()
    }
}

/// An empty store that knows `owners` and the customer profile type.
///
/// # Panics
///
/// Panics if the store lock is poisoned.
#[must_use]
pub fn store(owners: &[UserId]) -> InMemoryProfileStore {
    let store = InMemoryProfileStore::new([ProfileType::new(CUSTOMER)]);
    for owner in owners {
        store.register_user(*owner).expect("register user");
    }
    store
}

/// Save a customer profile for `owner`.
///
/// # Panics
///
/// Panics if the owner is unknown to the store.
pub fn save_profile(store: &InMemoryProfileStore, owner: UserId, address: Address, is_default: bool) -> ProfileId {
    let mut profile = store
        .create(&ProfileType::new(CUSTOMER), Owner::new(owner))
        .with_address(address);
    profile.is_default = is_default;
    store.save(&mut profile).expect("save profile")
}

/// A widget at the single-key path `name` for `owner`.
///
/// # Panics
///
/// Panics if the configuration is rejected.
#[must_use]
pub fn widget(name: &str, owner: UserId) -> WidgetDefinition {
    let config = ProfileSelectConfig::builder(CUSTOMER)
        .owner(owner)
        .build()
        .expect("valid config");
    WidgetDefinition::new(WidgetPath::new([name]), config)
}

/// Submitted form values from name/value pairs.
#[must_use]
pub fn form_input(pairs: &[(&str, &str)]) -> FormInput {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect()
}

/// Form values of a complete address for the widget at `path`.
#[must_use]
pub fn address_input(path: &WidgetPath, address: &Address) -> FormInput {
    Address::PARTS
        .iter()
        .map(|part| {
            (
                path.address_input_name(part),
                address.part(part).unwrap_or_default().to_string(),
            )
        })
        .collect()
}

/// Start a checkout server with the demo seed on an ephemeral port.
///
/// Returns the base URL, e.g. `http://127.0.0.1:41234`.
///
/// # Panics
///
/// Panics if the server cannot be started.
pub async fn spawn_checkout() -> String {
    let config = CheckoutConfig::from_lookup(|_| None).expect("default config");
    let state = AppState::new(config, &Seed::demo()).expect("demo state");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");

    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.expect("checkout server");
    });

    format!("http://{addr}")
}

/// HTTP client that keeps the session cookie between requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("http client")
}
