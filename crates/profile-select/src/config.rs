//! Widget configuration.
//!
//! A configuration can be assembled in code with [`ProfileSelectConfig::builder`]
//! or read from a JSON element definition with [`ProfileSelectConfig::from_json`]:
//!
//! ```json
//! {
//!   "profile_type": "customer",
//!   "owner_uid": 12,
//!   "default_value": "_new",
//!   "default_country": "FR",
//!   "available_countries": ["US", "FR"],
//!   "title": "Select a profile",
//!   "create_label": "+ Enter a new profile"
//! }
//! ```
//!
//! Configuration errors are integration bugs, so they are raised as soon as
//! the widget is built and never shown to the customer.

use profile_select_core::{CountryCode, CountryCodeError, Profile, ProfileId, ProfileSelection, UserId};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("profile_type must be provided")]
    MissingProfileType,
    #[error("available_countries must be an array (got {0})")]
    InvalidAvailableCountries(&'static str),
    #[error("invalid country code in {field}: {source}")]
    InvalidCountryCode {
        field: &'static str,
        #[source]
        source: CountryCodeError,
    },
    #[error("invalid default_value: {0}")]
    InvalidDefaultValue(String),
    #[error("invalid element definition: {0}")]
    Json(#[from] serde_json::Error),
}

/// The profile a widget starts out pointing at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InitialValue {
    /// Start on "create new" (the `_new` sentinel).
    #[default]
    New,
    /// Start on a saved profile.
    Id(ProfileId),
    /// Start on a loaded profile, typically the one saved by a previous submit.
    Profile(Box<Profile>),
}

impl InitialValue {
    /// The selection this initial value stands for.
    #[must_use]
    pub fn selection(&self) -> ProfileSelection {
        match self {
            Self::New => ProfileSelection::New,
            Self::Id(id) => ProfileSelection::Existing(*id),
            Self::Profile(profile) => profile
                .id
                .map_or(ProfileSelection::New, ProfileSelection::Existing),
        }
    }
}

impl From<ProfileSelection> for InitialValue {
    fn from(selection: ProfileSelection) -> Self {
        match selection {
            ProfileSelection::New => Self::New,
            ProfileSelection::Existing(id) => Self::Id(id),
        }
    }
}

/// Configuration of one profile select widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSelectConfig {
    /// Country to pre-select when the address has none yet.
    pub default_country: Option<CountryCode>,
    /// Countries the address form may offer. Empty means unrestricted.
    pub available_countries: Vec<CountryCode>,
    /// Title of the selection control.
    pub title: String,
    /// Label of the "create new" option.
    pub create_label: String,
    /// Profile bundle the widget operates on. Required.
    pub profile_type: String,
    /// Owner of the profiles. [`UserId::ANONYMOUS`] for guests.
    pub owner: UserId,
    /// Profile selected on first build.
    pub initial_value: InitialValue,
}

impl ProfileSelectConfig {
    pub const DEFAULT_TITLE: &'static str = "Select a profile";
    pub const DEFAULT_CREATE_LABEL: &'static str = "+ Enter a new profile";

    /// Start building a configuration for the given profile type.
    #[must_use]
    pub fn builder(profile_type: impl Into<String>) -> ProfileSelectConfigBuilder {
        ProfileSelectConfigBuilder::new(profile_type)
    }

    /// Read a configuration from a JSON element definition.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `available_countries` is not an array, a
    /// country code is invalid, `default_value` is neither an id nor `_new`,
    /// or `profile_type` is missing or empty.
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        let raw = RawConfig::deserialize(value)?;

        let available_countries = match raw.available_countries {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(code) => parse_country("available_countries", code),
                    other => Err(ConfigError::InvalidAvailableCountries(json_type(other))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => return Err(ConfigError::InvalidAvailableCountries(json_type(&other))),
        };

        let default_country = raw
            .default_country
            .as_deref()
            .filter(|code| !code.is_empty())
            .map(|code| parse_country("default_country", code))
            .transpose()?;

        let initial_value = match raw.default_value {
            None | Some(Value::Null) => InitialValue::New,
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|id| i32::try_from(id).ok())
                .map(|id| InitialValue::Id(ProfileId::new(id)))
                .ok_or_else(|| ConfigError::InvalidDefaultValue(n.to_string()))?,
            Some(Value::String(s)) => ProfileSelection::parse(&s)
                .map(InitialValue::from)
                .map_err(|_| ConfigError::InvalidDefaultValue(s))?,
            Some(other) => return Err(ConfigError::InvalidDefaultValue(other.to_string())),
        };

        let mut builder = Self::builder(raw.profile_type.unwrap_or_default())
            .available_countries(available_countries)
            .owner(UserId::new(raw.owner_uid.unwrap_or(0)))
            .initial_value(initial_value);
        if let Some(country) = default_country {
            builder = builder.default_country(country);
        }
        if let Some(title) = raw.title {
            builder = builder.title(title);
        }
        if let Some(label) = raw.create_label {
            builder = builder.create_label(label);
        }
        builder.build()
    }

    /// Check the invariants the builder enforces.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingProfileType` if no profile type is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.profile_type.trim().is_empty() {
            return Err(ConfigError::MissingProfileType);
        }
        Ok(())
    }

    /// Replace the initial value, e.g. with the profile saved by a submit.
    #[must_use]
    pub fn with_initial_value(mut self, initial_value: InitialValue) -> Self {
        self.initial_value = initial_value;
        self
    }
}

/// Builder for [`ProfileSelectConfig`].
#[derive(Debug, Clone)]
#[must_use]
pub struct ProfileSelectConfigBuilder {
    config: ProfileSelectConfig,
}

impl ProfileSelectConfigBuilder {
    fn new(profile_type: impl Into<String>) -> Self {
        Self {
            config: ProfileSelectConfig {
                default_country: None,
                available_countries: Vec::new(),
                title: ProfileSelectConfig::DEFAULT_TITLE.to_string(),
                create_label: ProfileSelectConfig::DEFAULT_CREATE_LABEL.to_string(),
                profile_type: profile_type.into(),
                owner: UserId::ANONYMOUS,
                initial_value: InitialValue::New,
            },
        }
    }

    pub fn default_country(mut self, country: CountryCode) -> Self {
        self.config.default_country = Some(country);
        self
    }

    pub fn available_countries(mut self, countries: impl IntoIterator<Item = CountryCode>) -> Self {
        self.config.available_countries = countries.into_iter().collect();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn create_label(mut self, label: impl Into<String>) -> Self {
        self.config.create_label = label.into();
        self
    }

    pub fn owner(mut self, owner: UserId) -> Self {
        self.config.owner = owner;
        self
    }

    pub fn initial_value(mut self, initial_value: InitialValue) -> Self {
        self.config.initial_value = initial_value;
        self
    }

    /// Finish the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingProfileType` if the profile type is empty.
    pub fn build(self) -> Result<ProfileSelectConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Loosely typed element definition, checked field by field.
#[derive(Debug, Deserialize)]
struct RawConfig {
    default_country: Option<String>,
    available_countries: Option<Value>,
    title: Option<String>,
    create_label: Option<String>,
    profile_type: Option<String>,
    owner_uid: Option<i32>,
    default_value: Option<Value>,
}

fn parse_country(field: &'static str, code: &str) -> Result<CountryCode, ConfigError> {
    CountryCode::parse(code).map_err(|source| ConfigError::InvalidCountryCode { field, source })
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ProfileSelectConfig::builder("customer").build().unwrap();
        assert_eq!(config.title, "Select a profile");
        assert_eq!(config.create_label, "+ Enter a new profile");
        assert_eq!(config.owner, UserId::ANONYMOUS);
        assert_eq!(config.initial_value, InitialValue::New);
        assert!(config.available_countries.is_empty());
        assert!(config.default_country.is_none());
    }

    #[test]
    fn test_builder_requires_profile_type() {
        let result = ProfileSelectConfig::builder("  ").build();
        assert!(matches!(result, Err(ConfigError::MissingProfileType)));
    }

    #[test]
    fn test_from_json_full_definition() {
        let config = ProfileSelectConfig::from_json(&json!({
            "profile_type": "customer",
            "owner_uid": 3,
            "default_value": 17,
            "default_country": "fr",
            "available_countries": ["US", "FR"],
            "title": "Billing information",
        }))
        .unwrap();

        assert_eq!(config.owner, UserId::new(3));
        assert_eq!(config.initial_value, InitialValue::Id(ProfileId::new(17)));
        assert_eq!(config.default_country.unwrap().as_str(), "FR");
        assert_eq!(config.available_countries.len(), 2);
        assert_eq!(config.title, "Billing information");
        assert_eq!(config.create_label, "+ Enter a new profile");
    }

    #[test]
    fn test_from_json_new_sentinel_and_null() {
        let config = ProfileSelectConfig::from_json(&json!({
            "profile_type": "customer",
            "default_value": "_new",
        }))
        .unwrap();
        assert_eq!(config.initial_value, InitialValue::New);

        let config = ProfileSelectConfig::from_json(&json!({
            "profile_type": "customer",
            "default_value": null,
        }))
        .unwrap();
        assert_eq!(config.initial_value, InitialValue::New);
    }

    #[test]
    fn test_from_json_rejects_non_array_countries() {
        let result = ProfileSelectConfig::from_json(&json!({
            "profile_type": "customer",
            "available_countries": "US",
        }));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidAvailableCountries("string"))
        ));
    }

    #[test]
    fn test_from_json_rejects_bad_country() {
        let result = ProfileSelectConfig::from_json(&json!({
            "profile_type": "customer",
            "available_countries": ["US", "France"],
        }));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidCountryCode {
                field: "available_countries",
                ..
            })
        ));
    }

    #[test]
    fn test_from_json_requires_profile_type() {
        let result = ProfileSelectConfig::from_json(&json!({ "owner_uid": 1 }));
        assert!(matches!(result, Err(ConfigError::MissingProfileType)));
    }

    #[test]
    fn test_from_json_rejects_bad_default_value() {
        let result = ProfileSelectConfig::from_json(&json!({
            "profile_type": "customer",
            "default_value": "latest",
        }));
        assert!(matches!(result, Err(ConfigError::InvalidDefaultValue(_))));
    }

    #[test]
    fn test_initial_value_selection() {
        assert_eq!(InitialValue::New.selection(), ProfileSelection::New);
        assert_eq!(
            InitialValue::Id(ProfileId::new(2)).selection(),
            ProfileSelection::Existing(ProfileId::new(2))
        );
    }
}
