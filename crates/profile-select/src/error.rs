//! Widget error type.
//!
//! Every variant is fatal and developer-facing: a misconfigured widget or a
//! broken store cannot be recovered from inside the form. Field validation
//! problems are not errors; they travel as [`crate::FieldError`] values.

use profile_select_core::{ProfileId, UserId};
use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Errors raised while building, validating or submitting a widget.
#[derive(Debug, Error)]
pub enum ProfileSelectError {
    /// The widget configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The configured profile type does not exist in the store.
    #[error("Unknown profile type: {0}")]
    UnknownProfileType(String),

    /// The configured owner does not exist in the store.
    #[error("Unknown owner: {0}")]
    UnknownOwner(UserId),

    /// A selected profile could not be loaded.
    #[error("Profile not found: {0}")]
    ProfileNotFound(ProfileId),

    /// The profile store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Form state could not be serialized.
    #[error("Form state error: {0}")]
    State(#[from] serde_json::Error),
}

/// Result type alias for [`ProfileSelectError`].
pub type Result<T> = std::result::Result<T, ProfileSelectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProfileSelectError::ProfileNotFound(ProfileId::new(12));
        assert_eq!(err.to_string(), "Profile not found: 12");

        let err = ProfileSelectError::UnknownProfileType("billing".to_string());
        assert_eq!(err.to_string(), "Unknown profile type: billing");
    }

    #[test]
    fn test_config_error_converts() {
        let err: ProfileSelectError = ConfigError::MissingProfileType.into();
        assert!(matches!(
            err,
            ProfileSelectError::Config(ConfigError::MissingProfileType)
        ));
    }
}
