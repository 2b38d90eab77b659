//! Extractor for the demo owner the checkout runs as.

use axum::{extract::FromRequestParts, http::request::Parts};
use profile_select_core::UserId;
use tower_sessions::Session;

use crate::models::session_keys;

/// The owner whose profiles the checkout offers.
///
/// Never rejects: without a session or a stored owner the checkout runs as
/// the anonymous guest.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentOwner(owner): CurrentOwner) -> String {
///     format!("Checking out as user {owner}")
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentOwner(pub UserId);

impl<S> FromRequestParts<S> for CurrentOwner
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let owner = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<UserId>(session_keys::CURRENT_OWNER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(owner.unwrap_or(UserId::ANONYMOUS)))
    }
}

/// Helper to switch the current owner in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_owner(session: &Session, owner: UserId) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_OWNER, owner).await
}
