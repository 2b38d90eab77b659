//! Demo owner switching.

use axum::{Form, extract::State, response::Redirect};
use profile_select::FormState;
use profile_select_core::UserId;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::set_current_owner;
use crate::models::{SelectedProfiles, session_keys};
use crate::state::AppState;

/// Owner switcher form input.
#[derive(Debug, Deserialize)]
pub struct SwitchOwnerForm {
    pub uid: i32,
}

/// Run the checkout as another demo user.
///
/// Drops the checkout in progress and the remembered selections, which
/// belong to the previous owner's profiles.
#[instrument(skip(state, session))]
pub async fn switch_owner(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SwitchOwnerForm>,
) -> Result<Redirect> {
    let owner = UserId::new(form.uid);
    let user = state
        .user(owner)
        .ok_or_else(|| AppError::BadRequest(format!("unknown user {owner}")))?;

    set_current_owner(&session, owner).await?;
    session.remove::<FormState>(session_keys::FORM_STATE).await?;
    session
        .remove::<SelectedProfiles>(session_keys::SELECTED_PROFILES)
        .await?;

    let uid = owner.to_string();
    add_breadcrumb("session", "Owner switched", Some(&[("uid", uid.as_str())]));
    tracing::info!(owner = %owner, name = %user.name, "owner switched");

    Ok(Redirect::to("/checkout"))
}
