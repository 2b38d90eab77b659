//! The persistence gate: deferred saving of new profiles on final submit.

use profile_select_core::{Profile, ProfileId};

use crate::config::InitialValue;
use crate::display::FieldDisplay;
use crate::error::Result;
use crate::input::{FormRequest, WidgetInput};
use crate::selection::Validation;
use crate::state::{FormState, Mode, WidgetPath};
use crate::store::ProfileStore;
use crate::widget::ProfileSelect;

/// Outcome of submitting one widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub path: WidgetPath,
    /// The selected profile, persisted unless the widget was never edited.
    pub profile: Profile,
    /// Scalar value of the widget: the profile id.
    pub value: Option<ProfileId>,
    /// Whether this submit created the profile.
    pub saved: bool,
    /// Initial value for the next build of the widget.
    pub next_initial_value: InitialValue,
}

impl<S, D> ProfileSelect<'_, S, D>
where
    S: ProfileStore + ?Sized,
    D: FieldDisplay + ?Sized,
{
    /// Finish the widget on final submit.
    ///
    /// New profiles are saved exactly once; existing ones pass through
    /// unchanged. The stored mode is reset so the next build starts in view
    /// mode.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn submit(
        &self,
        validation: Validation,
        input: &WidgetInput,
        request: &FormRequest,
        state: &mut FormState,
    ) -> Result<Submission> {
        let mut profile = validation.profile;
        let mut saved = false;

        if validation.mode != Mode::View && request.is_submitted() {
            self.display.extract(&mut profile, input);
            if profile.is_new() {
                let id = self.store.save(&mut profile)?;
                saved = true;
                tracing::info!(path = %self.path, profile_id = %id, owner = %profile.owner, "profile created");
            }
        }

        state.remove(&self.path.mode_key());

        let next_initial_value = if profile.is_new() {
            InitialValue::New
        } else {
            InitialValue::Profile(Box::new(profile.clone()))
        };

        Ok(Submission {
            path: self.path.clone(),
            value: profile.id,
            profile,
            saved,
            next_initial_value,
        })
    }
}
