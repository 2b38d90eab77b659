//! Selection synchronization: keeping the chosen profile honest about the
//! address the customer actually submitted.

use profile_select_core::{Profile, ProfileSelection};

use crate::display::{FieldDisplay, FieldError};
use crate::element::Element;
use crate::error::Result;
use crate::input::{FormRequest, WidgetInput};
use crate::state::Mode;
use crate::store::ProfileStore;
use crate::widget::ProfileSelect;

/// Result of validating one widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Effective selection for this submission.
    pub selection: ProfileSelection,
    /// Effective mode; [`Mode::Create`] after a divergence.
    pub mode: Mode,
    /// The resolved profile, with submitted values applied on submit.
    pub profile: Profile,
    pub errors: Vec<FieldError>,
    /// The form must be rebuilt instead of submitted.
    pub rebuild: bool,
    /// The submitted address no longer matched the selected profile.
    pub diverged: bool,
}

impl Validation {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<S, D> ProfileSelect<'_, S, D>
where
    S: ProfileStore + ?Sized,
    D: FieldDisplay + ?Sized,
{
    /// Reconcile the built element with the submitted input.
    ///
    /// An existing profile edited into a different address is never changed;
    /// the submission falls back to creating a new profile instead. When the
    /// selection control itself triggered the request in edit mode, the
    /// submitted address is cleared from `input` and a rebuild is requested.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile type or owner cannot be resolved or
    /// the store fails.
    pub fn validate(&self, element: &Element, input: &mut WidgetInput, request: &FormRequest) -> Result<Validation> {
        let mut selection = element.value;
        let mut mode = element.mode;
        let mut diverged = false;

        if let (ProfileSelection::Existing(id), Mode::Edit) = (selection, mode) {
            if let Some(submitted) = &input.address {
                let stored = element.profile.address.clone().unwrap_or_default();
                if !submitted.equivalent(&stored) {
                    tracing::info!(
                        path = %self.path,
                        profile_id = %id,
                        "submitted address diverged from selected profile, creating a new one"
                    );
                    selection = ProfileSelection::New;
                    mode = Mode::Create;
                    diverged = true;
                }
            }
        }

        let mut profile = if diverged {
            let profile_type = self.resolve_profile_type()?;
            let owner = self.resolve_owner()?;
            self.resolve_profile(selection, &profile_type, owner)?
        } else {
            element.profile.clone()
        };

        let mut errors = Vec::new();
        if mode != Mode::View && request.is_submitted() {
            self.display.extract(&mut profile, input);
            errors = self.display.validate(&profile, input);
        }

        let rebuild = element.mode == Mode::Edit && request.is_triggered_by(&self.path.selection_input_name());
        if rebuild {
            input.clear_address();
        }

        Ok(Validation {
            selection,
            mode,
            profile,
            errors,
            rebuild,
            diverged,
        })
    }
}
