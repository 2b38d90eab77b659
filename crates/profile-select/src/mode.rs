//! Mode resolution: which profile a widget shows and how.

use profile_select_core::{Profile, ProfileSelection};

use crate::display::{FieldDisplay, FieldKind, FieldWrapper, SubForm};
use crate::element::{Button, Element, ElementContent, SelectOption, SelectionControl};
use crate::error::Result;
use crate::input::WidgetInput;
use crate::state::{FormState, Mode};
use crate::store::ProfileStore;
use crate::widget::ProfileSelect;

const EDIT_BUTTON_LABEL: &str = "Edit";

impl<S, D> ProfileSelect<'_, S, D>
where
    S: ProfileStore + ?Sized,
    D: FieldDisplay + ?Sized,
{
    /// Build the widget's render tree.
    ///
    /// `input` holds the values submitted for this widget; `None` marks the
    /// first build.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the profile type or
    /// owner is unknown, the selected profile cannot be loaded or the store
    /// fails.
    pub fn build(&self, state: &FormState, input: Option<&WidgetInput>) -> Result<Element> {
        let profile_type = self.resolve_profile_type()?;
        let owner = self.resolve_owner()?;

        let profiles = if owner.is_anonymous() {
            Vec::new()
        } else {
            self.store.load_all_for_owner(owner, &profile_type, true)?
        };

        let mut value = self.resolve_value(&profiles, input);
        if input.is_none() && value.is_new() {
            if let Some(id) = profiles.iter().find(|p| p.is_default).and_then(|p| p.id) {
                value = ProfileSelection::Existing(id);
            }
        }

        let selection_control = if profiles.is_empty() {
            value = ProfileSelection::New;
            None
        } else {
            Some(self.selection_control(&profiles, value))
        };

        let profile = self.resolve_profile(value, &profile_type, owner)?;
        let mode = if value.is_new() {
            Mode::Create
        } else {
            match state.mode(&self.path) {
                Mode::Create => Mode::Edit,
                mode => mode,
            }
        };

        let content = if mode == Mode::View && !profile.is_new() {
            ElementContent::View {
                rendered: self.display.view(&profile),
                edit_button: Button {
                    name: self.path.edit_button_name(),
                    label: EDIT_BUTTON_LABEL.to_owned(),
                },
            }
        } else {
            ElementContent::Form {
                form: self.sub_form(&profile, input),
            }
        };

        tracing::debug!(
            path = %self.path,
            %mode,
            selection = %value,
            options = profiles.len(),
            "profile select built"
        );

        Ok(Element {
            wrapper_id: self.path.wrapper_id(),
            path: self.path.clone(),
            value,
            mode,
            profile,
            selection_control,
            content,
            errors: Vec::new(),
        })
    }

    /// Handle a press of the widget's "Edit" button: switch to edit mode for
    /// the following builds.
    ///
    /// # Errors
    ///
    /// Returns an error if the mode cannot be stored.
    pub fn press_edit(&self, state: &mut FormState) -> Result<()> {
        state.set_mode(&self.path, Mode::Edit)?;
        tracing::debug!(path = %self.path, "profile select switched to edit mode");
        Ok(())
    }

    /// Submitted selection if it is legal, else the configured initial value.
    fn resolve_value(&self, profiles: &[Profile], input: Option<&WidgetInput>) -> ProfileSelection {
        let initial = self.config.initial_value.selection();
        let Some(raw) = input.and_then(WidgetInput::selection) else {
            return initial;
        };

        match ProfileSelection::parse(raw) {
            Ok(ProfileSelection::New) => ProfileSelection::New,
            Ok(selection @ ProfileSelection::Existing(id))
                if selection == initial || profiles.iter().any(|p| p.id == Some(id)) =>
            {
                selection
            }
            _ => {
                tracing::warn!(
                    path = %self.path,
                    submitted = raw,
                    "ignoring illegal profile selection"
                );
                initial
            }
        }
    }

    fn selection_control(&self, profiles: &[Profile], selected: ProfileSelection) -> SelectionControl {
        let mut options: Vec<SelectOption> = profiles
            .iter()
            .filter_map(|profile| {
                profile.id.map(|id| SelectOption {
                    value: ProfileSelection::Existing(id),
                    label: profile.label(),
                })
            })
            .collect();
        options.push(SelectOption {
            value: ProfileSelection::New,
            label: self.config.create_label.clone(),
        });

        SelectionControl {
            name: self.path.selection_input_name(),
            title: self.config.title.clone(),
            options,
            selected,
        }
    }

    /// The editable sub-form, showing submitted values over stored ones.
    fn sub_form(&self, profile: &Profile, input: Option<&WidgetInput>) -> SubForm {
        let mut form = self.display.build_form(profile);

        if let Some(input) = input {
            for field in &mut form.fields {
                if let FieldKind::Text { value, .. } = &mut field.kind {
                    if let Some(submitted) = input.fields.get(&field.name) {
                        *value = Some(submitted.clone());
                    }
                }
            }
        }

        if let Some(widget) = form.address_widget_mut() {
            widget.wrapper = FieldWrapper::Container;
            if let Some(address) = input.and_then(|i| i.address.as_ref()) {
                widget.value = address.clone();
            }
            if let Some(country) = &self.config.default_country {
                if widget.value.country_code.as_deref().is_none_or(str::is_empty) {
                    widget.value.country_code = Some(country.to_string());
                }
            }
            if !self.config.available_countries.is_empty() {
                widget.available_countries.clone_from(&self.config.available_countries);
            }
        }

        form
    }
}
