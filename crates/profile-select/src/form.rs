//! Running one request against a form with several profile select widgets.

use tracing::instrument;

use crate::config::ProfileSelectConfig;
use crate::display::{FieldDisplay, FieldError};
use crate::element::Element;
use crate::error::Result;
use crate::input::{FormRequest, RequestKind, WidgetInput};
use crate::persistence::Submission;
use crate::state::{FormState, WidgetPath};
use crate::store::ProfileStore;
use crate::widget::ProfileSelect;

/// One widget embedded in a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetDefinition {
    pub path: WidgetPath,
    pub config: ProfileSelectConfig,
}

impl WidgetDefinition {
    #[must_use]
    pub const fn new(path: WidgetPath, config: ProfileSelectConfig) -> Self {
        Self { path, config }
    }
}

/// What the host should do with a [`FormResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// First render of the form.
    Rendered,
    /// A widget changed without submitting; re-render the refresh target.
    Refreshed,
    /// The form was rebuilt from the submitted input.
    Rebuilt,
    /// The submit failed field validation; errors are on the elements.
    Invalid,
    /// The submit went through.
    Submitted(Vec<Submission>),
}

/// Result of processing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormResponse {
    /// One element per widget, in definition order.
    pub elements: Vec<Element>,
    pub outcome: FormOutcome,
    /// Wrapper id of the widget to re-render on a partial refresh.
    pub refresh_target: Option<String>,
}

impl FormResponse {
    /// The element built for the widget at `path`.
    #[must_use]
    pub fn element(&self, path: &WidgetPath) -> Option<&Element> {
        self.elements.iter().find(|e| &e.path == path)
    }

    /// The element named by [`FormResponse::refresh_target`].
    #[must_use]
    pub fn refresh_element(&self) -> Option<&Element> {
        let target = self.refresh_target.as_deref()?;
        self.elements.iter().find(|e| e.wrapper_id == target)
    }

    /// Whether the form must be re-rendered as a whole.
    #[must_use]
    pub const fn is_rebuild(&self) -> bool {
        matches!(self.outcome, FormOutcome::Rebuilt)
    }

    /// The per-widget submissions, on a successful submit.
    #[must_use]
    pub fn submissions(&self) -> Option<&[Submission]> {
        match &self.outcome {
            FormOutcome::Submitted(submissions) => Some(submissions),
            _ => None,
        }
    }

    /// Every field error across widgets.
    pub fn errors(&self) -> impl Iterator<Item = &FieldError> {
        self.elements.iter().flat_map(|e| e.errors.iter())
    }
}

/// A form embedding several profile select widgets that share one store and
/// one field display.
pub struct ProfileSelectForm<'a, S: ?Sized, D: ?Sized> {
    store: &'a S,
    display: &'a D,
    widgets: &'a [WidgetDefinition],
}

impl<'a, S, D> ProfileSelectForm<'a, S, D>
where
    S: ProfileStore + ?Sized,
    D: FieldDisplay + ?Sized,
{
    #[must_use]
    pub const fn new(store: &'a S, display: &'a D, widgets: &'a [WidgetDefinition]) -> Self {
        Self {
            store,
            display,
            widgets,
        }
    }

    /// The widget at `path`, if the form has one.
    #[must_use]
    pub fn widget(&self, path: &WidgetPath) -> Option<ProfileSelect<'a, S, D>> {
        self.widgets
            .iter()
            .find(|def| &def.path == path)
            .map(|def| self.instance(def))
    }

    fn instance(&self, def: &'a WidgetDefinition) -> ProfileSelect<'a, S, D> {
        ProfileSelect::new(def.path.clone(), &def.config, self.store, self.display)
    }

    /// Process one request.
    ///
    /// # Errors
    ///
    /// Returns an error if any widget fails to build, validate or submit.
    #[instrument(skip_all, fields(kind = ?request.kind, trigger = request.triggering_element.as_deref()))]
    pub fn process(&self, state: &mut FormState, request: &FormRequest) -> Result<FormResponse> {
        let widgets: Vec<_> = self.widgets.iter().map(|def| self.instance(def)).collect();
        let mut inputs: Vec<Option<WidgetInput>> = widgets
            .iter()
            .map(|w| WidgetInput::capture(w.path(), &request.input))
            .collect();

        if request.kind == RequestKind::Initial {
            let elements = build_all(&widgets, state, &inputs)?;
            return Ok(respond(elements, FormOutcome::Rendered, None));
        }

        if let Some(widget) = widgets
            .iter()
            .find(|w| request.is_triggered_by(&w.path().edit_button_name()))
        {
            widget.press_edit(state)?;
            let target = widget.path().wrapper_id();
            let elements = build_all(&widgets, state, &inputs)?;
            return Ok(respond(elements, FormOutcome::Refreshed, Some(target)));
        }

        let target = request.triggering_element.as_deref().and_then(|trigger| {
            widgets
                .iter()
                .find(|w| owns_input(w.path(), trigger))
                .map(|w| w.path().wrapper_id())
        });

        let mut elements = build_all(&widgets, state, &inputs)?;
        let mut validations = Vec::with_capacity(widgets.len());
        for ((widget, element), input) in widgets.iter().zip(&elements).zip(&mut inputs) {
            let mut captured = input.clone().unwrap_or_default();
            validations.push(widget.validate(element, &mut captured, request)?);
            if input.is_some() {
                *input = Some(captured);
            }
        }

        if validations.iter().any(|v| v.rebuild) {
            let elements = build_all(&widgets, state, &inputs)?;
            return Ok(respond(elements, FormOutcome::Rebuilt, target));
        }

        if !request.is_submitted() {
            return Ok(respond(elements, FormOutcome::Refreshed, target));
        }

        if validations.iter().any(|v| !v.is_valid()) {
            for (element, validation) in elements.iter_mut().zip(validations) {
                element.errors = validation.errors;
            }
            tracing::debug!(errors = elements.iter().map(|e| e.errors.len()).sum::<usize>(), "form invalid");
            return Ok(respond(elements, FormOutcome::Invalid, None));
        }

        let mut submissions = Vec::with_capacity(widgets.len());
        for ((widget, validation), input) in widgets.iter().zip(validations).zip(&inputs) {
            let input = input.clone().unwrap_or_default();
            submissions.push(widget.submit(validation, &input, request, state)?);
        }
        Ok(respond(elements, FormOutcome::Submitted(submissions), None))
    }
}

fn build_all<S, D>(
    widgets: &[ProfileSelect<'_, S, D>],
    state: &FormState,
    inputs: &[Option<WidgetInput>],
) -> Result<Vec<Element>>
where
    S: ProfileStore + ?Sized,
    D: FieldDisplay + ?Sized,
{
    widgets
        .iter()
        .zip(inputs)
        .map(|(widget, input)| widget.build(state, input.as_ref()))
        .collect()
}

const fn respond(elements: Vec<Element>, outcome: FormOutcome, refresh_target: Option<String>) -> FormResponse {
    FormResponse {
        elements,
        outcome,
        refresh_target,
    }
}

/// Whether the input name `name` belongs to the widget at `path`.
fn owns_input(path: &WidgetPath, name: &str) -> bool {
    let base = path.input_name(&[]);
    name.strip_prefix(base.as_str())
        .is_some_and(|rest| rest.starts_with('['))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use profile_select_core::{Address, Owner, ProfileId, ProfileSelection, ProfileType, UserId};

    use super::*;
    use crate::display::AddressFormDisplay;
    use crate::input::FormInput;
    use crate::state::Mode;
    use crate::store::InMemoryProfileStore;

    const OWNER: UserId = UserId::new(4);

    fn store() -> InMemoryProfileStore {
        let store = InMemoryProfileStore::new([ProfileType::new("customer")]);
        store.register_user(OWNER).unwrap();
        let mut profile = store
            .create(&ProfileType::new("customer"), Owner::new(OWNER))
            .with_address(Address {
                country_code: Some("US".to_string()),
                given_name: Some("Ned".to_string()),
                family_name: Some("Flanders".to_string()),
                address_line1: Some("744 Evergreen Terrace".to_string()),
                locality: Some("Springfield".to_string()),
                ..Default::default()
            });
        profile.is_default = true;
        store.save(&mut profile).unwrap();
        store
    }

    fn definitions() -> Vec<WidgetDefinition> {
        ["billing", "shipping"]
            .into_iter()
            .map(|name| {
                WidgetDefinition::new(
                    WidgetPath::new([name]),
                    ProfileSelectConfig::builder("customer").owner(OWNER).build().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_owns_input() {
        let path = WidgetPath::new(["billing"]);
        assert!(owns_input(&path, "billing[profile_selection]"));
        assert!(!owns_input(&path, "billing_edit_profile"));
        assert!(!owns_input(&path, "billing2[profile_selection]"));
    }

    #[test]
    fn test_initial_render() {
        let store = store();
        let display = AddressFormDisplay::new();
        let widgets = definitions();
        let form = ProfileSelectForm::new(&store, &display, &widgets);

        let response = form.process(&mut FormState::new(), &FormRequest::initial()).unwrap();
        assert_eq!(response.outcome, FormOutcome::Rendered);
        assert_eq!(response.elements.len(), 2);
        assert!(response.elements.iter().all(|e| e.mode == Mode::View));
    }

    #[test]
    fn test_edit_button_refreshes_only_its_widget() {
        let store = store();
        let display = AddressFormDisplay::new();
        let widgets = definitions();
        let form = ProfileSelectForm::new(&store, &display, &widgets);
        let mut state = FormState::new();

        let request = FormRequest::refresh("shipping_edit_profile", FormInput::new());
        let response = form.process(&mut state, &request).unwrap();

        assert_eq!(response.outcome, FormOutcome::Refreshed);
        assert_eq!(response.refresh_target.as_deref(), Some("shipping-ajax-wrapper"));
        let shipping = response.refresh_element().unwrap();
        assert_eq!(shipping.mode, Mode::Edit);
        let billing = response.element(&WidgetPath::new(["billing"])).unwrap();
        assert_eq!(billing.mode, Mode::View);
    }

    #[test]
    fn test_invalid_submit_reports_errors() {
        let store = store();
        let display = AddressFormDisplay::new();
        let widgets = definitions();
        let form = ProfileSelectForm::new(&store, &display, &widgets);

        let input: FormInput = [
            ("billing[profile_selection]", "_new"),
            ("billing[address][0][address][locality]", "Springfield"),
            ("shipping[profile_selection]", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let response = form
            .process(&mut FormState::new(), &FormRequest::submit(input))
            .unwrap();

        assert_eq!(response.outcome, FormOutcome::Invalid);
        assert!(response.errors().count() > 0);
        let shipping = response.element(&WidgetPath::new(["shipping"])).unwrap();
        assert!(shipping.errors.is_empty());
        assert_eq!(store.save_count().unwrap(), 1);
    }

    #[test]
    fn test_submit_returns_submissions() {
        let store = store();
        let display = AddressFormDisplay::new();
        let widgets = definitions();
        let form = ProfileSelectForm::new(&store, &display, &widgets);

        let input: FormInput = [
            ("billing[profile_selection]", "1"),
            ("shipping[profile_selection]", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let response = form
            .process(&mut FormState::new(), &FormRequest::submit(input))
            .unwrap();

        let submissions = response.submissions().unwrap();
        assert_eq!(submissions.len(), 2);
        assert!(submissions.iter().all(|s| !s.saved));
        let expected = ProfileSelection::Existing(ProfileId::new(1));
        assert!(submissions.iter().all(|s| s.next_initial_value.selection() == expected));
    }
}
