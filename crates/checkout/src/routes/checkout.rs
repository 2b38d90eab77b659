//! Checkout route handlers.
//!
//! The checkout form embeds two profile select widgets. Widget controls use
//! HTMX to re-render only their own wrapper; without JavaScript every button
//! posts the whole form and the full page comes back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use profile_select::{
    Element, FieldKind, FormInput, FormOutcome, FormRequest, FormResponse, FormState, ProfileSelectForm,
    RequestKind, Submission, WidgetDefinition, WidgetPath, part_label,
};
use profile_select_core::{Address, UserId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::CurrentOwner;
use crate::models::{DemoUser, SelectedProfiles, session_keys};
use crate::state::{AppState, BILLING_PROFILE, SHIPPING_PROFILE};

/// Form field carrying the triggering control's name for non-HTMX refreshes.
pub const TRIGGER_FIELD: &str = "_triggering_element_name";

/// Header HTMX sets to the name of the triggering control.
pub const HX_TRIGGER_NAME: &str = "hx-trigger-name";

// =============================================================================
// View Models
// =============================================================================

/// One `<option>` of a select.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// The profile selection dropdown.
#[derive(Debug, Clone)]
pub struct SelectionView {
    pub id: String,
    pub name: String,
    pub title: String,
    pub options: Vec<OptionView>,
}

/// Read-only presentation of the selected profile.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub label: String,
    pub lines: Vec<String>,
    pub edit_button: String,
    pub edit_label: String,
}

/// One input of the profile sub-form.
#[derive(Debug, Clone)]
pub struct FieldView {
    pub id: String,
    pub name: String,
    pub label: String,
    pub value: String,
    pub required: bool,
    /// Choices for a select; empty renders a text input.
    pub options: Vec<OptionView>,
    pub error: Option<String>,
}

/// A profile select widget ready for the template.
#[derive(Debug, Clone)]
pub struct WidgetView {
    pub wrapper_id: String,
    pub legend: String,
    pub mode: String,
    pub selection_name: String,
    pub selection: Option<SelectionView>,
    pub profile: Option<ProfileView>,
    pub fields: Vec<FieldView>,
    pub has_errors: bool,
}

impl WidgetView {
    fn new(element: &Element, legend: &str) -> Self {
        let path = &element.path;
        let error_for = |field: &str| {
            element
                .errors
                .iter()
                .find(|e| e.field == field)
                .map(|e| e.message.clone())
        };

        let selection = element.selection_control.as_ref().map(|control| SelectionView {
            id: input_id(&control.name),
            name: control.name.clone(),
            title: control.title.clone(),
            options: control
                .options
                .iter()
                .map(|option| OptionView {
                    value: option.value.to_string(),
                    label: option.label.clone(),
                    selected: option.value == control.selected,
                })
                .collect(),
        });

        let profile = element.rendered_profile().zip(element.edit_button()).map(|(rendered, button)| ProfileView {
            label: rendered.label.clone(),
            lines: rendered.lines.clone(),
            edit_button: button.name.clone(),
            edit_label: button.label.clone(),
        });

        let mut fields = Vec::new();
        for field in element.form().map(|form| form.fields.as_slice()).unwrap_or_default() {
            match &field.kind {
                FieldKind::Address(widget) => {
                    for part in Address::PARTS {
                        let name = path.address_input_name(part);
                        let value = widget.value.part(part).unwrap_or_default().to_owned();
                        let options = if part == "country_code" {
                            widget
                                .available_countries
                                .iter()
                                .map(|country| OptionView {
                                    selected: country.as_str() == value,
                                    value: country.to_string(),
                                    label: country.to_string(),
                                })
                                .collect()
                        } else {
                            Vec::new()
                        };
                        fields.push(FieldView {
                            id: input_id(&name),
                            name,
                            label: part_label(part).to_owned(),
                            value,
                            required: widget.required_parts.contains(&part),
                            options,
                            error: error_for(&format!("address.{part}")),
                        });
                    }
                }
                FieldKind::Text { value, required } => {
                    let name = path.input_name(&[&field.name, "0", "value"]);
                    fields.push(FieldView {
                        id: input_id(&name),
                        name,
                        label: field.label.clone(),
                        value: value.clone().unwrap_or_default(),
                        required: *required,
                        options: Vec::new(),
                        error: error_for(&field.name),
                    });
                }
            }
        }

        Self {
            wrapper_id: element.wrapper_id.clone(),
            legend: legend.to_owned(),
            mode: element.mode.to_string(),
            selection_name: path.selection_input_name(),
            selection,
            profile,
            fields,
            has_errors: !element.errors.is_empty(),
        }
    }
}

/// Legend of a checkout widget.
fn legend(path: &WidgetPath) -> &'static str {
    match path.parents().first().map(String::as_str) {
        Some(BILLING_PROFILE) => "Billing information",
        Some(SHIPPING_PROFILE) => "Shipping information",
        _ => "Profile",
    }
}

/// Name of the profile chosen in a checkout widget, for messages.
fn profile_noun(path: &WidgetPath) -> &'static str {
    match path.parents().first().map(String::as_str) {
        Some(BILLING_PROFILE) => "Billing profile",
        Some(SHIPPING_PROFILE) => "Shipping profile",
        _ => "Profile",
    }
}

/// HTML id of an input, derived from its name.
fn input_id(name: &str) -> String {
    name.chars()
        .filter_map(|c| match c {
            '[' | '_' => Some('-'),
            ']' => None,
            c => Some(c),
        })
        .collect()
}

fn widget_views(response: &FormResponse) -> Vec<WidgetView> {
    response
        .elements
        .iter()
        .map(|element| WidgetView::new(element, legend(&element.path)))
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// Full checkout page.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/form.html")]
pub struct CheckoutFormTemplate {
    pub widgets: Vec<WidgetView>,
    pub users: Vec<DemoUser>,
    pub owner: UserId,
    pub has_errors: bool,
}

/// The checkout `<form>` alone (for HTMX retargeting).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_form.html")]
pub struct CheckoutFormPartial {
    pub widgets: Vec<WidgetView>,
    pub has_errors: bool,
}

/// One widget wrapper (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/profile_select.html")]
pub struct ProfileSelectPartial {
    pub widget: WidgetView,
}

/// Checkout completed page.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/complete.html")]
pub struct CheckoutCompleteTemplate {
    pub messages: Vec<String>,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the checkout form state from the session.
async fn get_form_state(session: &Session) -> Result<FormState> {
    Ok(session
        .get::<FormState>(session_keys::FORM_STATE)
        .await?
        .unwrap_or_default())
}

/// Set the checkout form state in the session.
async fn set_form_state(session: &Session, form_state: &FormState) -> Result<()> {
    session.insert(session_keys::FORM_STATE, form_state).await?;
    Ok(())
}

/// Get the profiles chosen by the last completed checkout.
async fn get_selected_profiles(session: &Session) -> Result<SelectedProfiles> {
    Ok(session
        .get::<SelectedProfiles>(session_keys::SELECTED_PROFILES)
        .await?
        .unwrap_or_default())
}

/// Run one request through the checkout's profile select form.
async fn process(
    state: &AppState,
    session: &Session,
    owner: UserId,
    form_state: &mut FormState,
    request: &FormRequest,
) -> Result<FormResponse> {
    let selected = get_selected_profiles(session).await?;
    let widgets: Vec<WidgetDefinition> = state
        .checkout_widgets(owner, &selected)
        .map_err(profile_select::ProfileSelectError::from)?;
    let form = ProfileSelectForm::new(state.store(), state.display(), &widgets);
    Ok(form.process(form_state, request)?)
}

// =============================================================================
// Handlers
// =============================================================================

/// Redirect the site root to the checkout.
pub async fn index() -> Redirect {
    Redirect::to("/checkout")
}

/// Display the checkout form with a fresh form state.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    CurrentOwner(owner): CurrentOwner,
) -> Result<Response> {
    let mut form_state = FormState::new();
    let response = process(&state, &session, owner, &mut form_state, &FormRequest::initial()).await?;
    set_form_state(&session, &form_state).await?;

    Ok(full_page(&state, owner, &response).into_response())
}

/// Full form post: the final submit, or a button press without JavaScript.
#[instrument(skip(state, session, input))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    CurrentOwner(owner): CurrentOwner,
    Form(input): Form<FormInput>,
) -> Result<Response> {
    let mut form_state = get_form_state(&session).await?;
    let request = submit_request(input);
    let response = process(&state, &session, owner, &mut form_state, &request).await?;

    if let FormOutcome::Submitted(submissions) = &response.outcome {
        session.remove::<FormState>(session_keys::FORM_STATE).await?;
        let mut selected = get_selected_profiles(&session).await?;
        for submission in submissions {
            if let Some(id) = submission.value {
                selected.insert(&submission.path, id);
            }
        }
        session.insert(session_keys::SELECTED_PROFILES, &selected).await?;

        let messages = submissions.iter().map(completion_message).collect();
        add_breadcrumb("checkout", "Checkout completed", None);
        tracing::info!(owner = %owner, widgets = submissions.len(), "checkout completed");
        return Ok(CheckoutCompleteTemplate { messages }.into_response());
    }

    set_form_state(&session, &form_state).await?;
    Ok(full_page(&state, owner, &response).into_response())
}

/// Partial refresh of one widget (HTMX).
///
/// The triggering control comes from the `HX-Trigger-Name` header or the
/// `_triggering_element_name` field.
#[instrument(skip(state, session, headers, input))]
pub async fn refresh(
    State(state): State<AppState>,
    session: Session,
    CurrentOwner(owner): CurrentOwner,
    headers: HeaderMap,
    Form(mut input): Form<FormInput>,
) -> Result<Response> {
    let field_trigger = input.remove(TRIGGER_FIELD);
    let trigger = headers
        .get(HX_TRIGGER_NAME)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .or(field_trigger)
        .filter(|name| !name.is_empty());

    let mut form_state = get_form_state(&session).await?;
    let request = FormRequest {
        kind: RequestKind::Refresh,
        triggering_element: trigger,
        input,
    };
    let response = process(&state, &session, owner, &mut form_state, &request).await?;
    set_form_state(&session, &form_state).await?;

    if let Some(element) = response.refresh_element() {
        let widget = WidgetView::new(element, legend(&element.path));
        return Ok(ProfileSelectPartial { widget }.into_response());
    }

    let widgets = widget_views(&response);
    let has_errors = widgets.iter().any(|w| w.has_errors);
    Ok((
        AppendHeaders([("HX-Retarget", "#checkout-form"), ("HX-Reswap", "outerHTML")]),
        CheckoutFormPartial { widgets, has_errors },
    )
        .into_response())
}

/// Build the request for a full form post.
///
/// A posted edit button name marks the press of that button; anything else
/// is the final submit.
fn submit_request(mut input: FormInput) -> FormRequest {
    let field_trigger = input.remove(TRIGGER_FIELD).filter(|name| !name.is_empty());
    let edit_button = input.keys().find(|name| name.ends_with("_edit_profile")).cloned();
    let trigger = edit_button.or(field_trigger);

    let request = FormRequest::submit(input);
    match trigger {
        Some(trigger) => request.triggered_by(trigger),
        None => request,
    }
}

fn full_page(state: &AppState, owner: UserId, response: &FormResponse) -> CheckoutFormTemplate {
    let widgets = widget_views(response);
    CheckoutFormTemplate {
        has_errors: widgets.iter().any(|w| w.has_errors),
        widgets,
        users: state.users().to_vec(),
        owner,
    }
}

fn completion_message(submission: &Submission) -> String {
    format!("{} selected: {}", profile_noun(&submission.path), submission.profile.label())
}
