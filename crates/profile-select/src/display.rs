//! Field display: how a profile's fields become a sub-form and back.
//!
//! The widget does not know which fields a profile type carries. A
//! [`FieldDisplay`] builds the editable sub-form and the read-only view,
//! applies submitted values onto a profile, and reports field errors.
//! [`AddressFormDisplay`] is a minimal display for profiles that carry an
//! address plus optional text fields; it checks required parts only and does
//! no address validation of its own.

use profile_select_core::{Address, CountryCode, Profile};
use serde::Serialize;

use crate::input::WidgetInput;

/// A field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field the message belongs to, e.g. `address.locality`.
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Wrapper rendered around a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldWrapper {
    /// Collapsible box with its own title.
    Details,
    /// Plain container, for fields embedded in another widget.
    Container,
}

/// Address sub-form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressWidget {
    /// Values shown in the form.
    pub value: Address,
    /// Countries the form offers. Empty means unrestricted.
    pub available_countries: Vec<CountryCode>,
    pub wrapper: FieldWrapper,
    pub required: bool,
    /// Address parts that must be filled in.
    pub required_parts: Vec<&'static str>,
}

/// Kind-specific part of a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Address(AddressWidget),
    Text { value: Option<String>, required: bool },
}

/// One field of a profile sub-form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
}

/// Editable sub-form for a profile's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubForm {
    pub fields: Vec<FormField>,
}

impl SubForm {
    /// Name of the field that carries the profile address.
    pub const ADDRESS_FIELD: &'static str = "address";

    /// The address widget, if the sub-form has one.
    #[must_use]
    pub fn address_widget(&self) -> Option<&AddressWidget> {
        self.fields
            .iter()
            .filter(|field| field.name == Self::ADDRESS_FIELD)
            .find_map(|field| match &field.kind {
                FieldKind::Address(widget) => Some(widget),
                FieldKind::Text { .. } => None,
            })
    }

    /// Mutable access to the address widget.
    pub fn address_widget_mut(&mut self) -> Option<&mut AddressWidget> {
        self.fields
            .iter_mut()
            .filter(|field| field.name == Self::ADDRESS_FIELD)
            .find_map(|field| match &mut field.kind {
                FieldKind::Address(widget) => Some(widget),
                FieldKind::Text { .. } => None,
            })
    }
}

/// Read-only presentation of a saved profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedProfile {
    pub label: String,
    pub lines: Vec<String>,
}

/// Builds, reads back and validates the sub-form of a profile.
pub trait FieldDisplay {
    /// Build the editable sub-form, seeded from the profile's values.
    fn build_form(&self, profile: &Profile) -> SubForm;

    /// Build the read-only presentation.
    fn view(&self, profile: &Profile) -> RenderedProfile;

    /// Apply submitted values onto the profile.
    fn extract(&self, profile: &mut Profile, input: &WidgetInput);

    /// Check the profile after [`FieldDisplay::extract`].
    fn validate(&self, profile: &Profile, input: &WidgetInput) -> Vec<FieldError>;
}

/// Text field definition of an [`AddressFormDisplay`].
#[derive(Debug, Clone, PartialEq, Eq)]
struct TextField {
    name: String,
    label: String,
    required: bool,
}

/// Field display for profiles with an address and optional text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressFormDisplay {
    required_parts: Vec<&'static str>,
    text_fields: Vec<TextField>,
}

impl Default for AddressFormDisplay {
    fn default() -> Self {
        Self {
            required_parts: vec![
                "country_code",
                "given_name",
                "family_name",
                "address_line1",
                "locality",
            ],
            text_fields: Vec::new(),
        }
    }
}

impl AddressFormDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set of address parts that must be filled in.
    #[must_use]
    pub fn with_required_parts(mut self, parts: impl IntoIterator<Item = &'static str>) -> Self {
        self.required_parts = parts
            .into_iter()
            .filter(|part| Address::PARTS.contains(part))
            .collect();
        self
    }

    /// Add a single-value text field after the address.
    #[must_use]
    pub fn with_text_field(mut self, name: impl Into<String>, label: impl Into<String>, required: bool) -> Self {
        self.text_fields.push(TextField {
            name: name.into(),
            label: label.into(),
            required,
        });
        self
    }
}

impl FieldDisplay for AddressFormDisplay {
    fn build_form(&self, profile: &Profile) -> SubForm {
        let mut fields = vec![FormField {
            name: SubForm::ADDRESS_FIELD.to_owned(),
            label: "Address".to_owned(),
            kind: FieldKind::Address(AddressWidget {
                value: profile.address.clone().unwrap_or_default(),
                available_countries: Vec::new(),
                wrapper: FieldWrapper::Details,
                required: !self.required_parts.is_empty(),
                required_parts: self.required_parts.clone(),
            }),
        }];

        fields.extend(self.text_fields.iter().map(|field| FormField {
            name: field.name.clone(),
            label: field.label.clone(),
            kind: FieldKind::Text {
                value: profile.fields.get(&field.name).cloned(),
                required: field.required,
            },
        }));

        SubForm { fields }
    }

    fn view(&self, profile: &Profile) -> RenderedProfile {
        let mut lines = profile
            .address
            .as_ref()
            .map(Address::lines)
            .unwrap_or_default();
        lines.extend(
            self.text_fields
                .iter()
                .filter_map(|field| profile.fields.get(&field.name))
                .filter(|value| !value.is_empty())
                .cloned(),
        );

        RenderedProfile {
            label: profile.label(),
            lines,
        }
    }

    fn extract(&self, profile: &mut Profile, input: &WidgetInput) {
        if let Some(address) = &input.address {
            profile.address = Some(address.normalized());
        }
        for field in &self.text_fields {
            if let Some(value) = input.fields.get(&field.name) {
                profile.fields.insert(field.name.clone(), value.trim().to_owned());
            }
        }
    }

    fn validate(&self, profile: &Profile, _input: &WidgetInput) -> Vec<FieldError> {
        let address = profile.address.clone().unwrap_or_default();
        let mut errors: Vec<FieldError> = self
            .required_parts
            .iter()
            .filter(|part| address.part(part).is_none_or(|v| v.trim().is_empty()))
            .map(|part| {
                FieldError::new(
                    format!("address.{part}"),
                    format!("{} field is required.", part_label(part)),
                )
            })
            .collect();

        errors.extend(
            self.text_fields
                .iter()
                .filter(|field| field.required)
                .filter(|field| profile.fields.get(&field.name).is_none_or(String::is_empty))
                .map(|field| FieldError::new(field.name.clone(), format!("{} field is required.", field.label))),
        );

        errors
    }
}

/// Form label of an address part.
#[must_use]
pub fn part_label(part: &str) -> &'static str {
    match part {
        "country_code" => "Country",
        "given_name" => "First name",
        "additional_name" => "Middle name",
        "family_name" => "Last name",
        "organization" => "Company",
        "address_line1" => "Street address",
        "address_line2" => "Street address line 2",
        "locality" => "City",
        "dependent_locality" => "Neighborhood",
        "postal_code" => "Postal code",
        "sorting_code" => "Sorting code",
        "administrative_area" => "State",
        _ => "Address",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use profile_select_core::{Owner, ProfileType, UserId};

    use super::*;

    fn profile() -> Profile {
        Profile::new(&ProfileType::new("customer"), Owner::new(UserId::new(1)))
    }

    fn leipzig() -> Address {
        Address {
            country_code: Some("DE".to_string()),
            given_name: Some("Johann Sebastian".to_string()),
            family_name: Some("Bach".to_string()),
            address_line1: Some("Thomaskirchhof 15".to_string()),
            locality: Some("Leipzig".to_string()),
            postal_code: Some("04109".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_form_seeds_address() {
        let display = AddressFormDisplay::new();
        let form = display.build_form(&profile().with_address(leipzig()));

        let widget = form.address_widget().unwrap();
        assert_eq!(widget.value, leipzig());
        assert_eq!(widget.wrapper, FieldWrapper::Details);
        assert!(widget.required);
        assert!(widget.required_parts.contains(&"locality"));
    }

    #[test]
    fn test_extract_normalizes_address() {
        let display = AddressFormDisplay::new();
        let mut submitted = leipzig();
        submitted.address_line2 = Some(String::new());
        let input = WidgetInput {
            address: Some(submitted),
            ..Default::default()
        };

        let mut target = profile();
        display.extract(&mut target, &input);
        assert_eq!(target.address, Some(leipzig()));
    }

    #[test]
    fn test_extract_without_address_keeps_profile() {
        let display = AddressFormDisplay::new();
        let mut target = profile().with_address(leipzig());
        display.extract(&mut target, &WidgetInput::default());
        assert_eq!(target.address, Some(leipzig()));
    }

    #[test]
    fn test_validate_required_parts() {
        let display = AddressFormDisplay::new();
        let mut incomplete = leipzig();
        incomplete.locality = Some("  ".to_string());
        incomplete.given_name = None;

        let errors = display.validate(&profile().with_address(incomplete), &WidgetInput::default());
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["address.given_name", "address.locality"]);
        assert_eq!(errors[0].message, "First name field is required.");
    }

    #[test]
    fn test_validate_complete_address() {
        let display = AddressFormDisplay::new();
        let errors = display.validate(&profile().with_address(leipzig()), &WidgetInput::default());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_text_fields() {
        let display = AddressFormDisplay::new()
            .with_required_parts([])
            .with_text_field("phone", "Phone", true);

        let form = display.build_form(&profile());
        assert_eq!(form.fields.len(), 2);
        assert!(!form.address_widget().unwrap().required);

        let errors = display.validate(&profile(), &WidgetInput::default());
        assert_eq!(errors, vec![FieldError::new("phone", "Phone field is required.")]);

        let mut input = WidgetInput::default();
        input.fields.insert("phone".to_string(), " 555-0100 ".to_string());
        let mut target = profile();
        display.extract(&mut target, &input);
        assert_eq!(target.fields.get("phone").map(String::as_str), Some("555-0100"));
        assert!(display.validate(&target, &input).is_empty());
    }

    #[test]
    fn test_view_lists_address_lines() {
        let display = AddressFormDisplay::new();
        let rendered = display.view(&profile().with_address(leipzig()));
        assert_eq!(rendered.label, "Thomaskirchhof 15");
        assert!(rendered.lines.contains(&"04109 Leipzig".to_string()));
    }
}
