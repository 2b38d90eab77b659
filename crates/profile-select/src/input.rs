//! Requests and submitted input.

use std::collections::BTreeMap;

use profile_select_core::Address;

use crate::state::WidgetPath;

/// Submitted form values, keyed by HTML input name.
pub type FormInput = BTreeMap<String, String>;

/// What kind of round-trip a request is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestKind {
    /// First render of the form, nothing submitted.
    #[default]
    Initial,
    /// A partial refresh triggered by a widget control; never persists.
    Refresh,
    /// The form's final submit.
    Submit,
}

/// One request against a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormRequest {
    pub kind: RequestKind,
    /// Input name of the control that triggered the request, if any.
    pub triggering_element: Option<String>,
    pub input: FormInput,
}

impl FormRequest {
    /// The first render of a form.
    #[must_use]
    pub fn initial() -> Self {
        Self::default()
    }

    /// A partial refresh triggered by `trigger`.
    #[must_use]
    pub fn refresh(trigger: impl Into<String>, input: FormInput) -> Self {
        Self {
            kind: RequestKind::Refresh,
            triggering_element: Some(trigger.into()),
            input,
        }
    }

    /// The final submit of the form.
    #[must_use]
    pub fn submit(input: FormInput) -> Self {
        Self {
            kind: RequestKind::Submit,
            triggering_element: None,
            input,
        }
    }

    /// Builder-style helper to name the triggering control.
    #[must_use]
    pub fn triggered_by(mut self, trigger: impl Into<String>) -> Self {
        self.triggering_element = Some(trigger.into());
        self
    }

    /// Whether submitted values are being processed.
    #[must_use]
    pub fn is_processing_input(&self) -> bool {
        self.kind != RequestKind::Initial
    }

    /// Whether this is the final submit rather than a refresh.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.kind == RequestKind::Submit
    }

    /// Whether the control named `name` triggered this request.
    #[must_use]
    pub fn is_triggered_by(&self, name: &str) -> bool {
        self.triggering_element.as_deref() == Some(name)
    }
}

/// The submitted values that belong to one widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetInput {
    /// Raw value of the selection control.
    pub profile_selection: Option<String>,
    /// Address sub-form values. `None` when no address part was submitted.
    pub address: Option<Address>,
    /// Other text fields, keyed by field name.
    pub fields: BTreeMap<String, String>,
}

impl WidgetInput {
    /// Pick the values of the widget at `path` out of the form input.
    ///
    /// Returns `None` when nothing was submitted for this widget, which marks
    /// its first build.
    #[must_use]
    pub fn capture(path: &WidgetPath, input: &FormInput) -> Option<Self> {
        let base = path.input_name(&[]);
        let mut captured = Self::default();
        let mut found = false;

        for (name, value) in input {
            let Some(rest) = name.strip_prefix(base.as_str()) else {
                continue;
            };
            let Some(segments) = parse_segments(rest) else {
                continue;
            };
            found = true;

            match segments.as_slice() {
                ["profile_selection"] => captured.profile_selection = Some(value.clone()),
                ["address", "0", "address", part] => {
                    captured
                        .address
                        .get_or_insert_with(Address::default)
                        .set_part(part, Some(value.clone()));
                }
                [field, "0", "value"] | [field] => {
                    captured.fields.insert((*field).to_owned(), value.clone());
                }
                _ => {}
            }
        }

        found.then_some(captured)
    }

    /// The submitted selection, if one was made.
    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.profile_selection
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Forget the submitted address so the next build shows stored values.
    pub fn clear_address(&mut self) {
        self.address = None;
    }
}

/// Split `[a][b][c]` into `["a", "b", "c"]`.
fn parse_segments(rest: &str) -> Option<Vec<&str>> {
    let inner = rest.strip_prefix('[')?.strip_suffix(']')?;
    let segments: Vec<&str> = inner.split("][").collect();
    if segments.iter().any(|s| s.is_empty() || s.contains(['[', ']'])) {
        return None;
    }
    Some(segments)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormInput {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_capture_selection_and_address() {
        let path = WidgetPath::new(["profile"]);
        let input = form(&[
            ("profile[profile_selection]", "3"),
            ("profile[address][0][address][country_code]", "HU"),
            ("profile[address][0][address][locality]", "Budapest"),
            ("profile[address][0][address][address_line2]", ""),
            ("op", "Submit"),
        ]);

        let captured = WidgetInput::capture(&path, &input).unwrap();
        assert_eq!(captured.selection(), Some("3"));
        let address = captured.address.unwrap();
        assert_eq!(address.country_code.as_deref(), Some("HU"));
        assert_eq!(address.locality.as_deref(), Some("Budapest"));
        assert_eq!(address.address_line2.as_deref(), Some(""));
    }

    #[test]
    fn test_capture_ignores_other_widgets() {
        let path = WidgetPath::new(["profile"]);
        let input = form(&[
            ("profile2[profile_selection]", "_new"),
            ("profile2[address][0][address][locality]", "Leipzig"),
        ]);
        assert!(WidgetInput::capture(&path, &input).is_none());
    }

    #[test]
    fn test_capture_nested_path() {
        let path = WidgetPath::new(["payment", "billing"]);
        let input = form(&[
            ("payment[billing][profile_selection]", "_new"),
            ("payment[billing][phone][0][value]", "+36 1 234"),
        ]);

        let captured = WidgetInput::capture(&path, &input).unwrap();
        assert_eq!(captured.selection(), Some("_new"));
        assert!(captured.address.is_none());
        assert_eq!(captured.fields.get("phone").map(String::as_str), Some("+36 1 234"));
    }

    #[test]
    fn test_blank_selection_is_none() {
        let input = WidgetInput {
            profile_selection: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(input.selection(), None);
    }

    #[test]
    fn test_parse_segments() {
        assert_eq!(parse_segments("[a][b]"), Some(vec!["a", "b"]));
        assert_eq!(parse_segments("a][b]"), None);
        assert_eq!(parse_segments("[]"), None);
        assert_eq!(parse_segments(""), None);
    }

    #[test]
    fn test_request_kinds() {
        assert!(!FormRequest::initial().is_processing_input());

        let refresh = FormRequest::refresh("profile[profile_selection]", FormInput::new());
        assert!(refresh.is_processing_input());
        assert!(!refresh.is_submitted());
        assert!(refresh.is_triggered_by("profile[profile_selection]"));

        let submit = FormRequest::submit(FormInput::new()).triggered_by("op");
        assert!(submit.is_submitted());
        assert!(submit.is_triggered_by("op"));
    }
}
