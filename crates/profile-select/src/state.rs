//! Widget modes, structural paths and request-spanning form state.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Display mode of a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Read-only presentation of a saved profile.
    #[default]
    View,
    /// Editing the fields of a saved profile.
    Edit,
    /// Entering a new, unsaved profile.
    Create,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => write!(f, "view"),
            Self::Edit => write!(f, "edit"),
            Self::Create => write!(f, "create"),
        }
    }
}

/// Structural position of a widget inside its form, e.g. `["billing_profile"]`.
///
/// Every name, id and state key of a widget instance derives from its path,
/// which is what keeps several instances in one form apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetPath(Vec<String>);

impl WidgetPath {
    /// Create a path from its parent keys, outermost first.
    #[must_use]
    pub fn new<I, S>(parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parents.into_iter().map(Into::into).collect())
    }

    /// The parent keys, outermost first.
    #[must_use]
    pub fn parents(&self) -> &[String] {
        &self.0
    }

    /// Parent keys joined with `-`.
    #[must_use]
    pub fn id_prefix(&self) -> String {
        self.0.join("-")
    }

    /// Form state key under which the widget's mode survives refreshes.
    #[must_use]
    pub fn mode_key(&self) -> String {
        format!("element_mode-{}-edit_button", self.id_prefix())
    }

    /// HTML id of the element wrapping the widget, target of partial refreshes.
    #[must_use]
    pub fn wrapper_id(&self) -> String {
        html_id(&format!("{}-ajax-wrapper", self.id_prefix()))
    }

    /// Name of the "Edit" button, unique across widgets in one form.
    #[must_use]
    pub fn edit_button_name(&self) -> String {
        let mut name = self.0.join("_");
        if !name.is_empty() {
            name.push('_');
        }
        name.push_str("edit_profile");
        name
    }

    /// HTML input name of a child of this widget: `a[b][child][grandchild]`.
    #[must_use]
    pub fn input_name(&self, children: &[&str]) -> String {
        let mut segments = self.0.iter().map(String::as_str).chain(children.iter().copied());
        let mut name = segments.next().unwrap_or_default().to_owned();
        for segment in segments {
            name.push('[');
            name.push_str(segment);
            name.push(']');
        }
        name
    }

    /// HTML input name of the selection control.
    #[must_use]
    pub fn selection_input_name(&self) -> String {
        self.input_name(&["profile_selection"])
    }

    /// HTML input name of one address part.
    #[must_use]
    pub fn address_input_name(&self, part: &str) -> String {
        self.input_name(&["address", "0", "address", part])
    }
}

impl fmt::Display for WidgetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Clean a string into a valid HTML id.
fn html_id(raw: &str) -> String {
    let mut id = String::with_capacity(raw.len());
    for c in raw.to_lowercase().chars() {
        let c = match c {
            ' ' | '_' | '[' => '-',
            ']' => continue,
            c if c.is_ascii_alphanumeric() || c == '-' => c,
            _ => continue,
        };
        if c == '-' && id.ends_with('-') {
            continue;
        }
        id.push(c);
    }
    id
}

/// Key/value state that outlives a single request of one form.
///
/// The host keeps it in its session between the initial render, partial
/// refreshes and the final submit, and discards it afterwards. Widgets only
/// touch keys derived from their own [`WidgetPath`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    values: BTreeMap<String, serde_json::Value>,
}

impl FormState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value. Missing keys and values of another shape yield `None`.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Store a value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.values.insert(key.into(), value);
        Ok(())
    }

    /// Remove a value. Returns `true` if it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The stored mode of a widget, [`Mode::View`] when none was stored.
    #[must_use]
    pub fn mode(&self, path: &WidgetPath) -> Mode {
        self.get(&path.mode_key()).unwrap_or_default()
    }

    /// Remember the mode of a widget across refreshes.
    ///
    /// # Errors
    ///
    /// Returns an error if the mode cannot be serialized.
    pub fn set_mode(&mut self, path: &WidgetPath, mode: Mode) -> Result<(), serde_json::Error> {
        self.set(path.mode_key(), &mode)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_single_segment_names() {
        let path = WidgetPath::new(["profile"]);
        assert_eq!(path.mode_key(), "element_mode-profile-edit_button");
        assert_eq!(path.wrapper_id(), "profile-ajax-wrapper");
        assert_eq!(path.edit_button_name(), "profile_edit_profile");
        assert_eq!(path.selection_input_name(), "profile[profile_selection]");
        assert_eq!(
            path.address_input_name("locality"),
            "profile[address][0][address][locality]"
        );
    }

    #[test]
    fn test_nested_path_names() {
        let path = WidgetPath::new(["payment_information", "billing_information"]);
        assert_eq!(
            path.mode_key(),
            "element_mode-payment_information-billing_information-edit_button"
        );
        assert_eq!(
            path.wrapper_id(),
            "payment-information-billing-information-ajax-wrapper"
        );
        assert_eq!(
            path.edit_button_name(),
            "payment_information_billing_information_edit_profile"
        );
        assert_eq!(
            path.selection_input_name(),
            "payment_information[billing_information][profile_selection]"
        );
    }

    #[test]
    fn test_html_id_cleans_characters() {
        assert_eq!(html_id("Profile 1__[x]"), "profile-1-x");
        assert_eq!(html_id("a.b-c"), "ab-c");
    }

    #[test]
    fn test_form_state_modes_are_per_path() {
        let billing = WidgetPath::new(["billing"]);
        let shipping = WidgetPath::new(["shipping"]);
        let mut state = FormState::new();

        assert_eq!(state.mode(&billing), Mode::View);
        state.set_mode(&billing, Mode::Edit).unwrap();

        assert_eq!(state.mode(&billing), Mode::Edit);
        assert_eq!(state.mode(&shipping), Mode::View);
    }

    #[test]
    fn test_form_state_get_wrong_shape() {
        let mut state = FormState::new();
        state.set("count", &3).unwrap();
        assert_eq!(state.get::<u32>("count"), Some(3));
        assert_eq!(state.get::<Mode>("count"), None);
        assert!(state.remove("count"));
        assert!(!state.remove("count"));
        assert!(state.is_empty());
    }

    #[test]
    fn test_form_state_serde_roundtrip() {
        let path = WidgetPath::new(["profile"]);
        let mut state = FormState::new();
        state.set_mode(&path, Mode::Edit).unwrap();

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "element_mode-profile-edit_button": "edit" })
        );
        let parsed: FormState = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.mode(&path), Mode::Edit);
    }
}
