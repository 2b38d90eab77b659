//! Render tree of a built widget.
//!
//! Hosts turn an [`Element`] into markup however they like; everything here
//! is plain data and serializes to JSON.

use profile_select_core::{Profile, ProfileSelection};
use serde::Serialize;

use crate::display::{FieldError, RenderedProfile, SubForm};
use crate::state::{Mode, WidgetPath};

/// One option of the selection control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// Submitted value: a profile id or `_new`.
    pub value: ProfileSelection,
    pub label: String,
}

/// Dropdown listing the owner's profiles plus "create new".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionControl {
    /// HTML input name.
    pub name: String,
    pub title: String,
    pub options: Vec<SelectOption>,
    pub selected: ProfileSelection,
}

/// A submit button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    /// HTML input name, unique within the form.
    pub name: String,
    pub label: String,
}

/// Body of the widget below the selection control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementContent {
    /// Saved profile shown read-only, with a button to start editing.
    View {
        rendered: RenderedProfile,
        edit_button: Button,
    },
    /// Editable sub-form of the active profile.
    Form { form: SubForm },
}

/// A built widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub path: WidgetPath,
    /// Id of the wrapper element; partial refreshes replace this subtree.
    pub wrapper_id: String,
    /// The active selection.
    pub value: ProfileSelection,
    pub mode: Mode,
    /// The active profile; unsaved when `value` is "create new".
    pub profile: Profile,
    /// `None` when there is nothing to choose from.
    pub selection_control: Option<SelectionControl>,
    pub content: ElementContent,
    /// Field errors from the last validation.
    pub errors: Vec<FieldError>,
}

impl Element {
    /// The editable sub-form, when the widget is not in view mode.
    #[must_use]
    pub const fn form(&self) -> Option<&SubForm> {
        match &self.content {
            ElementContent::Form { form } => Some(form),
            ElementContent::View { .. } => None,
        }
    }

    /// The read-only presentation, when the widget is in view mode.
    #[must_use]
    pub const fn rendered_profile(&self) -> Option<&RenderedProfile> {
        match &self.content {
            ElementContent::View { rendered, .. } => Some(rendered),
            ElementContent::Form { .. } => None,
        }
    }

    /// The edit button, when the widget is in view mode.
    #[must_use]
    pub const fn edit_button(&self) -> Option<&Button> {
        match &self.content {
            ElementContent::View { edit_button, .. } => Some(edit_button),
            ElementContent::Form { .. } => None,
        }
    }
}
