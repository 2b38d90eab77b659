//! Profile select widget.
//!
//! A form widget that lets a customer pick one of their saved address
//! profiles, edit it, or enter a new one inline, inside a larger checkout form.
//!
//! # Architecture
//!
//! The widget is a small state machine over explicit state structs. It never
//! talks to a database, a template engine or a session directly; the host
//! injects those through traits:
//!
//! - [`ProfileStore`] - loads, creates and saves profiles
//! - [`FieldDisplay`] - builds, reads back and validates the profile sub-form
//! - [`FormState`] - request-spanning key/value state the host keeps in its session
//!
//! A request runs through three phases:
//!
//! 1. [`ProfileSelect::build`] resolves the mode (view, edit or create) and
//!    produces the render tree
//! 2. [`ProfileSelect::validate`] reconciles the chosen profile with the
//!    submitted address, falling back to "create new" when it was edited
//! 3. [`ProfileSelect::submit`] saves new profiles, exactly once
//!
//! [`ProfileSelectForm`] runs those phases for every widget in a form and tells
//! the host whether to rebuild, refresh one widget, or finish the submission.
//!
//! # Modules
//!
//! - [`config`] - Widget configuration and its validation
//! - [`display`] - Field display trait and the built-in address display
//! - [`element`] - Render tree types
//! - [`form`] - Multi-widget request orchestration
//! - [`input`] - Request and submitted input capture
//! - [`state`] - Modes, widget paths and form state
//! - [`store`] - Profile store trait and the in-memory store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod display;
pub mod element;
pub mod error;
pub mod form;
pub mod input;
mod mode;
mod persistence;
mod selection;
pub mod state;
pub mod store;
mod widget;

pub use config::{ConfigError, InitialValue, ProfileSelectConfig, ProfileSelectConfigBuilder};
pub use display::{
    AddressFormDisplay, AddressWidget, FieldDisplay, FieldError, FieldKind, FieldWrapper,
    FormField, RenderedProfile, SubForm, part_label,
};
pub use element::{Button, Element, ElementContent, SelectOption, SelectionControl};
pub use error::{ProfileSelectError, Result};
pub use form::{FormOutcome, FormResponse, ProfileSelectForm, WidgetDefinition};
pub use input::{FormInput, FormRequest, RequestKind, WidgetInput};
pub use persistence::Submission;
pub use selection::Validation;
pub use state::{FormState, Mode, WidgetPath};
pub use store::{InMemoryProfileStore, ProfileStore, StoreError};
pub use widget::ProfileSelect;

pub use profile_select_core as core;
