//! Core types for profile selection.
//!
//! This module provides type-safe wrappers for the widget's domain concepts.

pub mod address;
pub mod country;
pub mod id;
pub mod profile;
pub mod selection;

pub use address::Address;
pub use country::{CountryCode, CountryCodeError};
pub use id::*;
pub use profile::{Owner, Profile, ProfileType};
pub use selection::{ProfileSelection, SelectionParseError};
