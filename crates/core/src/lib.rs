//! Profile Select Core - Shared types library.
//!
//! This crate provides the domain types used across the workspace:
//! - `profile-select` - The profile selection widget state machine
//! - `checkout` - Demo checkout server embedding the widget
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage, no HTTP. This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, country codes, address values, profiles and selections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
