//! Domain models for the checkout.

pub mod session;
pub mod user;

pub use session::{SelectedProfiles, keys as session_keys};
pub use user::DemoUser;
