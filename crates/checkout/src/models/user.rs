//! Demo users the checkout can run as.

use profile_select_core::UserId;
use serde::{Deserialize, Serialize};

/// A user of the demo checkout.
///
/// Only the id reaches the profile store; the name is for the owner switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoUser {
    pub id: UserId,
    pub name: String,
}

impl DemoUser {
    /// The anonymous guest, who never has saved profiles.
    #[must_use]
    pub fn guest() -> Self {
        Self {
            id: UserId::ANONYMOUS,
            name: "Guest".to_string(),
        }
    }
}
