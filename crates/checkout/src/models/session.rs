//! Session-related types.
//!
//! Types stored in the session between checkout requests.

use std::collections::BTreeMap;

use profile_select::WidgetPath;
use profile_select_core::ProfileId;
use serde::{Deserialize, Serialize};

/// Profiles chosen by the last completed checkout, keyed by widget path.
///
/// Seeds the initial value of each widget on the next checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedProfiles(BTreeMap<String, ProfileId>);

impl SelectedProfiles {
    /// The profile last chosen in the widget at `path`.
    #[must_use]
    pub fn get(&self, path: &WidgetPath) -> Option<ProfileId> {
        self.0.get(&path.id_prefix()).copied()
    }

    /// Remember the profile chosen in the widget at `path`.
    pub fn insert(&mut self, path: &WidgetPath, id: ProfileId) {
        self.0.insert(path.id_prefix(), id);
    }
}

/// Session keys for checkout data.
pub mod keys {
    /// Key for the demo owner the checkout runs as.
    pub const CURRENT_OWNER: &str = "current_owner";

    /// Key for the profile select form state of the checkout in progress.
    pub const FORM_STATE: &str = "checkout_form_state";

    /// Key for the profiles chosen by the last completed checkout.
    pub const SELECTED_PROFILES: &str = "checkout_selected_profiles";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_profiles_by_path() {
        let billing = WidgetPath::new(["billing_profile"]);
        let shipping = WidgetPath::new(["shipping_profile"]);
        let mut selected = SelectedProfiles::default();
        selected.insert(&billing, ProfileId::new(4));

        assert_eq!(selected.get(&billing), Some(ProfileId::new(4)));
        assert_eq!(selected.get(&shipping), None);

        let json = serde_json::to_value(&selected).unwrap();
        assert_eq!(json, serde_json::json!({ "billing_profile": 4 }));
    }
}
