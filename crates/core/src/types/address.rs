//! Postal address value.

use serde::{Deserialize, Serialize};

/// A structured postal address as captured by an address form.
///
/// Every part is optional: submitted forms routinely leave parts out, and
/// address formats differ per country. Comparison between a submitted address
/// and a stored one goes through [`Address::equivalent`], which treats empty
/// strings and absent values as the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependent_locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorting_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_area: Option<String>,
}

impl Address {
    /// Names of the address parts, in form order.
    pub const PARTS: [&'static str; 12] = [
        "country_code",
        "given_name",
        "additional_name",
        "family_name",
        "organization",
        "address_line1",
        "address_line2",
        "locality",
        "dependent_locality",
        "postal_code",
        "sorting_code",
        "administrative_area",
    ];

    /// Get a part by name. Unknown part names return `None`.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&str> {
        let value = match name {
            "country_code" => &self.country_code,
            "given_name" => &self.given_name,
            "additional_name" => &self.additional_name,
            "family_name" => &self.family_name,
            "organization" => &self.organization,
            "address_line1" => &self.address_line1,
            "address_line2" => &self.address_line2,
            "locality" => &self.locality,
            "dependent_locality" => &self.dependent_locality,
            "postal_code" => &self.postal_code,
            "sorting_code" => &self.sorting_code,
            "administrative_area" => &self.administrative_area,
            _ => return None,
        };
        value.as_deref()
    }

    /// Set a part by name.
    ///
    /// Returns `false` if `name` is not a known address part.
    pub fn set_part(&mut self, name: &str, value: Option<String>) -> bool {
        let slot = match name {
            "country_code" => &mut self.country_code,
            "given_name" => &mut self.given_name,
            "additional_name" => &mut self.additional_name,
            "family_name" => &mut self.family_name,
            "organization" => &mut self.organization,
            "address_line1" => &mut self.address_line1,
            "address_line2" => &mut self.address_line2,
            "locality" => &mut self.locality,
            "dependent_locality" => &mut self.dependent_locality,
            "postal_code" => &mut self.postal_code,
            "sorting_code" => &mut self.sorting_code,
            "administrative_area" => &mut self.administrative_area,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Returns a copy with every empty-string part replaced by `None`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut normalized = Self::default();
        for name in Self::PARTS {
            let value = self
                .part(name)
                .filter(|v| !v.is_empty())
                .map(str::to_owned);
            normalized.set_part(name, value);
        }
        normalized
    }

    /// Compare two addresses, treating empty strings as absent values.
    ///
    /// ```
    /// use profile_select_core::Address;
    ///
    /// let a = Address { address_line1: Some(String::new()), locality: Some("X".into()), ..Default::default() };
    /// let b = Address { address_line1: None, locality: Some("X".into()), ..Default::default() };
    /// assert!(a.equivalent(&b));
    /// ```
    #[must_use]
    pub fn equivalent(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }

    /// Returns `true` when no part carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized() == Self::default()
    }

    /// Human readable lines for read-only display.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let normalized = self.normalized();
        let name = [
            normalized.given_name.as_deref(),
            normalized.additional_name.as_deref(),
            normalized.family_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
        let locality = [
            normalized.postal_code.as_deref(),
            normalized.locality.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

        [
            Some(name),
            normalized.organization,
            normalized.address_line1,
            normalized.address_line2,
            normalized.dependent_locality,
            Some(locality),
            normalized.administrative_area,
            normalized.country_code,
        ]
        .into_iter()
        .flatten()
        .filter(|line| !line.is_empty())
        .collect()
    }
}
