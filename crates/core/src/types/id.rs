//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
/// - `FromStr` for ids submitted as form values
///
/// # Example
///
/// ```rust
/// # use profile_select_core::define_id;
/// define_id!(UserId);
/// define_id!(ProfileId);
///
/// let user_id = UserId::new(1);
/// let profile_id = ProfileId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: UserId = profile_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i32>().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(ProfileId);

impl UserId {
    /// The anonymous user. Anonymous owners never have saved profiles.
    pub const ANONYMOUS: Self = Self(0);

    /// Returns `true` for the anonymous user id (0).
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_user() {
        assert!(UserId::ANONYMOUS.is_anonymous());
        assert!(UserId::new(0).is_anonymous());
        assert!(!UserId::new(7).is_anonymous());
    }

    #[test]
    fn test_parse_profile_id() {
        let id: ProfileId = "42".parse().unwrap();
        assert_eq!(id, ProfileId::new(42));
        assert!("_new".parse::<ProfileId>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&ProfileId::new(3)).unwrap();
        assert_eq!(json, "3");
    }
}
