//! Macro for defining strongly-typed SQL identifier newtypes.
//!
//! Table and column names share the same invariant (a plain, unquoted SQL
//! identifier: ASCII letter or underscore, then letters, digits, or
//! underscores) and the same set of trait impls. This macro generates all of
//! that from a single invocation.

/// Return the reason `name` is not a plain SQL identifier, if any.
pub(crate) fn identifier_error(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    match chars.next() {
        None => Some("must not be empty"),
        Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
            Some("must start with an ASCII letter or underscore")
        }
        Some(_) if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') => {
            Some("must contain only ASCII letters, digits, and underscores")
        }
        Some(_) => None,
    }
}

/// Define a strongly-typed SQL identifier newtype.
///
/// Generates:
/// - The struct with `Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize`
/// - Custom `Deserialize` (rejects non-identifiers)
/// - `new()` (panics on invalid), `try_new()` (returns Result), `as_str()`,
///   `into_inner()`, `matches()` (case-insensitive comparison)
/// - `Display`, `AsRef<str>`, `Deref<Target=str>`, `Borrow<str>`
/// - `TryFrom<String>`, `TryFrom<&str>`
/// - `PartialEq<str>`, `PartialEq<&str>`, `PartialEq<String>`
macro_rules! define_identifier {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::try_new(s).map_err(serde::de::Error::custom)
            }
        }

        impl $Name {
            /// Create a new instance, panicking if the name is not a plain identifier.
            ///
            /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
            pub fn new(name: impl Into<String>) -> Self {
                match Self::try_new(name) {
                    Ok(v) => v,
                    Err(e) => panic!("{e}"),
                }
            }

            /// Try to create a new instance, rejecting anything that is not a
            /// plain SQL identifier.
            pub fn try_new(name: impl Into<String>) -> $crate::error::CoreResult<Self> {
                let s = name.into();
                match $crate::newtype_string::identifier_error(&s) {
                    Some(reason) => Err($crate::error::CoreError::InvalidIdentifier {
                        name: s,
                        reason: format!(concat!(stringify!($Name), " {}"), reason),
                    }),
                    None => Ok(Self(s)),
                }
            }

            /// Return the underlying name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Compare against a live database name. Unquoted identifiers are
            /// case-insensitive, so `Code` and `code` name the same column.
            pub fn matches(&self, other: &str) -> bool {
                self.0.eq_ignore_ascii_case(other)
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str { &self.0 }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str { &self.0 }
        }

        impl TryFrom<String> for $Name {
            type Error = $crate::error::CoreError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::try_new(s)
            }
        }

        impl TryFrom<&str> for $Name {
            type Error = $crate::error::CoreError;
            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::try_new(s)
            }
        }

        impl PartialEq<str> for $Name {
            fn eq(&self, other: &str) -> bool { self.0 == other }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool { self.0 == *other }
        }

        impl PartialEq<String> for $Name {
            fn eq(&self, other: &String) -> bool { self.0 == *other }
        }
    };
}

pub(crate) use define_identifier;
