//! Station and line identifiers.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::DomainError;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Parse an identifier, trimming surrounding whitespace.
            ///
            /// Empty (or all-whitespace) input is rejected.
            pub fn parse(s: &str) -> Result<Self, DomainError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::EmptyId($kind));
                }
                Ok(Self(Arc::from(trimmed)))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of one line-specific station node.
    ///
    /// Cloning is cheap (reference counted), so search paths can hold
    /// owned ids without copying string data.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_planner::domain::StationId;
    ///
    /// let id = StationId::parse(" 0222 ").unwrap();
    /// assert_eq!(id.as_str(), "0222");
    /// assert!(StationId::parse("   ").is_err());
    /// ```
    StationId,
    "station"
);

define_id!(
    /// Identifier of a line (e.g. "2" or "Shinbundang").
    LineId,
    "line"
);
