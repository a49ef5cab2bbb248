//! Local identifiers of serialized objects.
//!
//! Every block in a scene or prefab document carries a file-local identifier
//! in its header (`--- !u!1 &100` has the identifier `100`). The same value is
//! used by other blocks to reference the object (`{fileID: 100}`).

use std::{fmt, num::ParseIntError, str::FromStr};

use thiserror::Error;

/// Error returned when a string is not a valid [`LocalId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid local identifier `{input}`: {source}")]
pub struct InvalidLocalId {
    input: String,
    #[source]
    source: ParseIntError,
}

/// File-local identifier of a serialized object.
///
/// Identifiers are signed 64-bit integers; the value `0` is the null
/// reference and never names a real object.
///
/// # Examples
///
/// ```
/// use scrub_core::identifier::LocalId;
///
/// let id: LocalId = "114000011".parse().unwrap();
/// assert_eq!(id, LocalId::new(114000011));
/// assert_eq!(id.to_string(), "114000011");
/// assert!(LocalId::NULL.is_null());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalId(i64);

impl LocalId {
    /// The null reference (`{fileID: 0}`).
    pub const NULL: LocalId = LocalId(0);

    /// Creates a new identifier from its numeric value.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns `true` for the null reference.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for LocalId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for LocalId {
    type Err = InvalidLocalId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|source| InvalidLocalId {
                input: s.to_string(),
                source,
            })
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
