//! Domain primitives shared by the catalog client, the trending stores and the
//! search controller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a movie in the external catalog.
///
/// Wraps the catalog's numeric id so it cannot be confused with the document
/// ids assigned by a trending store.
///
/// # Examples
///
/// ```rust
/// use reelscout::domain::MovieId;
///
/// let id = MovieId::new(438631);
/// assert_eq!(id.value(), 438631);
/// assert_eq!(id.to_string(), "438631");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MovieId(u64);

impl MovieId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MovieId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<MovieId> for u64 {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl Serialize for MovieId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = u64::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Where a query currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    #[default]
    Idle,
    Debouncing,
    Fetching,
    Succeeded,
    Failed,
}

impl SearchPhase {
    /// True once a fetch has finished, whatever the outcome.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}
