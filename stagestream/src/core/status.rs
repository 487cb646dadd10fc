//! Stage kind and exit enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of work a stage performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// A source walking a fixed sequence of values.
    Values,
    /// A source driving a collection cursor.
    Collection,
    /// A transform keeping elements that match a predicate.
    Filter,
    /// A transform applying a function to every element.
    Map,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Values => write!(f, "values"),
            Self::Collection => write!(f, "collection"),
            Self::Filter => write!(f, "filter"),
            Self::Map => write!(f, "map"),
        }
    }
}

/// Why a stage worker stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageExit {
    /// The upstream or source ran out of elements.
    Exhausted,
    /// The stage forwarded or originated an error.
    Failed,
    /// The cancellation signal was observed.
    Cancelled,
}

impl fmt::Display for StageExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "exhausted"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}
