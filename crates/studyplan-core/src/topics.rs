//! Topic input normalization.
//!
//! Callers may hand over topics either as a single comma-delimited string
//! (`"Lists, Tuples, Sets"`) or as an explicit list. Both shapes collapse to
//! the same ordered `Vec<String>` here, before any allocation happens:
//! - Delimited text is split on [`TOPIC_DELIMITER`].
//! - Every piece is trimmed of surrounding whitespace.
//! - Pieces that are empty after trimming are dropped.
//!
//! Order is preserved and duplicates are kept.

use serde_json::Value;

use crate::error::PlanError;

/// Separator used when topics arrive as a single string.
pub const TOPIC_DELIMITER: char = ',';

/// Raw topic input as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicsInput {
    /// One string holding delimiter-separated topics.
    Delimited(String),
    /// An explicit, already ordered list of topics.
    List(Vec<String>),
}

impl TopicsInput {
    /// Normalize into an ordered list of non-empty, trimmed topics.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            Self::Delimited(text) => split_delimited(text),
            Self::List(items) => items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Whether the caller supplied nothing at all (empty string or list),
    /// before any trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Delimited(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }
}

impl TryFrom<Value> for TopicsInput {
    type Error = PlanError;

    /// Accept a JSON string or a JSON array of strings; anything else is an
    /// unsupported shape.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(Self::Delimited(text)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    _ => Err(unsupported_shape()),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            _ => Err(unsupported_shape()),
        }
    }
}

impl From<&str> for TopicsInput {
    fn from(text: &str) -> Self {
        Self::Delimited(text.to_owned())
    }
}

fn unsupported_shape() -> PlanError {
    PlanError::invalid_argument("'topics' must be string or list")
}

/// Split delimited text into trimmed, non-empty topics.
pub fn split_delimited(text: &str) -> Vec<String> {
    text.split(TOPIC_DELIMITER)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_owned)
        .collect()
}
