//! Error types for schedule generation.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors returned by normalization, allocation and projection.
///
/// Every variant is a caller error; the engine itself has no internal
/// failure modes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A scheduling parameter or the start date is malformed.
    #[error("{0}")]
    InvalidArgument(String),

    /// The topic input resolved to zero entries after normalization.
    #[error("{0}")]
    EmptyInput(String),
}

impl PlanError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// The machine-readable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::EmptyInput(_) => ErrorKind::EmptyInput,
        }
    }
}

/// Discriminant of a [`PlanError`], as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    EmptyInput,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidArgument => "invalid_argument",
            Self::EmptyInput => "empty_input",
        };
        f.write_str(s)
    }
}
