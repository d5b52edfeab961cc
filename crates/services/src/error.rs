//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use quiz_core::Rejection;
use quiz_core::model::MarkingError;

/// Errors emitted by `QuestionImporter`. An import either yields a full
/// question set or one of these; nothing is partially accepted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error("import document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("question {number}: option keys must be \"0\"..\"n-1\" (got {keys:?})")]
    OptionKeys { number: usize, keys: Vec<String> },
    #[error("question {number}: {source}")]
    Marking {
        number: usize,
        #[source]
        source: MarkingError,
    },
    #[error("question {number}: the correct answer could not be resolved")]
    Unresolved { number: usize },
    #[error(transparent)]
    Invalid(#[from] quiz_core::Error),
}

impl ImportError {
    /// 1-based question number the error refers to, if any.
    #[must_use]
    pub fn question_number(&self) -> Option<usize> {
        match self {
            Self::OptionKeys { number, .. }
            | Self::Marking { number, .. }
            | Self::Unresolved { number } => Some(*number),
            Self::Invalid(quiz_core::Error::Question { number, .. }) => Some(*number),
            _ => None,
        }
    }
}

/// Errors raised inside `HttpAnswerKeyResolver`. The public resolver API
/// degrades them to `None` after logging.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolverError {
    #[error("answer key request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("generated text {0:?} does not start with a number")]
    Unparsable(String),
    #[error("generated index {0} is out of range 0..=3")]
    OutOfRange(i64),
}

/// Errors emitted by `SessionDriver`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("session driver has stopped")]
    DriverClosed,
}

/// A configuration value that could not be used. Reported through logs; the
/// affected setting falls back to its default.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{key}={value:?} is not a valid value")]
    InvalidValue { key: &'static str, value: String },
    #[error("{key}={value:?} is not a valid URL: {source}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Marking(#[from] MarkingError),
}
