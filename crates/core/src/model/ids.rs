use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Every question carries exactly this many options.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("option index {0} is out of range 0..=3")]
pub struct OptionIndexError(pub i64);

/// Position of an option within a question, guaranteed to be `< OPTION_COUNT`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OptionIndex(u8);

impl OptionIndex {
    /// Creates an `OptionIndex`.
    ///
    /// # Errors
    ///
    /// Returns `OptionIndexError` if `index >= OPTION_COUNT`.
    pub fn new(index: usize) -> Result<Self, OptionIndexError> {
        match u8::try_from(index) {
            Ok(value) if index < OPTION_COUNT => Ok(Self(value)),
            _ => Err(OptionIndexError(i64::try_from(index).unwrap_or(i64::MAX))),
        }
    }

    /// Creates an `OptionIndex` from a signed value, as found in documents and
    /// model responses.
    ///
    /// # Errors
    ///
    /// Returns `OptionIndexError` if the value is negative or `>= OPTION_COUNT`.
    pub fn from_i64(value: i64) -> Result<Self, OptionIndexError> {
        usize::try_from(value)
            .ok()
            .and_then(|index| Self::new(index).ok())
            .ok_or(OptionIndexError(value))
    }

    /// Returns the underlying index.
    #[must_use]
    pub fn value(self) -> usize {
        usize::from(self.0)
    }

    /// Letter label used when presenting options (`A`..`D`).
    #[must_use]
    pub fn letter(self) -> char {
        char::from(b'A' + self.0)
    }

    /// All valid option indices in order.
    pub fn all() -> impl Iterator<Item = OptionIndex> {
        (0..OPTION_COUNT).filter_map(|index| Self::new(index).ok())
    }
}

impl TryFrom<u8> for OptionIndex {
    type Error = OptionIndexError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(usize::from(value))
    }
}

impl From<OptionIndex> for u8 {
    fn from(index: OptionIndex) -> Self {
        index.0
    }
}

impl fmt::Debug for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionIndex({})", self.0)
    }
}

impl fmt::Display for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a quiz session, used to correlate log lines.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random `SessionId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
