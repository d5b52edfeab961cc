use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marks awarded for a correct answer unless configured otherwise.
pub const DEFAULT_POSITIVE_MARKS: f64 = 2.0;

/// Marks added (a penalty) for a wrong answer unless configured otherwise.
pub const DEFAULT_NEGATIVE_MARKS: f64 = -0.66;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum MarkingError {
    #[error("positive marks must be a finite number > 0 (got {0})")]
    InvalidPositiveMarks(f64),

    #[error("negative marks must be a finite number <= 0 (got {0})")]
    InvalidNegativeMarks(f64),
}

//
// ─── MARKING SCHEME ────────────────────────────────────────────────────────────
//

/// Per-question marking: what a correct answer earns and what a wrong one costs.
///
/// Skipped questions always contribute zero. `negative_marks` is stored signed,
/// so the scorer simply adds it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkingScheme {
    positive_marks: f64,
    negative_marks: f64,
}

impl MarkingScheme {
    /// Creates a custom marking scheme.
    ///
    /// # Errors
    ///
    /// Returns `MarkingError` if either value is not finite, if `positive_marks`
    /// is not strictly positive, or if `negative_marks` is above zero.
    pub fn new(positive_marks: f64, negative_marks: f64) -> Result<Self, MarkingError> {
        if !positive_marks.is_finite() || positive_marks <= 0.0 {
            return Err(MarkingError::InvalidPositiveMarks(positive_marks));
        }
        if !negative_marks.is_finite() || negative_marks > 0.0 {
            return Err(MarkingError::InvalidNegativeMarks(negative_marks));
        }
        Ok(Self {
            positive_marks,
            negative_marks,
        })
    }

    /// Scheme without a penalty for wrong answers.
    #[must_use]
    pub fn without_penalty(positive_marks: f64) -> Option<Self> {
        Self::new(positive_marks, 0.0).ok()
    }

    #[must_use]
    pub fn positive_marks(&self) -> f64 {
        self.positive_marks
    }

    #[must_use]
    pub fn negative_marks(&self) -> f64 {
        self.negative_marks
    }

    /// Returns a copy with some values overridden.
    ///
    /// # Errors
    ///
    /// Same as [`MarkingScheme::new`].
    pub fn with_overrides(
        self,
        positive_marks: Option<f64>,
        negative_marks: Option<f64>,
    ) -> Result<Self, MarkingError> {
        Self::new(
            positive_marks.unwrap_or(self.positive_marks),
            negative_marks.unwrap_or(self.negative_marks),
        )
    }
}

impl Default for MarkingScheme {
    fn default() -> Self {
        Self {
            positive_marks: DEFAULT_POSITIVE_MARKS,
            negative_marks: DEFAULT_NEGATIVE_MARKS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scheme_uses_exam_convention() {
        let scheme = MarkingScheme::default();
        assert_eq!(scheme.positive_marks(), 2.0);
        assert_eq!(scheme.negative_marks(), -0.66);
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(
            MarkingScheme::new(0.0, -1.0),
            Err(MarkingError::InvalidPositiveMarks(0.0))
        );
        assert_eq!(
            MarkingScheme::new(1.0, 0.5),
            Err(MarkingError::InvalidNegativeMarks(0.5))
        );
        assert!(MarkingScheme::new(f64::NAN, 0.0).is_err());
        assert!(MarkingScheme::new(1.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn overrides_keep_unset_values() {
        let scheme = MarkingScheme::default()
            .with_overrides(Some(4.0), None)
            .unwrap();
        assert_eq!(scheme.positive_marks(), 4.0);
        assert_eq!(scheme.negative_marks(), DEFAULT_NEGATIVE_MARKS);

        let plain = MarkingScheme::without_penalty(1.0).unwrap();
        assert_eq!(plain.negative_marks(), 0.0);
    }
}
