use std::fmt;

use thiserror::Error;

use crate::model::ids::{OPTION_COUNT, OptionIndex, OptionIndexError};
use crate::model::marking::MarkingScheme;

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Unchecked question data, as produced by an importer or written by hand.
///
/// The only way to obtain a [`Question`] is [`QuestionDraft::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: Option<i64>,
    pub marking: MarkingScheme,
}

impl QuestionDraft {
    /// Draft with the default marking scheme.
    pub fn new<S: Into<String>>(
        text: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        correct_answer: i64,
    ) -> Self {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct_answer: Some(correct_answer),
            marking: MarkingScheme::default(),
        }
    }

    #[must_use]
    pub fn with_marking(mut self, marking: MarkingScheme) -> Self {
        self.marking = marking;
        self
    }

    /// Validate the draft into an immutable question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text or an option is blank, the option
    /// count is not exactly four, or the correct answer is missing or out of range.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let text = self.text.trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let options: [String; OPTION_COUNT] = self
            .options
            .try_into()
            .map_err(|found: Vec<String>| QuestionError::WrongOptionCount(found.len()))?;
        if let Some(index) = options.iter().position(|opt| opt.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }

        let raw = self
            .correct_answer
            .ok_or(QuestionError::MissingCorrectAnswer)?;
        let correct_answer = OptionIndex::from_i64(raw)?;

        Ok(Question {
            text,
            options,
            correct_answer,
            marking: self.marking,
        })
    }
}

/// A validated multiple-choice question.
///
/// Outside this crate the correct answer is only revealed through a submitted
/// session; `Debug` leaves it out.
#[derive(Clone, PartialEq)]
pub struct Question {
    text: String,
    options: [String; OPTION_COUNT],
    correct_answer: OptionIndex,
    marking: MarkingScheme,
}

impl Question {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: OptionIndex) -> &str {
        &self.options[index.value()]
    }

    #[must_use]
    pub fn marking(&self) -> MarkingScheme {
        self.marking
    }

    pub(crate) fn correct_answer(&self) -> OptionIndex {
        self.correct_answer
    }

    pub(crate) fn is_correct(&self, answer: OptionIndex) -> bool {
        self.correct_answer == answer
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("text", &self.text)
            .field("options", &self.options)
            .field("marking", &self.marking)
            .finish_non_exhaustive()
    }
}

//
// ─── QUESTION VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs exactly 4 options (got {0})")]
    WrongOptionCount(usize),

    #[error("option {index} cannot be empty")]
    EmptyOption { index: usize },

    #[error("correct answer is missing")]
    MissingCorrectAnswer,

    #[error("invalid correct answer: {0}")]
    CorrectAnswerOutOfRange(#[from] OptionIndexError),
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
