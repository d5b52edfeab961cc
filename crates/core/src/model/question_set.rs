use thiserror::Error;

use crate::error::Error;
use crate::model::question::{Question, QuestionDraft};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("a question set needs at least one question")]
    Empty,
}

/// Title of [`QuestionSet::sample`].
pub const SAMPLE_TITLE: &str = "Sample quiz";

/// Ordered, non-empty list of questions with an optional test name.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSet {
    title: Option<String>,
    questions: Vec<Question>,
}

impl QuestionSet {
    /// # Errors
    ///
    /// Returns `QuestionSetError::Empty` if `questions` is empty.
    pub fn new(title: Option<String>, questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        Ok(Self {
            title: normalize_title(title),
            questions,
        })
    }

    /// Validate every draft and build the set. Question numbers in errors are 1-based.
    ///
    /// # Errors
    ///
    /// Returns `Error::Question` for the first invalid draft, or
    /// `Error::QuestionSet` if there are no drafts.
    pub fn from_drafts(
        title: Option<String>,
        drafts: impl IntoIterator<Item = QuestionDraft>,
    ) -> Result<Self, Error> {
        let questions = drafts
            .into_iter()
            .enumerate()
            .map(|(idx, draft)| {
                draft.validate().map_err(|source| Error::Question {
                    number: idx + 1,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(title, questions)?)
    }

    /// Built-in three-question set used when nothing has been imported.
    ///
    /// # Errors
    ///
    /// Returns `Error` only if the built-in drafts fail validation.
    pub fn sample() -> Result<Self, Error> {
        Self::from_drafts(
            Some(SAMPLE_TITLE.to_string()),
            [
                QuestionDraft::new(
                    "What is the capital of France?",
                    ["London", "Berlin", "Paris", "Madrid"],
                    2,
                ),
                QuestionDraft::new(
                    "Which planet is known as the Red Planet?",
                    ["Venus", "Mars", "Jupiter", "Saturn"],
                    1,
                ),
                QuestionDraft::new("What is 2 + 2?", ["3", "4", "5", "6"], 1),
            ],
        )
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false` for a constructed set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

fn normalize_title(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::QuestionError;

    fn draft(text: &str, correct: i64) -> QuestionDraft {
        QuestionDraft::new(text, ["a", "b", "c", "d"], correct)
    }

    #[test]
    fn empty_set_is_rejected() {
        assert_eq!(
            QuestionSet::new(None, Vec::new()).unwrap_err(),
            QuestionSetError::Empty
        );
        assert!(matches!(
            QuestionSet::from_drafts(None, Vec::new()).unwrap_err(),
            Error::QuestionSet(QuestionSetError::Empty)
        ));
    }

    #[test]
    fn from_drafts_reports_question_number() {
        let err = QuestionSet::from_drafts(None, vec![draft("one", 0), draft("", 1)]).unwrap_err();
        match err {
            Error::Question { number, source } => {
                assert_eq!(number, 2);
                assert_eq!(source, QuestionError::EmptyText);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn sample_set_has_three_questions() {
        let set = QuestionSet::sample().unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.title(), Some(SAMPLE_TITLE));

        let keys: Vec<usize> = set.iter().map(|q| q.correct_answer().value()).collect();
        assert_eq!(keys, vec![2, 1, 1]);
        assert_eq!(set.get(1).unwrap().options()[1], "Mars");
    }

    #[test]
    fn title_is_normalized() {
        let set = QuestionSet::from_drafts(Some("  ".into()), vec![draft("one", 0)]).unwrap();
        assert_eq!(set.title(), None);

        let set =
            QuestionSet::from_drafts(Some(" Geography ".into()), vec![draft("one", 0)]).unwrap();
        assert_eq!(set.title(), Some("Geography"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.last_index(), 0);
    }
}
