use thiserror::Error;

use crate::model::{MarkingError, QuestionError, QuestionSetError};

/// Errors raised while building quiz data from untrusted input.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("question {number}: {source}")]
    Question {
        /// 1-based position of the offending question.
        number: usize,
        #[source]
        source: QuestionError,
    },

    #[error(transparent)]
    QuestionSet(#[from] QuestionSetError),

    #[error(transparent)]
    Marking(#[from] MarkingError),
}
