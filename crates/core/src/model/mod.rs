mod ids;
mod marking;
mod question;
mod question_set;
mod records;

pub use ids::{OPTION_COUNT, OptionIndex, OptionIndexError, SessionId};
pub use marking::{DEFAULT_NEGATIVE_MARKS, DEFAULT_POSITIVE_MARKS, MarkingError, MarkingScheme};
pub use question::{Question, QuestionDraft, QuestionError};
pub use question_set::{QuestionSet, QuestionSetError, SAMPLE_TITLE};
pub use records::{AnswerRecord, SessionPhase, TimeRecord};
