#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod navigation;
pub mod score;
pub mod session;
pub mod summary;
pub mod time;

pub use error::Error;
pub use model::*;
pub use navigation::{Action, Outcome, Rejection, clamp_index, guard};
pub use score::{QuestionOutcome, ScoreBreakdown, outcome, score};
pub use session::{Progress, QuestionStatus, QuizSession};
pub use summary::{QuestionTiming, Summary, format_clock};
pub use time::Clock;
