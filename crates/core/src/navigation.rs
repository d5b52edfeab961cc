use thiserror::Error;

use crate::model::{OptionIndex, SessionPhase};
use crate::summary::Summary;

//
// ─── REJECTIONS ────────────────────────────────────────────────────────────────
//

/// Why a transition was refused. State is never modified when one is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Rejection {
    #[error("the quiz has not been started")]
    NotStarted,

    #[error("the quiz is already running")]
    AlreadyStarted,

    #[error("the quiz has already been submitted")]
    AlreadySubmitted,

    #[error("select an answer first")]
    NoAnswerSelected,

    #[error("question {index} does not exist (the set has {len})")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("option {index} does not exist")]
    OptionOutOfRange { index: usize },
}

//
// ─── ACTIONS ───────────────────────────────────────────────────────────────────
//

/// A user intent, dispatched through [`crate::QuizSession::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Start,
    SelectAnswer { question: usize, option: OptionIndex },
    Navigate(i64),
    Previous,
    SaveAndNext,
    Skip,
    Submit,
    Reset,
}

impl Action {
    /// Short stable name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::SelectAnswer { .. } => "select-answer",
            Action::Navigate(_) => "navigate",
            Action::Previous => "previous",
            Action::SaveAndNext => "save-and-next",
            Action::Skip => "skip",
            Action::Submit => "submit",
            Action::Reset => "reset",
        }
    }
}

/// What an accepted action did.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Started,
    Answered { question: usize, option: OptionIndex },
    Moved { index: usize },
    Submitted(Box<Summary>),
    Reset,
}

//
// ─── GUARDS ────────────────────────────────────────────────────────────────────
//

/// Phase precondition for `action`.
///
/// Content checks (question range, "has an answer") belong to the session,
/// which owns the data they read.
///
/// # Errors
///
/// Returns the `Rejection` matching the current phase.
pub fn guard(phase: SessionPhase, action: &Action) -> Result<(), Rejection> {
    use SessionPhase::{NotStarted, Running, Submitted};

    match (action, phase) {
        (Action::Reset, _) => Ok(()),

        (Action::Start, NotStarted) => Ok(()),
        (Action::Start, Running) => Err(Rejection::AlreadyStarted),
        (Action::Start, Submitted) => Err(Rejection::AlreadySubmitted),

        // Review navigation stays available after submission.
        (Action::Navigate(_) | Action::Previous, NotStarted) => Err(Rejection::NotStarted),
        (Action::Navigate(_) | Action::Previous, Running | Submitted) => Ok(()),

        (
            Action::SelectAnswer { .. } | Action::SaveAndNext | Action::Skip | Action::Submit,
            Running,
        ) => Ok(()),
        (
            Action::SelectAnswer { .. } | Action::SaveAndNext | Action::Skip | Action::Submit,
            NotStarted,
        ) => Err(Rejection::NotStarted),
        (
            Action::SelectAnswer { .. } | Action::SaveAndNext | Action::Skip | Action::Submit,
            Submitted,
        ) => Err(Rejection::AlreadySubmitted),
    }
}

/// Clamp a possibly negative or oversized target into `[0, len - 1]`.
#[must_use]
pub fn clamp_index(target: i64, len: usize) -> usize {
    let last = len.saturating_sub(1);
    if target <= 0 {
        return 0;
    }
    usize::try_from(target).map_or(last, |target| target.min(last))
}
