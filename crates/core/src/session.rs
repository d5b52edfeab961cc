use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::model::{
    AnswerRecord, OptionIndex, Question, QuestionSet, SessionId, SessionPhase, TimeRecord,
};
use crate::navigation::{Action, Outcome, Rejection, clamp_index, guard};
use crate::score::{QuestionOutcome, ScoreBreakdown, outcome, score};
use crate::summary::Summary;
use crate::time::{Clock, Stopwatch};

//
// ─── VIEW TYPES ────────────────────────────────────────────────────────────────
//

/// Per-question marker for a navigation panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuestionStatus {
    Unanswered,
    Answered,
    Correct,
    Wrong,
    Skipped,
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// 1-based position of the focused question.
    pub position: usize,
    pub total: usize,
    /// `position / total` as a rounded percentage.
    pub percent: u8,
    pub answered: usize,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Single-user quiz session.
///
/// Owns the question set, the focused index, answers, per-question time and the
/// phase. Every mutation goes through a transition method (or [`QuizSession::apply`]),
/// each of which checks [`guard`] first and leaves the session untouched on rejection.
#[derive(Clone)]
pub struct QuizSession {
    id: SessionId,
    clock: Clock,
    questions: QuestionSet,
    phase: SessionPhase,
    current: usize,
    answers: AnswerRecord,
    time: TimeRecord,
    stopwatch: Stopwatch,
    started_at: Option<DateTime<Utc>>,
    summary: Option<Summary>,
}

impl QuizSession {
    #[must_use]
    pub fn new(questions: QuestionSet) -> Self {
        Self {
            id: SessionId::new(),
            clock: Clock::default_clock(),
            questions,
            phase: SessionPhase::NotStarted,
            current: 0,
            answers: AnswerRecord::new(),
            time: TimeRecord::new(),
            stopwatch: Stopwatch::new(),
            started_at: None,
            summary: None,
        }
    }

    /// Use `clock` for the start and submit timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    // ─── accessors ────────────────────────────────────────────────────────────

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current == self.questions.last_index()
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    #[must_use]
    pub fn time_record(&self) -> &TimeRecord {
        &self.time
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.stopwatch.elapsed_secs()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Results, available once the session is submitted.
    #[must_use]
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Fresh score breakdown; `None` until submitted.
    #[must_use]
    pub fn score(&self) -> Option<ScoreBreakdown> {
        (self.phase == SessionPhase::Submitted).then(|| score(&self.questions, &self.answers))
    }

    /// Correct option for `question`; `None` until submitted.
    #[must_use]
    pub fn revealed_answer(&self, question: usize) -> Option<OptionIndex> {
        if self.phase != SessionPhase::Submitted {
            return None;
        }
        self.questions.get(question).map(Question::correct_answer)
    }

    #[must_use]
    pub fn question_status(&self, question: usize) -> Option<QuestionStatus> {
        let q = self.questions.get(question)?;
        let answer = self.answers.get(question);
        let status = if self.phase == SessionPhase::Submitted {
            match outcome(q, answer) {
                QuestionOutcome::Correct => QuestionStatus::Correct,
                QuestionOutcome::Wrong => QuestionStatus::Wrong,
                QuestionOutcome::Skipped => QuestionStatus::Skipped,
            }
        } else if answer.is_some() {
            QuestionStatus::Answered
        } else {
            QuestionStatus::Unanswered
        };
        Some(status)
    }

    #[must_use]
    pub fn statuses(&self) -> Vec<QuestionStatus> {
        (0..self.question_count())
            .filter_map(|idx| self.question_status(idx))
            .collect()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        let total = self.question_count();
        let position = self.current + 1;
        let percent = (position * 100 + total / 2)
            .checked_div(total)
            .map_or(0, |pct| u8::try_from(pct.min(100)).unwrap_or(100));
        Progress {
            position,
            total,
            percent,
            answered: self.answers.len(),
        }
    }

    // ─── transitions ──────────────────────────────────────────────────────────

    /// Dispatch an [`Action`] to the matching transition.
    ///
    /// # Errors
    ///
    /// Returns the `Rejection` of the underlying transition.
    pub fn apply(&mut self, action: Action) -> Result<Outcome, Rejection> {
        match action {
            Action::Start => self.start().map(|()| Outcome::Started),
            Action::SelectAnswer { question, option } => self
                .select_answer(question, option)
                .map(|()| Outcome::Answered { question, option }),
            Action::Navigate(target) => self.navigate(target).map(|index| Outcome::Moved { index }),
            Action::Previous => self.previous().map(|index| Outcome::Moved { index }),
            Action::SaveAndNext => self.save_and_next().map(|index| Outcome::Moved { index }),
            Action::Skip => self.skip().map(|index| Outcome::Moved { index }),
            Action::Submit => self
                .submit()
                .map(|summary| Outcome::Submitted(Box::new(summary.clone()))),
            Action::Reset => {
                self.reset();
                Ok(Outcome::Reset)
            }
        }
    }

    /// # Errors
    ///
    /// `AlreadyStarted` while running, `AlreadySubmitted` after submit.
    pub fn start(&mut self) -> Result<(), Rejection> {
        guard(self.phase, &Action::Start)?;
        self.phase = SessionPhase::Running;
        self.stopwatch.start();
        self.started_at = Some(self.clock.now());
        Ok(())
    }

    /// Record (or overwrite) the answer for `question`.
    ///
    /// # Errors
    ///
    /// Phase rejections, or `QuestionOutOfRange` for an unknown question.
    pub fn select_answer(&mut self, question: usize, option: OptionIndex) -> Result<(), Rejection> {
        guard(self.phase, &Action::SelectAnswer { question, option })?;
        let len = self.question_count();
        if question >= len {
            return Err(Rejection::QuestionOutOfRange {
                index: question,
                len,
            });
        }
        self.answers.insert(question, option);
        Ok(())
    }

    /// Same as [`QuizSession::select_answer`] for an unchecked option index.
    ///
    /// # Errors
    ///
    /// `OptionOutOfRange` if `option >= 4`, otherwise as `select_answer`.
    pub fn select_answer_raw(&mut self, question: usize, option: usize) -> Result<(), Rejection> {
        let option =
            OptionIndex::new(option).map_err(|_| Rejection::OptionOutOfRange { index: option })?;
        self.select_answer(question, option)
    }

    /// Answer the focused question.
    ///
    /// # Errors
    ///
    /// As [`QuizSession::select_answer`].
    pub fn answer_current(&mut self, option: OptionIndex) -> Result<(), Rejection> {
        self.select_answer(self.current, option)
    }

    /// Jump to `target`, clamped into the set. Returns the new index.
    ///
    /// # Errors
    ///
    /// `NotStarted` before the session starts.
    pub fn navigate(&mut self, target: i64) -> Result<usize, Rejection> {
        guard(self.phase, &Action::Navigate(target))?;
        self.current = clamp_index(target, self.question_count());
        Ok(self.current)
    }

    /// # Errors
    ///
    /// `NotStarted` before the session starts.
    pub fn previous(&mut self) -> Result<usize, Rejection> {
        guard(self.phase, &Action::Previous)?;
        self.current = self.current.saturating_sub(1);
        Ok(self.current)
    }

    /// Advance only if the focused question has an answer.
    ///
    /// # Errors
    ///
    /// Phase rejections, or `NoAnswerSelected` (the index does not move).
    pub fn save_and_next(&mut self) -> Result<usize, Rejection> {
        guard(self.phase, &Action::SaveAndNext)?;
        if !self.answers.is_answered(self.current) {
            return Err(Rejection::NoAnswerSelected);
        }
        Ok(self.advance_focus())
    }

    /// Advance regardless of whether the focused question is answered.
    ///
    /// # Errors
    ///
    /// Phase rejections.
    pub fn skip(&mut self) -> Result<usize, Rejection> {
        guard(self.phase, &Action::Skip)?;
        Ok(self.advance_focus())
    }

    /// Freeze answers and time, build the summary and stop the stopwatch.
    ///
    /// # Errors
    ///
    /// `NotStarted` before start, `AlreadySubmitted` on a second submit.
    pub fn submit(&mut self) -> Result<&Summary, Rejection> {
        guard(self.phase, &Action::Submit)?;
        self.stopwatch.stop();
        let submitted_at = self.clock.now();
        let summary = Summary::build(
            &self.questions,
            &self.answers,
            &self.time,
            self.stopwatch.elapsed_secs(),
            self.started_at.unwrap_or(submitted_at),
            submitted_at,
        );
        self.phase = SessionPhase::Submitted;
        Ok(self.summary.insert(summary))
    }

    /// Back to `NotStarted` from any phase. The question set is kept.
    pub fn reset(&mut self) {
        self.answers.clear();
        self.time.clear();
        self.stopwatch.reset();
        self.current = 0;
        self.started_at = None;
        self.summary = None;
        self.phase = SessionPhase::NotStarted;
    }

    /// Swap the question set.
    ///
    /// # Errors
    ///
    /// `AlreadyStarted` / `AlreadySubmitted` unless the session is `NotStarted`.
    pub fn replace_questions(&mut self, questions: QuestionSet) -> Result<(), Rejection> {
        match self.phase {
            SessionPhase::NotStarted => {
                self.questions = questions;
                self.current = 0;
                Ok(())
            }
            SessionPhase::Running => Err(Rejection::AlreadyStarted),
            SessionPhase::Submitted => Err(Rejection::AlreadySubmitted),
        }
    }

    // ─── clock ────────────────────────────────────────────────────────────────

    /// One clock tick: one second for the focused question.
    ///
    /// Returns `false` (and changes nothing) unless the session is running.
    pub fn tick(&mut self) -> bool {
        self.advance(1)
    }

    /// Attribute `secs` seconds to the focused question.
    pub fn advance(&mut self, secs: u64) -> bool {
        if self.phase != SessionPhase::Running || !self.stopwatch.advance(secs) {
            return false;
        }
        self.time.add(self.current, secs);
        true
    }

    fn advance_focus(&mut self) -> usize {
        self.current = (self.current + 1).min(self.questions.last_index());
        self.current
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("elapsed_secs", &self.stopwatch.elapsed_secs())
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
