use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{AnswerRecord, QuestionSet, TimeRecord};
use crate::score::{QuestionOutcome, ScoreBreakdown, outcome, score};

/// Time spent on one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionTiming {
    pub index: usize,
    pub secs: u64,
}

/// Frozen results of a submitted session.
///
/// Built once on submit. Every derived figure (average, fastest, slowest,
/// accuracy) is computed from the frozen fields on each call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    title: Option<String>,
    breakdown: ScoreBreakdown,
    outcomes: Vec<QuestionOutcome>,
    time: TimeRecord,
    total_elapsed_secs: u64,
    started_at: DateTime<Utc>,
    submitted_at: DateTime<Utc>,
}

impl Summary {
    pub(crate) fn build(
        questions: &QuestionSet,
        answers: &AnswerRecord,
        time: &TimeRecord,
        total_elapsed_secs: u64,
        started_at: DateTime<Utc>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let outcomes = questions
            .iter()
            .enumerate()
            .map(|(idx, question)| outcome(question, answers.get(idx)))
            .collect();

        Self {
            title: questions.title().map(str::to_owned),
            breakdown: score(questions, answers),
            outcomes,
            time: time.clone(),
            total_elapsed_secs,
            started_at,
            submitted_at,
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn breakdown(&self) -> &ScoreBreakdown {
        &self.breakdown
    }

    /// Outcome per question, in question order.
    #[must_use]
    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn time_record(&self) -> &TimeRecord {
        &self.time
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn total_elapsed_secs(&self) -> u64 {
        self.total_elapsed_secs
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Average seconds per question, truncated. Zero for an empty set.
    #[must_use]
    pub fn average_secs(&self) -> u64 {
        u64::try_from(self.question_count())
            .ok()
            .and_then(|count| self.total_elapsed_secs.checked_div(count))
            .unwrap_or(0)
    }

    /// Question with the least recorded time; ties go to the lowest index.
    ///
    /// Only questions that received at least one tick are considered.
    #[must_use]
    pub fn fastest(&self) -> Option<QuestionTiming> {
        self.timings()
            .min_by(|a, b| a.secs.cmp(&b.secs).then(a.index.cmp(&b.index)))
    }

    /// Question with the most recorded time; ties go to the lowest index.
    #[must_use]
    pub fn slowest(&self) -> Option<QuestionTiming> {
        self.timings()
            .max_by(|a, b| a.secs.cmp(&b.secs).then(b.index.cmp(&a.index)))
    }

    /// Fraction of questions answered correctly, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f64 {
        let count = self.question_count();
        if count == 0 {
            return 0.0;
        }
        self.breakdown.correct_count as f64 / count as f64
    }

    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        self.accuracy() * 100.0
    }

    fn timings(&self) -> impl Iterator<Item = QuestionTiming> + '_ {
        let count = self.question_count();
        self.time
            .iter()
            .filter(move |(index, _)| *index < count)
            .map(|(index, secs)| QuestionTiming { index, secs })
    }
}

/// Format seconds as `MM:SS`; minutes are not wrapped at one hour.
#[must_use]
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OptionIndex, QuestionDraft};
    use crate::time::fixed_now;

    fn three_questions() -> QuestionSet {
        QuestionSet::from_drafts(
            Some("General knowledge".into()),
            (0..3).map(|i| QuestionDraft::new(format!("Q{i}"), ["A", "B", "C", "D"], 0)),
        )
        .unwrap()
    }

    fn build(answers: &AnswerRecord, time: &TimeRecord) -> Summary {
        Summary::build(
            &three_questions(),
            answers,
            time,
            time.total_secs(),
            fixed_now(),
            fixed_now(),
        )
    }

    #[test]
    fn empty_answers_give_zero_accuracy() {
        let summary = build(&AnswerRecord::new(), &TimeRecord::new());
        assert_eq!(summary.breakdown().skipped_count, 3);
        assert_eq!(summary.breakdown().total_score, 0.0);
        assert_eq!(summary.accuracy(), 0.0);
        assert_eq!(summary.fastest(), None);
        assert_eq!(summary.slowest(), None);
        assert_eq!(summary.average_secs(), 0);
        assert_eq!(summary.title(), Some("General knowledge"));
    }

    #[test]
    fn fastest_and_slowest_break_ties_by_index() {
        let time: TimeRecord = [(0, 5), (1, 2), (2, 5)].into_iter().collect();
        let summary = build(&AnswerRecord::new(), &time);

        assert_eq!(summary.fastest(), Some(QuestionTiming { index: 1, secs: 2 }));
        assert_eq!(summary.slowest(), Some(QuestionTiming { index: 0, secs: 5 }));

        let time: TimeRecord = [(0, 4), (2, 4)].into_iter().collect();
        let summary = build(&AnswerRecord::new(), &time);
        assert_eq!(summary.fastest(), Some(QuestionTiming { index: 0, secs: 4 }));
        assert_eq!(summary.slowest(), Some(QuestionTiming { index: 0, secs: 4 }));
    }

    #[test]
    fn average_truncates_and_accuracy_counts_correct() {
        let time: TimeRecord = [(0, 4), (1, 4), (2, 3)].into_iter().collect();
        let answers: AnswerRecord = [
            (0, OptionIndex::new(0).unwrap()),
            (1, OptionIndex::new(2).unwrap()),
        ]
        .into_iter()
        .collect();
        let summary = build(&answers, &time);

        assert_eq!(summary.total_elapsed_secs(), 11);
        assert_eq!(summary.average_secs(), 3);
        assert!((summary.accuracy() - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            summary.outcomes(),
            &[
                QuestionOutcome::Correct,
                QuestionOutcome::Wrong,
                QuestionOutcome::Skipped
            ]
        );
    }

    #[test]
    fn clock_format_pads_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(75), "01:15");
        assert_eq!(format_clock(3_725), "62:05");
    }
}
