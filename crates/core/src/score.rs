use serde::Serialize;

use crate::model::{AnswerRecord, OptionIndex, Question, QuestionSet};

/// Result of scoring one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QuestionOutcome {
    Correct,
    Wrong,
    Skipped,
}

/// Aggregate score for a question set.
///
/// `total_score` is the exact sum of marks; use [`ScoreBreakdown::display_total`]
/// for the two-decimal presentation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreBreakdown {
    pub total_score: f64,
    pub correct_count: usize,
    pub wrong_count: usize,
    pub skipped_count: usize,
}

impl ScoreBreakdown {
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.correct_count + self.wrong_count + self.skipped_count
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.correct_count + self.wrong_count
    }

    #[must_use]
    pub fn display_total(&self) -> String {
        format!("{:.2}", self.total_score)
    }
}

/// Classify a single answer against its question.
#[must_use]
pub fn outcome(question: &Question, answer: Option<OptionIndex>) -> QuestionOutcome {
    match answer {
        None => QuestionOutcome::Skipped,
        Some(answer) if question.is_correct(answer) => QuestionOutcome::Correct,
        Some(_) => QuestionOutcome::Wrong,
    }
}

/// Score `answers` against `questions`.
///
/// Answers for indices outside the set are ignored, so the three counts always
/// add up to `questions.len()`.
#[must_use]
pub fn score(questions: &QuestionSet, answers: &AnswerRecord) -> ScoreBreakdown {
    questions
        .iter()
        .enumerate()
        .fold(ScoreBreakdown::default(), |mut acc, (idx, question)| {
            let marking = question.marking();
            match outcome(question, answers.get(idx)) {
                QuestionOutcome::Skipped => acc.skipped_count += 1,
                QuestionOutcome::Correct => {
                    acc.correct_count += 1;
                    acc.total_score += marking.positive_marks();
                }
                QuestionOutcome::Wrong => {
                    acc.wrong_count += 1;
                    acc.total_score += marking.negative_marks();
                }
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MarkingScheme, QuestionDraft};

    fn set(correct: &[i64]) -> QuestionSet {
        QuestionSet::from_drafts(
            None,
            correct
                .iter()
                .enumerate()
                .map(|(idx, c)| QuestionDraft::new(format!("Q{idx}"), ["A", "B", "C", "D"], *c)),
        )
        .unwrap()
    }

    fn answers(pairs: &[(usize, usize)]) -> AnswerRecord {
        pairs
            .iter()
            .map(|(q, o)| (*q, OptionIndex::new(*o).unwrap()))
            .collect()
    }

    #[test]
    fn one_right_one_wrong() {
        let questions = set(&[2, 1]);
        let breakdown = score(&questions, &answers(&[(0, 2), (1, 0)]));

        assert_eq!(breakdown.correct_count, 1);
        assert_eq!(breakdown.wrong_count, 1);
        assert_eq!(breakdown.skipped_count, 0);
        assert!((breakdown.total_score - 1.34).abs() < 1e-9);
        assert_eq!(breakdown.display_total(), "1.34");
    }

    #[test]
    fn no_answers_means_all_skipped() {
        let questions = set(&[0, 1, 2]);
        let breakdown = score(&questions, &AnswerRecord::new());

        assert_eq!(breakdown.skipped_count, 3);
        assert_eq!(breakdown.total_score, 0.0);
        assert_eq!(breakdown.answered_count(), 0);
    }

    #[test]
    fn counts_always_cover_the_set() {
        let questions = set(&[0, 1, 2, 3]);
        let records = [
            answers(&[]),
            answers(&[(0, 0)]),
            answers(&[(0, 1), (1, 1), (3, 3)]),
            answers(&[(0, 0), (1, 1), (2, 2), (3, 3), (9, 0)]),
        ];
        for record in &records {
            assert_eq!(score(&questions, record).question_count(), questions.len());
        }
    }

    #[test]
    fn scoring_is_repeatable() {
        let questions = set(&[3, 0, 1]);
        let record = answers(&[(0, 3), (2, 2)]);
        let first = score(&questions, &record);
        let second = score(&questions, &record);
        assert_eq!(first, second);
    }

    #[test]
    fn per_question_marking_is_used() {
        let strict = MarkingScheme::new(4.0, -1.0).unwrap();
        let questions = QuestionSet::from_drafts(
            None,
            vec![
                QuestionDraft::new("Q0", ["A", "B", "C", "D"], 0).with_marking(strict),
                QuestionDraft::new("Q1", ["A", "B", "C", "D"], 0).with_marking(strict),
            ],
        )
        .unwrap();
        let breakdown = score(&questions, &answers(&[(0, 0), (1, 3)]));
        assert_eq!(breakdown.total_score, 3.0);
    }
}
