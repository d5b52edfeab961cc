use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::model::ids::OptionIndex;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Coarse lifecycle stage of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    Running,
    Submitted,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionPhase::NotStarted => "not-started",
            SessionPhase::Running => "running",
            SessionPhase::Submitted => "submitted",
        };
        f.write_str(label)
    }
}

//
// ─── ANSWERS ───────────────────────────────────────────────────────────────────
//

/// Selected option per question index. A missing key means the question is skipped so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerRecord(BTreeMap<usize, OptionIndex>);

impl AnswerRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, question: usize) -> Option<OptionIndex> {
        self.0.get(&question).copied()
    }

    #[must_use]
    pub fn is_answered(&self, question: usize) -> bool {
        self.0.contains_key(&question)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, OptionIndex)> + '_ {
        self.0.iter().map(|(question, option)| (*question, *option))
    }

    pub(crate) fn insert(&mut self, question: usize, option: OptionIndex) {
        self.0.insert(question, option);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<(usize, OptionIndex)> for AnswerRecord {
    fn from_iter<I: IntoIterator<Item = (usize, OptionIndex)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

//
// ─── TIME ──────────────────────────────────────────────────────────────────────
//

/// Seconds attributed to each question index. Values only grow until a reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeRecord(BTreeMap<usize, u64>);

impl TimeRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds spent on `question`; zero if it never held focus during a tick.
    #[must_use]
    pub fn get(&self, question: usize) -> u64 {
        self.0.get(&question).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_secs(&self) -> u64 {
        self.0.values().copied().fold(0, u64::saturating_add)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending question order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.0.iter().map(|(question, secs)| (*question, *secs))
    }

    pub(crate) fn add(&mut self, question: usize, secs: u64) {
        if secs == 0 {
            return;
        }
        let entry = self.0.entry(question).or_insert(0);
        *entry = entry.saturating_add(secs);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<(usize, u64)> for TimeRecord {
    fn from_iter<I: IntoIterator<Item = (usize, u64)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (question, secs) in iter {
            record.add(question, secs);
        }
        record
    }
}
