use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use quiz_core::model::{
    MarkingScheme, OPTION_COUNT, OptionIndex, QuestionDraft, QuestionSet, QuestionSetError,
};

use crate::error::ImportError;
use crate::resolver::AnswerKeyResolver;

//
// ─── DOCUMENT ──────────────────────────────────────────────────────────────────
//

/// A question-set document as it arrives over the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportDocument {
    #[serde(default)]
    pub test_name: Option<String>,
    pub questions: Vec<ImportedQuestion>,
}

/// One question of an [`ImportDocument`]. Options are keyed by the
/// importer's option keys, `"0"`..`"3"` unless configured otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImportedQuestion {
    pub question: String,
    pub options: HashMap<String, String>,
    #[serde(default)]
    pub correct_answer: Option<i64>,
    #[serde(default)]
    pub positive_marks: Option<f64>,
    #[serde(default)]
    pub negative_marks: Option<f64>,
}

impl ImportDocument {
    /// # Errors
    ///
    /// Returns `ImportError::Parse` for malformed JSON or a wrong shape.
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(json)?)
    }
}

//
// ─── IMPORTER ──────────────────────────────────────────────────────────────────
//

/// Resolver requests allowed in flight at once during one import.
pub const DEFAULT_RESOLVE_CONCURRENCY: usize = 4;

/// Turns import documents into validated question sets. All-or-nothing.
#[derive(Clone, Debug)]
pub struct QuestionImporter {
    default_marking: MarkingScheme,
    option_keys: [String; OPTION_COUNT],
    resolve_concurrency: usize,
}

impl Default for QuestionImporter {
    fn default() -> Self {
        Self::new(MarkingScheme::default())
    }
}

impl QuestionImporter {
    #[must_use]
    pub fn new(default_marking: MarkingScheme) -> Self {
        Self {
            default_marking,
            option_keys: ["0", "1", "2", "3"].map(String::from),
            resolve_concurrency: DEFAULT_RESOLVE_CONCURRENCY,
        }
    }

    /// Option keys in display order, `"0"`..`"3"` by default.
    ///
    /// A document option whose key is not listed here rejects the import.
    #[must_use]
    pub fn with_option_keys<S: Into<String>>(mut self, keys: [S; OPTION_COUNT]) -> Self {
        self.option_keys = keys.map(Into::into);
        self
    }

    /// Cap on concurrent resolver requests; at least one.
    #[must_use]
    pub fn with_resolve_concurrency(mut self, limit: usize) -> Self {
        self.resolve_concurrency = limit.max(1);
        self
    }

    #[must_use]
    pub fn default_marking(&self) -> MarkingScheme {
        self.default_marking
    }

    #[must_use]
    pub fn option_keys(&self) -> &[String; OPTION_COUNT] {
        &self.option_keys
    }

    /// # Errors
    ///
    /// See [`QuestionImporter::import_document`]; also `ImportError::Parse`.
    pub fn import_str(&self, json: &str) -> Result<QuestionSet, ImportError> {
        self.import_document(ImportDocument::from_json(json)?)
    }

    /// # Errors
    ///
    /// `ImportError::Read` if the file cannot be read, otherwise as
    /// [`QuestionImporter::import_str`].
    pub async fn import_file(&self, path: impl AsRef<Path>) -> Result<QuestionSet, ImportError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ImportError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        self.import_str(&json)
    }

    /// Validate a document whose answer keys are all present.
    ///
    /// # Errors
    ///
    /// Returns `ImportError` for bad option keys, invalid marks, an invalid
    /// question (including a missing or out-of-range correct answer) or an
    /// empty question list.
    pub fn import_document(&self, document: ImportDocument) -> Result<QuestionSet, ImportError> {
        let ImportDocument {
            test_name,
            questions,
        } = document;
        let drafts = self.drafts(questions)?;
        self.finish(test_name, drafts)
    }

    /// Like [`QuestionImporter::import_document`], but questions without a
    /// `correct_answer` are sent to `resolver`, one task per question and at
    /// most `resolve_concurrency` requests at a time.
    ///
    /// Every other check runs first: a document that fails for any reason but
    /// a missing answer key makes no resolver requests.
    ///
    /// # Errors
    ///
    /// `ImportError::Unresolved` for the lowest-numbered question the resolver
    /// could not answer, otherwise as `import_document`.
    pub async fn import_resolving(
        &self,
        document: ImportDocument,
        resolver: Arc<dyn AnswerKeyResolver>,
    ) -> Result<QuestionSet, ImportError> {
        let ImportDocument {
            test_name,
            questions,
        } = document;
        let mut drafts = self.drafts(questions)?;
        if drafts.is_empty() {
            return Err(quiz_core::Error::from(QuestionSetError::Empty).into());
        }

        let mut pending = Vec::new();
        for (idx, draft) in drafts.iter().enumerate() {
            let number = idx + 1;
            // Stand-in key so the rest of the draft is validated as-is.
            let checked = QuestionDraft {
                correct_answer: Some(draft.correct_answer.unwrap_or(0)),
                ..draft.clone()
            }
            .validate()
            .map_err(|source| quiz_core::Error::Question { number, source })?;
            if draft.correct_answer.is_none() {
                pending.push((number, checked.text().to_string(), checked.options().clone()));
            }
        }

        let permits = Arc::new(Semaphore::new(self.resolve_concurrency));
        let mut resolved: BTreeMap<usize, Option<OptionIndex>> = BTreeMap::new();
        let mut tasks = JoinSet::new();
        for (number, question, options) in pending {
            resolved.insert(number, None);
            let resolver = Arc::clone(&resolver);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return (number, None);
                };
                let answer = resolver.resolve_correct_answer(&question, &options).await;
                (number, answer)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((number, answer)) => {
                    resolved.insert(number, answer);
                }
                Err(err) => warn!(error = %err, "answer key task failed"),
            }
        }

        for (number, answer) in resolved {
            let Some(answer) = answer else {
                warn!(question = number, "import rejected: answer key unresolved");
                return Err(ImportError::Unresolved { number });
            };
            if let Some(draft) = drafts.get_mut(number - 1) {
                draft.correct_answer = Some(i64::from(u8::from(answer)));
            }
        }

        self.finish(test_name, drafts)
    }

    fn drafts(&self, questions: Vec<ImportedQuestion>) -> Result<Vec<QuestionDraft>, ImportError> {
        questions
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| self.draft(idx + 1, entry))
            .collect()
    }

    fn draft(&self, number: usize, entry: ImportedQuestion) -> Result<QuestionDraft, ImportError> {
        let marking = self
            .default_marking
            .with_overrides(entry.positive_marks, entry.negative_marks)
            .map_err(|source| ImportError::Marking { number, source })?;
        Ok(QuestionDraft {
            text: entry.question,
            options: self.ordered_options(number, entry.options)?,
            correct_answer: entry.correct_answer,
            marking,
        })
    }

    /// Options in `option_keys` order.
    ///
    /// The keys must be a leading run of `option_keys`; a short run is left
    /// for validation to report as a wrong option count.
    fn ordered_options(
        &self,
        number: usize,
        options: HashMap<String, String>,
    ) -> Result<Vec<String>, ImportError> {
        let mut keyed = Vec::with_capacity(options.len());
        let mut bad_keys = false;
        for (key, value) in options {
            match self.option_keys.iter().position(|known| *known == key) {
                Some(position) => keyed.push((position, key, value)),
                None => {
                    bad_keys = true;
                    keyed.push((usize::MAX, key, value));
                }
            }
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let contiguous = keyed
            .iter()
            .enumerate()
            .all(|(expected, (position, _, _))| *position == expected);
        if bad_keys || !contiguous {
            return Err(ImportError::OptionKeys {
                number,
                keys: keyed.into_iter().map(|(_, key, _)| key).collect(),
            });
        }
        Ok(keyed.into_iter().map(|(_, _, value)| value).collect())
    }

    fn finish(
        &self,
        test_name: Option<String>,
        drafts: Vec<QuestionDraft>,
    ) -> Result<QuestionSet, ImportError> {
        let set = QuestionSet::from_drafts(test_name, drafts)?;
        info!(
            questions = set.len(),
            title = set.title().unwrap_or_default(),
            "question set imported"
        );
        Ok(set)
    }
}
