use std::path::Path;
use std::sync::Arc;

use quiz_core::model::QuestionSet;
use quiz_core::QuizSession;

use crate::Clock;
use crate::config::QuizConfig;
use crate::error::ImportError;
use crate::import::{ImportDocument, QuestionImporter};
use crate::resolver::{AnswerKeyResolver, HttpAnswerKeyResolver};
use crate::sessions::SessionDriver;

/// Assembles the importer, the optional resolver and session drivers from one config.
#[derive(Clone)]
pub struct QuizServices {
    config: QuizConfig,
    clock: Clock,
    importer: Arc<QuestionImporter>,
    resolver: Option<Arc<dyn AnswerKeyResolver>>,
}

impl QuizServices {
    #[must_use]
    pub fn new(config: QuizConfig, clock: Clock) -> Self {
        let importer = Arc::new(QuestionImporter::new(config.marking));
        let resolver = config.resolver.clone().map(|resolver| {
            Arc::new(HttpAnswerKeyResolver::new(resolver)) as Arc<dyn AnswerKeyResolver>
        });
        Self {
            config,
            clock,
            importer,
            resolver,
        }
    }

    /// Build services from `QUIZ_*` environment variables and the system clock.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(QuizConfig::from_env(), Clock::default_clock())
    }

    /// Replace the importer; its default marking is kept as given.
    #[must_use]
    pub fn with_importer(mut self, importer: QuestionImporter) -> Self {
        self.importer = Arc::new(importer);
        self
    }

    /// Replace the configured resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn AnswerKeyResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn importer(&self) -> Arc<QuestionImporter> {
        Arc::clone(&self.importer)
    }

    #[must_use]
    pub fn resolver_enabled(&self) -> bool {
        self.resolver.is_some()
    }

    /// Import a JSON document, resolving missing answer keys when a resolver
    /// is available.
    ///
    /// # Errors
    ///
    /// Returns `ImportError` if the document is rejected.
    pub async fn import_str(&self, json: &str) -> Result<QuestionSet, ImportError> {
        let document = ImportDocument::from_json(json)?;
        match &self.resolver {
            Some(resolver) => {
                self.importer
                    .import_resolving(document, Arc::clone(resolver))
                    .await
            }
            None => self.importer.import_document(document),
        }
    }

    /// # Errors
    ///
    /// Returns `ImportError::Read` if the file cannot be read, otherwise as
    /// [`QuizServices::import_str`].
    pub async fn import_file(&self, path: impl AsRef<Path>) -> Result<QuestionSet, ImportError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ImportError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        self.import_str(&json).await
    }

    /// Spawn a driver for a fresh, not yet started session over `questions`.
    #[must_use]
    pub fn open_session(&self, questions: QuestionSet) -> SessionDriver {
        let session = QuizSession::new(questions).with_clock(self.clock);
        SessionDriver::spawn(session, self.config.tick_period)
    }

    /// Open a session over the built-in sample set, for when nothing was imported.
    ///
    /// # Errors
    ///
    /// `ImportError::Invalid` only if the sample set fails validation.
    pub fn open_default_session(&self) -> Result<SessionDriver, ImportError> {
        Ok(self.open_session(QuestionSet::sample()?))
    }
}
