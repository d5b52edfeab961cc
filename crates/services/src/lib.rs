#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod import;
pub mod logging;
pub mod resolver;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::QuizServices;
pub use config::{QuizConfig, ResolverConfig};
pub use error::{ConfigError, ImportError, ResolverError, SessionError};
pub use import::{ImportDocument, ImportedQuestion, QuestionImporter};
pub use resolver::{AnswerKeyResolver, HttpAnswerKeyResolver, build_prompt, parse_generated_index};
pub use sessions::SessionDriver;
