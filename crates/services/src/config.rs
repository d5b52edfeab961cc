use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;
use url::Url;

use quiz_core::model::MarkingScheme;

use crate::error::ConfigError;

pub const POSITIVE_MARKS_VAR: &str = "QUIZ_POSITIVE_MARKS";
pub const NEGATIVE_MARKS_VAR: &str = "QUIZ_NEGATIVE_MARKS";
pub const TICK_MILLIS_VAR: &str = "QUIZ_TICK_MILLIS";
pub const RESOLVER_URL_VAR: &str = "QUIZ_RESOLVER_URL";
pub const RESOLVER_TIMEOUT_VAR: &str = "QUIZ_RESOLVER_TIMEOUT_SECS";

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);
pub const DEFAULT_RESOLVER_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to reach the answer-key generation endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    pub endpoint: Url,
    pub timeout: Duration,
}

impl ResolverConfig {
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            timeout: DEFAULT_RESOLVER_TIMEOUT,
        }
    }
}

/// Runtime settings for the quiz services.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizConfig {
    /// Marking applied to imported questions that carry no marks of their own.
    pub marking: MarkingScheme,
    /// Wall-clock period between driver ticks. Every tick counts as one second.
    pub tick_period: Duration,
    /// `None` disables answer-key resolution.
    pub resolver: Option<ResolverConfig>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            marking: MarkingScheme::default(),
            tick_period: DEFAULT_TICK_PERIOD,
            resolver: None,
        }
    }
}

impl QuizConfig {
    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`. Invalid values are logged and replaced
    /// by their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let positive = parse_setting::<f64>(&lookup, POSITIVE_MARKS_VAR);
        let negative = parse_setting::<f64>(&lookup, NEGATIVE_MARKS_VAR);
        let marking = defaults
            .marking
            .with_overrides(positive, negative)
            .unwrap_or_else(|source| {
                let err = ConfigError::from(source);
                warn!(error = %err, "using default marking scheme");
                defaults.marking
            });

        let tick_period = parse_setting::<u64>(&lookup, TICK_MILLIS_VAR)
            .and_then(|millis| positive_or_warn(TICK_MILLIS_VAR, millis))
            .map_or(defaults.tick_period, Duration::from_millis);

        Self {
            marking,
            tick_period,
            resolver: resolver_config(&lookup),
        }
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = Some(resolver);
        self
    }
}

fn resolver_config(lookup: &impl Fn(&str) -> Option<String>) -> Option<ResolverConfig> {
    let raw = normalize_optional(lookup(RESOLVER_URL_VAR))?;
    let endpoint = match Url::parse(&raw) {
        Ok(url) => url,
        Err(source) => {
            let err = ConfigError::InvalidUrl {
                key: RESOLVER_URL_VAR,
                value: raw,
                source,
            };
            warn!(error = %err, "answer key resolution disabled");
            return None;
        }
    };
    let timeout = parse_setting::<u64>(lookup, RESOLVER_TIMEOUT_VAR)
        .and_then(|secs| positive_or_warn(RESOLVER_TIMEOUT_VAR, secs))
        .map_or(DEFAULT_RESOLVER_TIMEOUT, Duration::from_secs);
    Some(ResolverConfig { endpoint, timeout })
}

fn parse_setting<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Option<T> {
    let value = normalize_optional(lookup(key))?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            let err = ConfigError::InvalidValue { key, value };
            warn!(error = %err, "ignoring setting");
            None
        }
    }
}

fn positive_or_warn(key: &'static str, value: u64) -> Option<u64> {
    if value > 0 {
        return Some(value);
    }
    let err = ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    };
    warn!(error = %err, "ignoring setting");
    None
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
