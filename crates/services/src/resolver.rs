use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use quiz_core::model::{OPTION_COUNT, OptionIndex};

use crate::config::ResolverConfig;
use crate::error::ResolverError;

/// Infers the correct option of a question whose answer key is missing.
#[async_trait]
pub trait AnswerKeyResolver: Send + Sync {
    /// `None` when no usable answer could be obtained.
    async fn resolve_correct_answer(
        &self,
        question: &str,
        options: &[String; OPTION_COUNT],
    ) -> Option<OptionIndex>;
}

/// Resolver backed by a text-generation endpoint.
///
/// Sends `{"prompt": ...}` and expects `{"generatedText": ...}` whose leading
/// integer is the option index. No retries.
#[derive(Clone, Debug)]
pub struct HttpAnswerKeyResolver {
    client: Client,
    config: ResolverConfig,
}

impl HttpAnswerKeyResolver {
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    async fn request(
        &self,
        question: &str,
        options: &[String; OPTION_COUNT],
    ) -> Result<OptionIndex, ResolverError> {
        let payload = GenerateRequest {
            prompt: build_prompt(question, options),
        };

        let response = self
            .client
            .post(self.config.endpoint.clone())
            .timeout(self.config.timeout)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolverError::HttpStatus(response.status()));
        }

        let body: GenerateResponse = response.json().await?;
        parse_generated_index(&body.generated_text)
    }
}

#[async_trait]
impl AnswerKeyResolver for HttpAnswerKeyResolver {
    async fn resolve_correct_answer(
        &self,
        question: &str,
        options: &[String; OPTION_COUNT],
    ) -> Option<OptionIndex> {
        match self.request(question, options).await {
            Ok(index) => {
                debug!(%index, "answer key resolved");
                Some(index)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    endpoint = %self.config.endpoint,
                    "answer key resolution failed"
                );
                None
            }
        }
    }
}

/// Prompt asking for the bare index of the correct option.
#[must_use]
pub fn build_prompt(question: &str, options: &[String; OPTION_COUNT]) -> String {
    let listed = options
        .iter()
        .enumerate()
        .map(|(idx, option)| format!("{idx}. {option}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Given this multiple choice question and its options, respond ONLY with the number \
         (0, 1, 2, or 3) representing the index of the correct answer. No other text.\n\n\
         Question: {question}\n\nOptions:\n{listed}"
    )
}

/// Read the leading integer of `text` (after trimming) as an option index.
///
/// Trailing text after the digits is ignored, so `"2."` and `"2 (Paris)"` both
/// give option 2.
///
/// # Errors
///
/// `Unparsable` if there is no leading integer, `OutOfRange` if it is not in `0..=3`.
pub fn parse_generated_index(text: &str) -> Result<OptionIndex, ResolverError> {
    let trimmed = text.trim();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));
    let digits_len = trimmed[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len() - sign_len);
    if digits_len == 0 {
        return Err(ResolverError::Unparsable(text.to_string()));
    }

    let value: i64 = trimmed[..sign_len + digits_len]
        .parse()
        .map_err(|_| ResolverError::Unparsable(text.to_string()))?;
    OptionIndex::from_i64(value).map_err(|err| ResolverError::OutOfRange(err.0))
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    prompt: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    generated_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> [String; OPTION_COUNT] {
        ["Paris", "Rome", "Berlin", "Madrid"].map(String::from)
    }

    #[test]
    fn prompt_lists_numbered_options() {
        let prompt = build_prompt("Capital of France?", &options());
        assert!(prompt.starts_with("Given this multiple choice question"));
        assert!(prompt.contains("Question: Capital of France?"));
        assert!(prompt.ends_with("Options:\n0. Paris\n1. Rome\n2. Berlin\n3. Madrid"));
    }

    #[test]
    fn parses_leading_integer() {
        for (text, expected) in [("2", 2), (" 0\n", 0), ("3.", 3), ("1 (Rome)", 1), ("+1", 1)] {
            assert_eq!(
                parse_generated_index(text).unwrap().value(),
                expected,
                "{text:?}"
            );
        }
    }

    #[test]
    fn rejects_text_and_out_of_range() {
        assert!(matches!(
            parse_generated_index("The answer is 2"),
            Err(ResolverError::Unparsable(_))
        ));
        assert!(matches!(
            parse_generated_index(""),
            Err(ResolverError::Unparsable(_))
        ));
        assert!(matches!(
            parse_generated_index("-"),
            Err(ResolverError::Unparsable(_))
        ));
        assert!(matches!(
            parse_generated_index("7"),
            Err(ResolverError::OutOfRange(7))
        ));
        assert!(matches!(
            parse_generated_index("-1"),
            Err(ResolverError::OutOfRange(-1))
        ));
    }

    #[test]
    fn response_uses_camel_case() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"generatedText":" 1 "}"#).unwrap();
        assert_eq!(body.generated_text, " 1 ");
    }
}
