//! Gemini chat backend for batch translation
//!
//! Drives Google's Gemini generateContent API as a conversational backend:
//! each of the session's three channels maps to an independent chat whose
//! history is replayed on every request. Generation produces the candidate
//! translations; the two verification channels are asked to ACK or NAK the
//! candidate before it is accepted. Retrying on NAK or malformed output is
//! internal to this backend; callers only observe the final pass/fail.
//!
//! # Authentication
//!
//! The API key comes from the `--key` CLI option or the `API_KEY`
//! environment variable (a `.env` file is honored at startup).

use crate::error::{TranslateError, TranslateResult};
use crate::session::{BatchRequest, ChatChannel, ChatRole, GenerativeBackend, TranslationSession};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "API_KEY";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-pro";

/// Internal attempts per batch before giving up and signalling failure
const RETRY_ATTEMPTS: usize = 5;

/// Conversational Gemini backend
#[derive(Clone)]
pub struct GeminiBackend {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

impl GeminiBackend {
    /// Create a backend with an explicit API key
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New backend instance
    /// * `Err(TranslateError)` - If the key is empty or the HTTP client
    ///   cannot be built
    pub fn new(api_key: String) -> TranslateResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslateError::ConfigError(
                "API key cannot be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder().build().map_err(|e| {
            TranslateError::NetworkError(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            api_key,
            client,
            base_url: GEMINI_BASE_URL.to_string(),
            model: GEMINI_MODEL.to_string(),
        })
    }

    /// Create a backend from the `API_KEY` environment variable
    pub fn from_env() -> TranslateResult<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            TranslateError::ConfigError(format!(
                "{} environment variable not set",
                API_KEY_ENV
            ))
        })?;
        Self::new(api_key)
    }

    /// Send one request on a channel: replayed history plus the new prompt
    async fn request_completion(
        &self,
        channel: &ChatChannel,
        prompt: &str,
    ) -> TranslateResult<String> {
        let mut contents: Vec<serde_json::Value> = channel
            .turns()
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    ChatRole::User => "user",
                    ChatRole::Model => "model",
                };
                json!({"role": role, "parts": [{"text": turn.text}]})
            })
            .collect();
        contents.push(json!({"role": "user", "parts": [{"text": prompt}]}));

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = json!({ "contents": contents });

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(if status.is_client_error() {
                TranslateError::ConfigError(format!(
                    "API client error ({}): {}",
                    status, error_text
                ))
            } else {
                TranslateError::NetworkError(format!(
                    "API server error ({}): {}",
                    status, error_text
                ))
            });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            TranslateError::NetworkError(format!("Failed to parse API response: {}", e))
        })?;

        let text = parsed
            .candidates
            .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                TranslateError::BatchFailed("API response carried no candidates".to_string())
            })?;

        Ok(text)
    }

    /// Ask a verification channel to ACK or NAK a candidate translation
    ///
    /// The channel keeps its full history, NAKs included, so later checks see
    /// earlier verdicts.
    async fn verify(&self, channel: &mut ChatChannel, prompt: String) -> TranslateResult<bool> {
        let verdict = self.request_completion(channel, &prompt).await?;
        channel.push_user(prompt);
        channel.push_model(verdict.clone());
        Ok(verdict.trim().to_uppercase().starts_with("ACK"))
    }
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

fn build_generation_prompt(request: &BatchRequest<'_>) -> String {
    format!(
        "You are a professional translator. Translate each line below from {source} to \
         {target}.\n\
         Return the translations in the same order, one per line, each wrapped in double \
         quotes, with no commentary.\n\
         Any text between \"{prefix}\" and \"{suffix}\" is a placeholder: copy it to the \
         output verbatim, untranslated.\n\n\
         Lines to translate:\n{lines}",
        source = request.source_language,
        target = request.target_language,
        prefix = request.placeholder_prefix,
        suffix = request.placeholder_suffix,
        lines = request.source_lines.join("\n"),
    )
}

fn build_translation_check_prompt(request: &BatchRequest<'_>, candidate: &str) -> String {
    format!(
        "Given these {source} lines:\n{lines}\n\nand this {target} translation:\n\
         {candidate}\n\nReply ACK if every line is an accurate translation of the \
         corresponding source line, otherwise reply NAK.",
        source = request.source_language,
        target = request.target_language,
        lines = request.source_lines.join("\n"),
        candidate = candidate,
    )
}

fn build_styling_check_prompt(request: &BatchRequest<'_>, candidate: &str) -> String {
    format!(
        "Given these source lines:\n{lines}\n\nand this translation:\n{candidate}\n\n\
         Reply ACK if every translated line preserves the source line's styling \
         (capitalization, punctuation, surrounding whitespace and any \"{prefix}...{suffix}\" \
         placeholders), otherwise reply NAK.",
        lines = request.source_lines.join("\n"),
        candidate = candidate,
        prefix = request.placeholder_prefix,
        suffix = request.placeholder_suffix,
    )
}

/// Split a model response into candidate translation lines
fn parse_response_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(
        &self,
        session: &mut TranslationSession,
        request: BatchRequest<'_>,
    ) -> TranslateResult<Vec<String>> {
        let prompt = build_generation_prompt(&request);
        let mut last_failure = String::new();

        for attempt in 1..=RETRY_ATTEMPTS {
            let response = match self.request_completion(&session.generation, &prompt).await {
                Ok(text) => text,
                Err(TranslateError::ConfigError(msg)) => {
                    // A rejected credential will not fix itself on retry.
                    return Err(TranslateError::ConfigError(msg));
                }
                Err(err) => {
                    tracing::warn!("generation attempt {} failed: {}", attempt, err);
                    last_failure = err.to_string();
                    continue;
                }
            };

            let lines = parse_response_lines(&response);
            if lines.len() != request.keys.len() {
                tracing::warn!(
                    "attempt {}: expected {} lines, got {}",
                    attempt,
                    request.keys.len(),
                    lines.len()
                );
                last_failure = format!(
                    "line count mismatch: expected {}, got {}",
                    request.keys.len(),
                    lines.len()
                );
                continue;
            }

            let candidate = lines.join("\n");
            let check = build_translation_check_prompt(&request, &candidate);
            match self.verify(&mut session.translation_verification, check).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!("attempt {}: translation check NAK", attempt);
                    last_failure = "translation verification rejected the batch".to_string();
                    continue;
                }
                Err(err) => {
                    last_failure = err.to_string();
                    continue;
                }
            }

            let check = build_styling_check_prompt(&request, &candidate);
            match self.verify(&mut session.styling_verification, check).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!("attempt {}: styling check NAK", attempt);
                    last_failure = "styling verification rejected the batch".to_string();
                    continue;
                }
                Err(err) => {
                    last_failure = err.to_string();
                    continue;
                }
            }

            // Only verified exchanges enter the generation history that later
            // batches build on.
            session.generation.push_user(prompt);
            session.generation.push_model(candidate);
            return Ok(lines);
        }

        Err(TranslateError::BatchFailed(format!(
            "no verified translation after {} attempts: {}",
            RETRY_ATTEMPTS, last_failure
        )))
    }

    fn backend_name(&self) -> &str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_valid_key() {
        let backend = GeminiBackend::new("test-api-key".to_string());
        assert!(backend.is_ok());
        assert_eq!(backend.unwrap().backend_name(), "Gemini");
    }

    #[test]
    fn test_new_with_empty_key() {
        let result = GeminiBackend::new("".to_string());
        match result {
            Err(TranslateError::ConfigError(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected ConfigError"),
        }
    }

    #[test]
    fn test_new_with_whitespace_key() {
        assert!(GeminiBackend::new("   ".to_string()).is_err());
    }

    #[test]
    fn test_from_env_without_key() {
        unsafe {
            std::env::remove_var(API_KEY_ENV);
        }
        let result = GeminiBackend::from_env();
        match result {
            Err(TranslateError::ConfigError(msg)) => assert!(msg.contains("not set")),
            _ => panic!("Expected ConfigError"),
        }
    }

    #[test]
    fn test_debug_masks_api_key() {
        let backend = GeminiBackend::new("secret-key".to_string()).unwrap();
        let debug_str = format!("{:?}", backend);
        assert!(debug_str.contains("***"));
        assert!(!debug_str.contains("secret-key"));
    }

    #[test]
    fn test_generation_prompt_contents() {
        let lines = vec!["\"Hello\"".to_string(), "\"World\"".to_string()];
        let keys = vec!["a".to_string(), "b".to_string()];
        let request = BatchRequest {
            source_language: "English",
            target_language: "French",
            source_lines: &lines,
            keys: &keys,
            placeholder_prefix: "{{",
            placeholder_suffix: "}}",
        };
        let prompt = build_generation_prompt(&request);
        assert!(prompt.contains("English"));
        assert!(prompt.contains("French"));
        assert!(prompt.contains("\"Hello\"\n\"World\""));
        assert!(prompt.contains("{{"));
        assert!(prompt.contains("}}"));
    }

    #[test]
    fn test_parse_response_lines_trims_and_drops_blanks() {
        let text = "\"Bonjour\"\n\n  \"Monde\"  \n";
        assert_eq!(parse_response_lines(text), vec!["\"Bonjour\"", "\"Monde\""]);
    }

    #[test]
    fn test_parse_response_lines_empty() {
        assert!(parse_response_lines("").is_empty());
        assert!(parse_response_lines("\n\n").is_empty());
    }

    // Integration tests against the real API; run with a real credential:
    //   API_KEY=... cargo test --lib gemini -- --ignored

    #[tokio::test]
    #[ignore]
    async fn test_real_api_single_batch() {
        if std::env::var(API_KEY_ENV).is_err() {
            eprintln!("Skipping: {} not set", API_KEY_ENV);
            return;
        }

        let backend = GeminiBackend::from_env().unwrap();
        let mut session = TranslationSession::new();
        let lines = vec!["\"Hello\"".to_string(), "\"Goodbye\"".to_string()];
        let keys = vec!["greeting".to_string(), "farewell".to_string()];
        let request = BatchRequest {
            source_language: "English",
            target_language: "French",
            source_lines: &lines,
            keys: &keys,
            placeholder_prefix: "{{",
            placeholder_suffix: "}}",
        };

        let result = backend.generate(&mut session, request).await.unwrap();
        assert_eq!(result.len(), 2);
        assert!(!session.generation.is_empty());
    }
}
