//! Mock generative backend for testing
//!
//! A deterministic, API-free backend for exercising the pipeline without
//! credentials or network access. Each mode simulates a different backend
//! behavior: mid-run failure for the partial-output policy tests, truncated
//! responses for the count-mismatch guard, and so on.
//!
//! # Example
//!
//! ```ignore
//! let mock = MockBackend::new(MockBackendMode::Echo);
//! let lines = mock.generate(&mut session, request).await?;
//! ```

use crate::error::{TranslateError, TranslateResult};
use crate::session::{BatchRequest, GenerativeBackend, TranslationSession};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock backend modes for different test scenarios
#[derive(Debug, Clone)]
pub enum MockBackendMode {
    /// Return every source line unchanged (sentinels survive verbatim)
    Echo,
    /// Append `_<target language>` inside the quotes
    Suffix,
    /// Translate via predefined source-text to translated-text mappings,
    /// falling back to echo for unknown text
    Mappings(HashMap<String, String>),
    /// Fail every batch
    Fail,
    /// Echo for the first `n` batches, then fail every later batch
    FailAfter(usize),
    /// Echo, but drop the last line of every response (count mismatch)
    TruncateResponse,
}

/// Deterministic backend that simulates translation scenarios
#[derive(Debug)]
pub struct MockBackend {
    mode: MockBackendMode,
    batches_served: AtomicUsize,
}

impl MockBackend {
    pub fn new(mode: MockBackendMode) -> Self {
        Self {
            mode,
            batches_served: AtomicUsize::new(0),
        }
    }

    /// How many batches have been attempted so far
    pub fn batches_served(&self) -> usize {
        self.batches_served.load(Ordering::SeqCst)
    }

    fn translate_line(&self, quoted: &str, target: &str) -> String {
        let inner = strip_quotes(quoted);
        let translated = match &self.mode {
            MockBackendMode::Echo
            | MockBackendMode::Fail
            | MockBackendMode::FailAfter(_)
            | MockBackendMode::TruncateResponse => inner.to_string(),
            MockBackendMode::Suffix => format!("{}_{}", inner, target),
            MockBackendMode::Mappings(map) => map
                .get(inner)
                .cloned()
                .unwrap_or_else(|| inner.to_string()),
        };
        format!("\"{}\"", translated)
    }
}

fn strip_quotes(line: &str) -> &str {
    line.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(line)
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate(
        &self,
        session: &mut TranslationSession,
        request: BatchRequest<'_>,
    ) -> TranslateResult<Vec<String>> {
        let served = self.batches_served.fetch_add(1, Ordering::SeqCst);

        match &self.mode {
            MockBackendMode::Fail => {
                return Err(TranslateError::BatchFailed("mock failure".to_string()));
            }
            MockBackendMode::FailAfter(n) if served >= *n => {
                return Err(TranslateError::BatchFailed(format!(
                    "mock failure after {} batches",
                    n
                )));
            }
            _ => {}
        }

        let mut translated: Vec<String> = request
            .source_lines
            .iter()
            .map(|line| self.translate_line(line, request.target_language))
            .collect();

        if matches!(self.mode, MockBackendMode::TruncateResponse) {
            translated.pop();
        }

        // Keep a realistic conversational trace.
        session.generation.push_user(request.source_lines.join("\n"));
        session.generation.push_model(translated.join("\n"));

        Ok(translated)
    }

    fn backend_name(&self) -> &str {
        "Mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(lines: &'a [String], keys: &'a [String]) -> BatchRequest<'a> {
        BatchRequest {
            source_language: "English",
            target_language: "French",
            source_lines: lines,
            keys,
            placeholder_prefix: "{{",
            placeholder_suffix: "}}",
        }
    }

    #[tokio::test]
    async fn test_echo_returns_lines_verbatim() {
        let mock = MockBackend::new(MockBackendMode::Echo);
        let mut session = TranslationSession::new();
        let lines = vec!["\"Hello\"".to_string(), "\"World\"".to_string()];
        let keys = vec!["a".to_string(), "b".to_string()];
        let result = mock.generate(&mut session, request(&lines, &keys)).await.unwrap();
        assert_eq!(result, lines);
    }

    #[tokio::test]
    async fn test_echo_preserves_sentinel_markers() {
        let mock = MockBackend::new(MockBackendMode::Echo);
        let mut session = TranslationSession::new();
        let lines = vec!["\"Hello{{NEWLINE}}World\"".to_string()];
        let keys = vec!["a".to_string()];
        let result = mock.generate(&mut session, request(&lines, &keys)).await.unwrap();
        assert_eq!(result[0], "\"Hello{{NEWLINE}}World\"");
    }

    #[tokio::test]
    async fn test_suffix_mode() {
        let mock = MockBackend::new(MockBackendMode::Suffix);
        let mut session = TranslationSession::new();
        let lines = vec!["\"Hello\"".to_string()];
        let keys = vec!["a".to_string()];
        let result = mock.generate(&mut session, request(&lines, &keys)).await.unwrap();
        assert_eq!(result[0], "\"Hello_French\"");
    }

    #[tokio::test]
    async fn test_mappings_with_fallback() {
        let mut map = HashMap::new();
        map.insert("Hello".to_string(), "Bonjour".to_string());
        let mock = MockBackend::new(MockBackendMode::Mappings(map));
        let mut session = TranslationSession::new();
        let lines = vec!["\"Hello\"".to_string(), "\"Unmapped\"".to_string()];
        let keys = vec!["a".to_string(), "b".to_string()];
        let result = mock.generate(&mut session, request(&lines, &keys)).await.unwrap();
        assert_eq!(result, vec!["\"Bonjour\"", "\"Unmapped\""]);
    }

    #[tokio::test]
    async fn test_fail_mode() {
        let mock = MockBackend::new(MockBackendMode::Fail);
        let mut session = TranslationSession::new();
        let lines = vec!["\"Hello\"".to_string()];
        let keys = vec!["a".to_string()];
        let result = mock.generate(&mut session, request(&lines, &keys)).await;
        assert!(matches!(result, Err(TranslateError::BatchFailed(_))));
    }

    #[tokio::test]
    async fn test_fail_after_n_batches() {
        let mock = MockBackend::new(MockBackendMode::FailAfter(2));
        let mut session = TranslationSession::new();
        let lines = vec!["\"Hello\"".to_string()];
        let keys = vec!["a".to_string()];
        assert!(mock.generate(&mut session, request(&lines, &keys)).await.is_ok());
        assert!(mock.generate(&mut session, request(&lines, &keys)).await.is_ok());
        assert!(mock.generate(&mut session, request(&lines, &keys)).await.is_err());
        assert_eq!(mock.batches_served(), 3);
    }

    #[tokio::test]
    async fn test_truncate_response_drops_one_line() {
        let mock = MockBackend::new(MockBackendMode::TruncateResponse);
        let mut session = TranslationSession::new();
        let lines = vec!["\"Hello\"".to_string(), "\"World\"".to_string()];
        let keys = vec!["a".to_string(), "b".to_string()];
        let result = mock.generate(&mut session, request(&lines, &keys)).await.unwrap();
        assert_eq!(result, vec!["\"Hello\""]);
    }

    #[tokio::test]
    async fn test_session_history_accumulates() {
        let mock = MockBackend::new(MockBackendMode::Echo);
        let mut session = TranslationSession::new();
        let lines = vec!["\"Hello\"".to_string()];
        let keys = vec!["a".to_string()];
        mock.generate(&mut session, request(&lines, &keys)).await.unwrap();
        mock.generate(&mut session, request(&lines, &keys)).await.unwrap();
        // One user and one model turn per successful batch.
        assert_eq!(session.generation.turns().len(), 4);
    }
}
