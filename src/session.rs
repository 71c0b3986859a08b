//! Translation Session and the generative backend boundary
//!
//! A [`TranslationSession`] is the only cross-batch state the backend needs
//! for consistency: three independent conversational channels whose
//! accumulated history persists across all batches of one file translation.
//! It is created once per file, threaded by mutable reference into each
//! batch call, and discarded when the file is done. It is never shared
//! across target languages.
//!
//! The [`GenerativeBackend`] trait is the single capability the core depends
//! on: one call per batch, returning either the ordered translated lines or
//! a failure. Whatever retrying or verification the backend performs
//! internally is opaque to the core.

use crate::error::TranslateResult;
use async_trait::async_trait;

/// Who produced a conversational turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

/// One turn in a conversational channel
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// A single conversational channel: an ordered history of turns
#[derive(Debug, Default)]
pub struct ChatChannel {
    turns: Vec<ChatTurn>,
}

impl ChatChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(ChatTurn {
            role: ChatRole::User,
            text: text.into(),
        });
    }

    pub fn push_model(&mut self, text: impl Into<String>) {
        self.turns.push(ChatTurn {
            role: ChatRole::Model,
            text: text.into(),
        });
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Conversational state spanning all batches of one file translation
///
/// The three channels are independent histories: one generates translations,
/// two verify them (faithfulness and styling). The conversational history is
/// inherently ordered state, which is why batches run strictly one at a
/// time.
#[derive(Debug, Default)]
pub struct TranslationSession {
    pub generation: ChatChannel,
    pub translation_verification: ChatChannel,
    pub styling_verification: ChatChannel,
}

impl TranslationSession {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One batch of work handed to the backend
///
/// `source_lines` and `keys` have the same length and correspond by index.
/// Each source line is already wrapped in double quotes; the keys exist for
/// the backend's internal bookkeeping only. The placeholder prefix/suffix
/// delimit sentinel markers the backend must echo untouched.
#[derive(Debug, Clone, Copy)]
pub struct BatchRequest<'a> {
    /// Source language display name, e.g. "English"
    pub source_language: &'a str,
    /// Target language display name, e.g. "French"
    pub target_language: &'a str,
    pub source_lines: &'a [String],
    pub keys: &'a [String],
    pub placeholder_prefix: &'a str,
    pub placeholder_suffix: &'a str,
}

/// The single capability the core requires of a generative backend
///
/// # Guarantees required of implementations
///
/// - Success implies the returned lines match `source_lines` in count and
///   order, each wrapped in double quotes.
/// - An `Err` is the batch failure signal; the core abandons the file's
///   remaining batches on it.
///
/// The core validates the count itself and treats a mismatch as a batch
/// failure rather than misaligning keys to values.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Translate one batch of quoted lines within an ongoing session
    async fn generate(
        &self,
        session: &mut TranslationSession,
        request: BatchRequest<'_>,
    ) -> TranslateResult<Vec<String>>;

    /// Identify this backend for logging
    fn backend_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_accumulates_turns_in_order() {
        let mut channel = ChatChannel::new();
        assert!(channel.is_empty());
        channel.push_user("prompt");
        channel.push_model("reply");
        channel.push_user("followup");
        let turns = channel.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, ChatRole::User);
        assert_eq!(turns[1].role, ChatRole::Model);
        assert_eq!(turns[1].text, "reply");
        assert_eq!(turns[2].role, ChatRole::User);
    }

    #[test]
    fn test_session_channels_are_independent() {
        let mut session = TranslationSession::new();
        session.generation.push_user("generate");
        session.translation_verification.push_user("verify");
        assert_eq!(session.generation.turns().len(), 1);
        assert_eq!(session.translation_verification.turns().len(), 1);
        assert!(session.styling_verification.is_empty());
    }
}
