//! Batch translation of nested JSON localization files
//!
//! This crate translates an i18n JSON tree from one source language to one
//! or more target languages by driving a conversational generative backend.
//! The pipeline flattens the nested tree into dot-path keys, protects
//! newline escapes behind sentinel markers, sends fixed-size randomized
//! batches through a per-file [`TranslationSession`], paces requests, and
//! deterministically reconstructs a sorted nested output tree.
//!
//! # Workflow Example
//!
//! ```ignore
//! use i18n_ai_translate::{GeminiBackend, TranslationOptions, translate};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tree = serde_json::json!({"menu": {"open": "Open a file"}});
//!     let backend = GeminiBackend::from_env()?;
//!     let output = translate(
//!         &backend,
//!         &TranslationOptions {
//!             input: &tree,
//!             source_language: "English",
//!             target_language: "French",
//!             placeholder_prefix: "{{",
//!             placeholder_suffix: "}}",
//!         },
//!     )
//!     .await?;
//!     println!("{}", output);
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod error;
pub mod flatten;
pub mod gemini;
pub mod languages;
pub mod mock;
pub mod pacing;
pub mod placeholder;
pub mod session;
pub mod translate;


// Re-export main types for convenient access
pub use batch::{BATCH_SIZE, Progress, ProgressTracker, shuffled_keys};
pub use error::{TranslateError, TranslateResult};
pub use flatten::{flatten, unflatten};
pub use gemini::{API_KEY_ENV, GeminiBackend};
pub use languages::{Language, all_language_codes, language_from_code, language_from_filename};
pub use mock::{MockBackend, MockBackendMode};
pub use pacing::{MIN_BATCH_DURATION, enforce_min_duration};
pub use placeholder::{
    DEFAULT_PLACEHOLDER_PREFIX, DEFAULT_PLACEHOLDER_SUFFIX, guard_newlines, restore_newlines,
};
pub use session::{
    BatchRequest, ChatChannel, ChatRole, ChatTurn, GenerativeBackend, TranslationSession,
};
pub use translate::{
    FileTranslationOptions, TranslationOptions, output_path_for_target, translate,
    translate_file, translate_to_targets,
};
