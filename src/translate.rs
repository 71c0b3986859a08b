//! Core batch translation pipeline
//!
//! Drives one file translation end to end: guard placeholders, flatten the
//! tree, shuffle the keys, feed fixed-size batches through one
//! [`TranslationSession`], pace between batches, then reassemble a sorted
//! tree and serialize it. Also hosts the multi-target orchestration that
//! repeats the pipeline per target language.
//!
//! Execution is strictly sequential: the session's conversational history is
//! ordered state, so batches never run concurrently, and one file completes
//! before the next target starts.

use crate::batch::{BATCH_SIZE, ProgressTracker, shuffled_keys};
use crate::error::{TranslateError, TranslateResult};
use crate::flatten::{flatten, unflatten};
use crate::languages::language_from_filename;
use crate::pacing::enforce_min_duration;
use crate::placeholder::{guard_newlines, restore_newlines};
use crate::session::{BatchRequest, GenerativeBackend, TranslationSession};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Options for translating one in-memory tree
#[derive(Debug, Clone, Copy)]
pub struct TranslationOptions<'a> {
    /// The nested localization tree, as read from the input file
    pub input: &'a Value,
    /// Source language display name, e.g. "English"
    pub source_language: &'a str,
    /// Target language display name, e.g. "French"
    pub target_language: &'a str,
    pub placeholder_prefix: &'a str,
    pub placeholder_suffix: &'a str,
}

/// Options for translating one file on disk
#[derive(Debug, Clone)]
pub struct FileTranslationOptions {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Overrides target language detection from the output file name
    pub forced_language_name: Option<String>,
    pub placeholder_prefix: String,
    pub placeholder_suffix: String,
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value)
}

fn unquote(line: &str) -> &str {
    line.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(line)
}

/// Translate a nested tree, returning the serialized output text
///
/// On batch failure the file's remaining batches are abandoned and the
/// output is assembled from whatever completed: a partial artifact is
/// preferred over none. Missing keys are omitted and their count logged.
///
/// For a fully successful run the output is byte-identical regardless of
/// the random batch order, because reassembly iterates keys in sorted
/// order.
pub async fn translate(
    backend: &dyn GenerativeBackend,
    options: &TranslationOptions<'_>,
) -> TranslateResult<String> {
    tracing::info!(
        "Translating from {} to {} via {}...",
        options.source_language,
        options.target_language,
        backend.backend_name()
    );

    let mut tree = options.input.clone();
    guard_newlines(&mut tree, options.placeholder_prefix, options.placeholder_suffix);
    let flat = flatten(&tree)?;

    // One session per file translation; its history is the only cross-batch
    // state the backend needs.
    let mut session = TranslationSession::new();

    let keys = shuffled_keys(&flat, &mut rand::rng());
    let tracker = ProgressTracker::new(keys.len());
    let mut output: HashMap<String, String> = HashMap::new();

    for batch_keys in keys.chunks(BATCH_SIZE) {
        if let Some(progress) = tracker.report(output.len()) {
            tracing::info!(
                "Completed {:.0}% (estimated {} minutes left)",
                progress.percent,
                progress.estimated_remaining.as_secs() / 60
            );
        }

        let batch_started = tokio::time::Instant::now();
        let source_lines: Vec<String> = batch_keys.iter().map(|key| quote(&flat[key])).collect();

        let request = BatchRequest {
            source_language: options.source_language,
            target_language: options.target_language,
            source_lines: &source_lines,
            keys: batch_keys,
            placeholder_prefix: options.placeholder_prefix,
            placeholder_suffix: options.placeholder_suffix,
        };

        let translated = match backend.generate(&mut session, request).await {
            Ok(lines) if lines.len() == batch_keys.len() => lines,
            Ok(lines) => {
                tracing::error!(
                    "backend returned {} lines for a batch of {}; abandoning remaining batches",
                    lines.len(),
                    batch_keys.len()
                );
                break;
            }
            Err(err) => {
                tracing::error!("batch failed, abandoning remaining batches: {}", err);
                break;
            }
        };

        for (key, line) in batch_keys.iter().zip(&translated) {
            let value = unquote(line);
            tracing::debug!("{}: {} => {}", key, flat[key], value);
            output.insert(key.clone(), value.to_string());
        }

        enforce_min_duration(batch_started).await;
    }

    let missing = flat.len() - output.len();
    if missing > 0 {
        tracing::warn!(
            "output is incomplete: {} of {} keys have no translation",
            missing,
            flat.len()
        );
    }

    // Sorted reassembly: send order never reaches the artifact.
    let sorted: BTreeMap<String, String> = output.into_iter().collect();
    let translated_tree = unflatten(&sorted);
    let serialized = serialize_pretty(&translated_tree)?;
    Ok(restore_newlines(
        &serialized,
        options.placeholder_prefix,
        options.placeholder_suffix,
    ))
}

/// Serialize a tree as structured text with 4-space indentation
fn serialize_pretty(tree: &Value) -> TranslateResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    tree.serialize(&mut serializer)
        .map_err(|e| TranslateError::InvalidJson(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| TranslateError::InvalidJson(e.to_string()))
}

/// Translate one file on disk
///
/// The source language comes from the input file name; the target language
/// from the forced override or the output file name.
pub async fn translate_file(
    backend: &dyn GenerativeBackend,
    options: &FileTranslationOptions,
) -> TranslateResult<()> {
    let text = std::fs::read_to_string(&options.input_path)?;
    let tree: Value =
        serde_json::from_str(&text).map_err(|e| TranslateError::InvalidJson(e.to_string()))?;

    let source = language_from_filename(&options.input_path).ok_or_else(|| {
        TranslateError::UnknownLanguage(format!(
            "input file name {} does not embed an ISO 639-1 language code",
            options.input_path.display()
        ))
    })?;

    let target_language = match &options.forced_language_name {
        Some(name) => name.clone(),
        None => language_from_filename(&options.output_path)
            .ok_or_else(|| {
                TranslateError::UnknownLanguage(format!(
                    "output file name {} does not embed an ISO 639-1 language code; \
                     consider --force-language-name",
                    options.output_path.display()
                ))
            })?
            .name
            .to_string(),
    };

    let output_text = translate(
        backend,
        &TranslationOptions {
            input: &tree,
            source_language: source.name,
            target_language: &target_language,
            placeholder_prefix: &options.placeholder_prefix,
            placeholder_suffix: &options.placeholder_suffix,
        },
    )
    .await?;

    std::fs::write(&options.output_path, output_text)?;
    tracing::info!("Wrote {}", options.output_path.display());
    Ok(())
}

/// Derive the output path for a target language code
///
/// Substitutes the detected source code with the target code in the input
/// file name. Returns `None` when substitution leaves the name unchanged
/// (the target equals the source), which callers treat as a skip.
pub fn output_path_for_target(
    input_path: &Path,
    source_code: &str,
    target_code: &str,
) -> Option<PathBuf> {
    let file_name = input_path.file_name()?.to_str()?;
    let replaced = file_name.replacen(source_code, target_code, 1);
    if replaced == file_name {
        return None;
    }
    Some(input_path.with_file_name(replaced))
}

/// Translate one input file to many target languages, sequentially
///
/// Each target is attempted independently: a failure is logged and the
/// remaining targets continue unaffected.
pub async fn translate_to_targets(
    backend: &dyn GenerativeBackend,
    input_path: &Path,
    target_codes: &[String],
    placeholder_prefix: &str,
    placeholder_suffix: &str,
) -> TranslateResult<()> {
    let source = language_from_filename(input_path).ok_or_else(|| {
        TranslateError::UnknownLanguage(format!(
            "input file name {} does not embed an ISO 639-1 language code",
            input_path.display()
        ))
    })?;

    for (i, code) in target_codes.iter().enumerate() {
        tracing::info!("Translating {}/{} languages...", i + 1, target_codes.len());

        let Some(output_path) = output_path_for_target(input_path, source.code, code) else {
            tracing::info!("Skipping {}: target equals source", code);
            continue;
        };

        let options = FileTranslationOptions {
            input_path: input_path.to_path_buf(),
            output_path,
            forced_language_name: None,
            placeholder_prefix: placeholder_prefix.to_string(),
            placeholder_suffix: placeholder_suffix.to_string(),
        };

        if let Err(err) = translate_file(backend, &options).await {
            tracing::error!("Failed to translate to {}: {}", code, err);
        }
    }

    Ok(())
}
