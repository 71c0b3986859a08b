//! Placeholder Guard for protecting newline escapes during translation
//!
//! Leaf strings may carry a literal two-character `\n` escape sequence. The
//! generative backend works on display text and must never be asked to reason
//! about escapes, so before flattening every occurrence is rewritten to a
//! delimited sentinel marker (`{{NEWLINE}}` by default) that the backend is
//! instructed to echo verbatim. After the translated tree has been serialized
//! back to text, the marker is rewritten to the escape sequence.
//!
//! The marker must not collide with content already present in the source
//! strings. This is an unchecked precondition; pick another prefix/suffix
//! when it does.

use serde_json::Value;

/// Default marker prefix wrapped around sentinel names
pub const DEFAULT_PLACEHOLDER_PREFIX: &str = "{{";
/// Default marker suffix wrapped around sentinel names
pub const DEFAULT_PLACEHOLDER_SUFFIX: &str = "}}";

/// Sentinel name standing in for a literal `\n` escape sequence
const NEWLINE_SENTINEL: &str = "NEWLINE";

/// The literal two-character newline escape sequence found in leaves
const NEWLINE_ESCAPE: &str = "\\n";

/// Build the full newline marker for a prefix/suffix pair
pub fn newline_marker(prefix: &str, suffix: &str) -> String {
    format!("{}{}{}", prefix, NEWLINE_SENTINEL, suffix)
}

/// Replace every literal `\n` escape in the tree's leaves with the marker
///
/// Walks the nested tree in place. Non-string values are left untouched;
/// the flattener rejects them later.
pub fn guard_newlines(tree: &mut Value, prefix: &str, suffix: &str) {
    let marker = newline_marker(prefix, suffix);
    guard_value(tree, &marker);
}

fn guard_value(value: &mut Value, marker: &str) {
    match value {
        Value::String(s) => {
            if s.contains(NEWLINE_ESCAPE) {
                *s = s.replace(NEWLINE_ESCAPE, marker);
            }
        }
        Value::Object(map) => {
            for (_, child) in map.iter_mut() {
                guard_value(child, marker);
            }
        }
        _ => {}
    }
}

/// Restore newline markers in serialized output text
///
/// Operates on the serialized JSON text, not the tree: each marker becomes
/// the escaped `\n` sequence, so the written file carries the same bytes the
/// input file did and re-parsing yields the original leaf content.
pub fn restore_newlines(text: &str, prefix: &str, suffix: &str) -> String {
    let marker = newline_marker(prefix, suffix);
    // Inside a serialized JSON string, the literal escape sequence is itself
    // escaped: backslash-backslash-n.
    text.replace(&marker, "\\\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_newline_marker_default() {
        assert_eq!(
            newline_marker(DEFAULT_PLACEHOLDER_PREFIX, DEFAULT_PLACEHOLDER_SUFFIX),
            "{{NEWLINE}}"
        );
    }

    #[test]
    fn test_newline_marker_custom() {
        assert_eq!(newline_marker("<<", ">>"), "<<NEWLINE>>");
    }

    #[test]
    fn test_guard_replaces_escape() {
        let mut tree = json!({"a": "Hello\\nWorld"});
        guard_newlines(&mut tree, "{{", "}}");
        assert_eq!(tree, json!({"a": "Hello{{NEWLINE}}World"}));
    }

    #[test]
    fn test_guard_nested() {
        let mut tree = json!({"a": {"b": "one\\ntwo\\nthree", "c": "plain"}});
        guard_newlines(&mut tree, "{{", "}}");
        assert_eq!(
            tree,
            json!({"a": {"b": "one{{NEWLINE}}two{{NEWLINE}}three", "c": "plain"}})
        );
    }

    #[test]
    fn test_guard_leaves_real_newlines_alone() {
        // A real newline character is not the two-character escape sequence.
        let mut tree = json!({"a": "line1\nline2"});
        guard_newlines(&mut tree, "{{", "}}");
        assert_eq!(tree, json!({"a": "line1\nline2"}));
    }

    #[test]
    fn test_restore_in_serialized_text() {
        let serialized = "{\n    \"a\": \"Bonjour{{NEWLINE}}Monde\"\n}";
        let restored = restore_newlines(serialized, "{{", "}}");
        assert_eq!(restored, "{\n    \"a\": \"Bonjour\\\\nMonde\"\n}");
        // The restored text is valid JSON whose leaf holds the escape sequence.
        let parsed: serde_json::Value = serde_json::from_str(&restored).unwrap();
        assert_eq!(parsed["a"], "Bonjour\\nMonde");
    }

    #[test]
    fn test_guard_restore_round_trip() {
        let mut tree = json!({"a": "Hello\\nWorld"});
        guard_newlines(&mut tree, "{{", "}}");
        let serialized = serde_json::to_string(&tree).unwrap();
        let restored = restore_newlines(&serialized, "{{", "}}");
        let parsed: serde_json::Value = serde_json::from_str(&restored).unwrap();
        assert_eq!(parsed, json!({"a": "Hello\\nWorld"}));
    }

    #[test]
    fn test_custom_prefix_suffix() {
        let mut tree = json!({"a": "x\\ny"});
        guard_newlines(&mut tree, "[[", "]]");
        assert_eq!(tree, json!({"a": "x[[NEWLINE]]y"}));
        let restored = restore_newlines("\"x[[NEWLINE]]y\"", "[[", "]]");
        assert_eq!(restored, "\"x\\\\ny\"");
    }
}
