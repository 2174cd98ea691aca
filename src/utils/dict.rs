//! Dictionary utilities
//!
//! The editor keeps each language as an insertion-ordered JSON object. The
//! map has no insert-at-index primitive, so positional insertion rebuilds
//! the ordered entry sequence.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

use crate::error::{Result, TranslateError};
use crate::models::project::Dict;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<([^>]+)>").expect("valid regex"));

/// Insert `key` immediately after the entry at ordinal `after_pos`,
/// preserving the relative order of all existing keys. Out-of-range
/// positions append at the end.
pub fn insert_key(dict: &mut Dict, key: &str, after_pos: usize, value: Value) {
    let entries = std::mem::take(dict);
    let mut pending = Some(value);
    for (i, (k, v)) in entries.into_iter().enumerate() {
        dict.insert(k, v);
        if i == after_pos {
            if let Some(value) = pending.take() {
                dict.insert(key.to_string(), value);
            }
        }
    }
    if let Some(value) = pending {
        dict.insert(key.to_string(), value);
    }
}

/// Insert a dotted path like `a.b.c` as a nested skeleton with an empty
/// string at the leaf, placing the head key at ordinal `after_pos`.
pub fn insert_deep_key(dict: &mut Dict, deep_key: &str, after_pos: usize) {
    let keys: Vec<&str> = deep_key.split('.').collect();
    let mut value = Value::String(String::new());
    for key in keys[1..].iter().rev() {
        let mut nested = Dict::new();
        nested.insert((*key).to_string(), value);
        value = Value::Object(nested);
    }
    insert_key(dict, keys[0], after_pos, value);
}

/// Strip keys holding the empty string, recursively; nested dictionaries
/// that end up empty are dropped too. Keeps placeholder rows out of commits.
pub fn clean_empty_keys(dict: &Dict) -> Dict {
    let mut cleaned = Dict::new();
    for (key, value) in dict {
        match value {
            Value::String(s) if s.is_empty() => {}
            Value::Object(nested) => {
                let nested = clean_empty_keys(nested);
                if !nested.is_empty() {
                    cleaned.insert(key.clone(), Value::Object(nested));
                }
            }
            _ => {
                cleaned.insert(key.clone(), value.clone());
            }
        }
    }
    cleaned
}

/// Structural equality via canonical JSON serialization. Key-order
/// sensitive: identical keys in a different order compare unequal.
pub fn deep_equal(a: &Dict, b: &Dict) -> bool {
    match (serde_json::to_string(a), serde_json::to_string(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// A key is HTML-valued when any dot-separated segment ends with `Html`.
/// Naming convention, not content inspection.
pub fn is_html(full_key: &str) -> bool {
    full_key.split('.').any(|key| key.ends_with("Html"))
}

pub fn contains_html_tags(text: &str) -> bool {
    HTML_TAG.is_match(text)
}

/// String value lookup for a flat key
pub fn get_value<'a>(dict: &'a Dict, key: &str) -> Option<&'a str> {
    dict.get(key).and_then(Value::as_str)
}

/// Validate that loaded config JSON is an array, with a descriptive error
/// instead of silent coercion.
pub fn ensure_input_is_array(value: &Value) -> Result<()> {
    if value.is_null() {
        return Err(TranslateError::InvalidInput("Invalid file".to_string()));
    }
    if !value.is_array() {
        return Err(TranslateError::InvalidInput("Must be an array".to_string()));
    }
    Ok(())
}

/// Parse translation file text into a dictionary; the root must be an object
pub fn dict_from_json(text: &str) -> Result<Dict> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        _ => Err(TranslateError::InvalidInput(
            "translation file must be a JSON object".to_string(),
        )),
    }
}

/// Pretty-print a dictionary with an arbitrary indent width. This is the
/// canonical text committed to the repository.
pub fn to_canonical_json(dict: &Dict, indent: usize) -> Result<String> {
    let indent_bytes = vec![b' '; indent];
    let mut buf = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent_bytes));
    dict.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dict(value: Value) -> Dict {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn keys(dict: &Dict) -> Vec<&str> {
        dict.keys().map(String::as_str).collect()
    }

    #[test]
    fn insert_key_places_after_ordinal() {
        let mut d = dict(json!({"k0": "a", "k1": "b", "k2": "c", "k3": "d"}));
        insert_key(&mut d, "x", 1, Value::String("v".to_string()));
        assert_eq!(keys(&d), ["k0", "k1", "x", "k2", "k3"]);
        assert_eq!(get_value(&d, "x"), Some("v"));
    }

    #[test]
    fn insert_key_at_first_and_last_position() {
        let mut d = dict(json!({"a": "1", "b": "2"}));
        insert_key(&mut d, "x", 0, Value::String(String::new()));
        assert_eq!(keys(&d), ["a", "x", "b"]);

        let mut d = dict(json!({"a": "1", "b": "2"}));
        insert_key(&mut d, "x", 1, Value::String(String::new()));
        assert_eq!(keys(&d), ["a", "b", "x"]);
    }

    #[test]
    fn insert_key_out_of_range_appends() {
        let mut d = dict(json!({"a": "1"}));
        insert_key(&mut d, "x", 99, Value::String(String::new()));
        assert_eq!(keys(&d), ["a", "x"]);
    }

    #[test]
    fn insert_deep_key_builds_nested_skeleton() {
        let mut d = dict(json!({"first": "1", "second": "2"}));
        insert_deep_key(&mut d, "menu.items.title", 0);
        assert_eq!(keys(&d), ["first", "menu", "second"]);
        assert_eq!(d["menu"], json!({"items": {"title": ""}}));
    }

    #[test]
    fn insert_deep_key_with_single_segment() {
        let mut d = dict(json!({"a": "1"}));
        insert_deep_key(&mut d, "b", 0);
        assert_eq!(d["b"], json!(""));
    }

    #[test]
    fn clean_empty_keys_strips_placeholders() {
        let d = dict(json!({
            "keep": "value",
            "drop": "",
            "nested": {"keep": "x", "drop": ""},
            "hollow": {"drop": ""}
        }));
        let cleaned = clean_empty_keys(&d);
        assert_eq!(keys(&cleaned), ["keep", "nested"]);
        assert_eq!(cleaned["nested"], json!({"keep": "x"}));
    }

    #[test]
    fn deep_equal_matches_identical_dicts() {
        let a = dict(json!({"a": "1", "b": "2"}));
        let b = dict(json!({"a": "1", "b": "2"}));
        assert!(deep_equal(&a, &b));
    }

    #[test]
    fn deep_equal_is_key_order_sensitive() {
        let a = dict(json!({"a": "1", "b": "2"}));
        let b = dict(json!({"b": "2", "a": "1"}));
        assert!(!deep_equal(&a, &b));
    }

    #[test]
    fn is_html_checks_segment_suffix() {
        assert!(is_html("a.b.fooHtml"));
        assert!(is_html("introHtml.title"));
        assert!(!is_html("a.b.foo"));
        assert!(!is_html("html.lowercase"));
    }

    #[test]
    fn contains_html_tags_sniffs_markup() {
        assert!(contains_html_tags("hello <b>world</b>"));
        assert!(!contains_html_tags("plain text"));
        assert!(!contains_html_tags("2 < 3"));
    }

    #[test]
    fn ensure_input_is_array_rejects_other_shapes() {
        assert!(ensure_input_is_array(&json!([1, 2])).is_ok());
        assert!(ensure_input_is_array(&Value::Null).is_err());
        assert!(ensure_input_is_array(&json!({"a": 1})).is_err());
    }

    #[test]
    fn dict_from_json_requires_object_root() {
        assert!(dict_from_json(r#"{"a": "1"}"#).is_ok());
        assert!(dict_from_json("[1, 2]").is_err());
        assert!(dict_from_json("not json").is_err());
    }

    #[test]
    fn canonical_json_preserves_key_order() {
        let text = r#"{"zebra": "1", "alpha": "2", "mid": {"b": "x", "a": "y"}}"#;
        let d = dict_from_json(text).unwrap();
        let formatted = to_canonical_json(&d, 2).unwrap();
        assert_eq!(
            formatted,
            "{\n  \"zebra\": \"1\",\n  \"alpha\": \"2\",\n  \"mid\": {\n    \"b\": \"x\",\n    \"a\": \"y\"\n  }\n}"
        );
    }
}
