use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::LocaleError;
use crate::model::key_path::KeyPath;
use crate::services::encoding;

pub fn read_document(path: &Path) -> Result<Value, LocaleError> {
    let bytes = fs::read(path).map_err(|source| LocaleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read locale file");

    let text = encoding::decode_utf8(path, &bytes)?;

    serde_json::from_str(&text).map_err(|source| LocaleError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Walks `key_path` through nested objects and returns the string at the end.
pub fn extract(doc: &Value, key_path: &KeyPath) -> Result<String, LocaleError> {
    let mut current = doc;

    for (depth, key) in key_path.segments().iter().enumerate() {
        let obj = current.as_object().ok_or_else(|| LocaleError::NotAnObject {
            at: if depth == 0 {
                "<root>".to_string()
            } else {
                key_path.prefix(depth)
            },
        })?;

        current = obj.get(key).ok_or_else(|| LocaleError::MissingKey {
            key_path: key_path.to_string(),
            missing: key_path.prefix(depth + 1),
        })?;
    }

    match current {
        Value::String(s) => Ok(s.clone()),
        _ => Err(LocaleError::NotAString {
            key_path: key_path.to_string(),
        }),
    }
}

pub fn extract_from_file(path: &Path, key_path: &KeyPath) -> Result<String, LocaleError> {
    let doc = read_document(path)?;
    let value = extract(&doc, key_path)?;
    debug!(path = %path.display(), %key_path, "extracted value");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn answer_path() -> KeyPath {
        KeyPath::parse("seo.faq.what_is_answer").unwrap()
    }

    #[test]
    fn extracts_nested_string() {
        let doc = json!({ "seo": { "faq": { "what_is_answer": "X" } } });
        assert_eq!(extract(&doc, &answer_path()).unwrap(), "X");
    }

    #[test]
    fn ignores_sibling_keys() {
        let doc = json!({
            "title": "Dividir imagem",
            "seo": {
                "description": "...",
                "faq": { "what_is": "?", "what_is_answer": "Corte o carrossel" }
            }
        });
        assert_eq!(extract(&doc, &answer_path()).unwrap(), "Corte o carrossel");
    }

    #[test]
    fn missing_ancestor_is_reported() {
        let doc = json!({ "home": {} });
        match extract(&doc, &answer_path()) {
            Err(LocaleError::MissingKey { key_path, missing }) => {
                assert_eq!(key_path, "seo.faq.what_is_answer");
                assert_eq!(missing, "seo");
            }
            other => panic!("expected missing key, got {other:?}"),
        }

        let doc = json!({ "seo": { "faq": {} } });
        match extract(&doc, &answer_path()) {
            Err(LocaleError::MissingKey { missing, .. }) => {
                assert_eq!(missing, "seo.faq.what_is_answer")
            }
            other => panic!("expected missing key, got {other:?}"),
        }
    }

    #[test]
    fn intermediate_scalar_is_not_an_object() {
        let doc = json!({ "seo": { "faq": "oops" } });
        match extract(&doc, &answer_path()) {
            Err(LocaleError::NotAnObject { at }) => assert_eq!(at, "seo.faq"),
            other => panic!("expected not-an-object, got {other:?}"),
        }

        let doc = json!(["seo"]);
        assert!(matches!(
            extract(&doc, &answer_path()),
            Err(LocaleError::NotAnObject { at }) if at == "<root>"
        ));
    }

    #[test]
    fn final_value_must_be_a_string() {
        let doc = json!({ "seo": { "faq": { "what_is_answer": { "text": "X" } } } });
        assert!(matches!(
            extract(&doc, &answer_path()),
            Err(LocaleError::NotAString { .. })
        ));
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("common.json");
        fs::write(
            &path,
            r#"{"seo":{"faq":{"what_is_answer":"Corte o carrossel"}}}"#,
        )
        .unwrap();

        assert_eq!(
            extract_from_file(&path, &answer_path()).unwrap(),
            "Corte o carrossel"
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(
            read_document(&path),
            Err(LocaleError::Io { .. })
        ));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("common.json");
        fs::write(&path, r#"{"seo": {"faq": "#).unwrap();
        assert!(matches!(
            read_document(&path),
            Err(LocaleError::Parse { .. })
        ));
    }
}
