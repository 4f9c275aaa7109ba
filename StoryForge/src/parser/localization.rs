//! Localization file parsing
//!
//! A localization file maps each key to its variants (`""` for the
//! unlocalized default, then voice-over or locale variants). Only variants
//! whose record carries a `Text` field are kept; variant keys and record
//! field names are lower-cased.

use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;

use super::json::read_json;
use crate::error::{Error, Result};
use crate::project::{LocalizedRecord, LocalizedVariants};
use crate::schema;

/// Parse a localization file into a flattened table.
///
/// # Errors
/// Fails if the file is missing, is not valid JSON, or its top level is not
/// an object.
pub fn parse_localization_file(path: &Path) -> Result<IndexMap<String, LocalizedVariants>> {
    let data = read_json(path)?;
    let entries = data.as_object().ok_or_else(|| Error::MissingField {
        path: path.to_path_buf(),
        field: "<root object>".to_string(),
    })?;

    let table: IndexMap<String, LocalizedVariants> = entries
        .iter()
        .map(|(key, variants)| (key.clone(), flatten_variants(variants)))
        .collect();

    tracing::debug!("Parsed {}: {} localization keys", path.display(), table.len());
    Ok(table)
}

/// Keep variants that carry text, lower-casing keys.
///
/// Anything that is not an object of objects yields no variants.
pub fn flatten_variants(variants: &Value) -> LocalizedVariants {
    let Some(variants) = variants.as_object() else {
        return LocalizedVariants::new();
    };

    variants
        .iter()
        .filter_map(|(variant, record)| {
            let record = record.as_object()?;
            if !record.contains_key(schema::TEXT) {
                return None;
            }
            let lowered: LocalizedRecord = record
                .iter()
                .map(|(field, value)| (field.to_lowercase(), value.clone()))
                .collect();
            Some((variant.to_lowercase(), lowered))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_variant_without_text_dropped() {
        let variants = flatten_variants(&json!({"": {"Text": "Hi"}, "VO": {}}));
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[""]["text"], json!("Hi"));
    }

    #[test]
    fn test_keys_lower_cased() {
        let variants = flatten_variants(&json!({
            "VO_EN": {"Text": "Hello", "VoAsset": "vo/hello.ogg"}
        }));
        let record = &variants["vo_en"];
        assert_eq!(record["text"], json!("Hello"));
        assert_eq!(record["voasset"], json!("vo/hello.ogg"));
    }

    #[test]
    fn test_malformed_variants_yield_nothing() {
        assert!(flatten_variants(&json!("text")).is_empty());
        assert!(flatten_variants(&json!({"": "Hi"})).is_empty());
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loc.json");
        std::fs::write(
            &path,
            json!({
                "L1": {"": {"Text": "Hi"}, "VO": {}},
                "L2": {"VO": {"VoAsset": "x"}},
            })
            .to_string(),
        )
        .unwrap();

        let table = parse_localization_file(&path).unwrap();
        let keys: Vec<_> = table.keys().cloned().collect();
        assert_eq!(keys, vec!["L1", "L2"]);
        assert_eq!(table["L1"].keys().collect::<Vec<_>>(), vec![""]);
        assert!(table["L2"].is_empty());
    }
}
