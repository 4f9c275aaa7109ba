//! Data types for a converted dialogue project
//!
//! Every mapping is keyed by the id the authoring tool assigned and keeps
//! first-seen order, so the JSON document mirrors the export's object order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Localization records for one key, indexed by lower-cased variant key.
///
/// The unlocalized default variant uses the empty string as its key.
pub type LocalizedVariants = IndexMap<String, LocalizedRecord>;

/// Record fields of one localization variant, with lower-cased field names.
///
/// Only records that carried a `Text` field survive parsing, so `text` is
/// always present.
pub type LocalizedRecord = serde_json::Map<String, serde_json::Value>;

/// An image embedded as a data URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub id: String,
    /// Kept as the export wrote it, integer or float
    pub width: Number,
    pub height: Number,
    /// `data:image/<ext>;base64,<bytes>`
    pub uri: String,
}

/// A speaker or character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    /// Localization key of the display name
    pub name: String,
    /// Image asset key of the preview picture
    pub preview: String,
}

/// A dialogue tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    pub id: String,
    /// Localization key of the display name
    pub name: String,
    /// Entity ids in order of first appearance, without duplicates
    pub speakers: Vec<String>,
}

impl Dialogue {
    #[must_use]
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            speakers: Vec::new(),
        }
    }

    /// Append a speaker unless it is already listed.
    ///
    /// Returns true if the speaker was added.
    pub fn add_speaker(&mut self, speaker: &str) -> bool {
        if self.speakers.iter().any(|s| s == speaker) {
            return false;
        }
        self.speakers.push(speaker.to_string());
        true
    }
}

/// One node of a dialogue graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Owning dialogue id
    pub dialogue: String,
    /// Localization key of the line
    pub text: String,
    /// Forward edges as declared by the export
    pub outputs: Vec<String>,
    /// Inverse of `outputs`, in the order the edges were discovered
    pub inputs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
    /// Whether `speaker` was filled in by inference rather than declared
    #[serde(skip)]
    pub speaker_inferred: bool,
}

impl Fragment {
    /// Speaker the export declared on this node, ignoring inferred ones.
    #[must_use]
    pub fn declared_speaker(&self) -> Option<&str> {
        if self.speaker_inferred {
            None
        } else {
            self.speaker.as_deref()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_speaker_keeps_first_seen_order() {
        let mut dialogue = Dialogue::new("D1".to_string(), "D1.Name".to_string());
        assert!(dialogue.add_speaker("S2"));
        assert!(dialogue.add_speaker("S1"));
        assert!(!dialogue.add_speaker("S2"));
        assert_eq!(dialogue.speakers, vec!["S2", "S1"]);
    }

    #[test]
    fn test_declared_speaker_ignores_inferred() {
        let mut fragment = Fragment {
            speaker: Some("S1".to_string()),
            ..Default::default()
        };
        assert_eq!(fragment.declared_speaker(), Some("S1"));

        fragment.speaker_inferred = true;
        assert_eq!(fragment.declared_speaker(), None);
    }

    #[test]
    fn test_fragment_serialization_omits_absent_fields() {
        let fragment = Fragment {
            dialogue: "D1".to_string(),
            text: "F1.Text".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&fragment).unwrap();
        assert!(json.get("speaker").is_none());
        assert!(json.get("attachments").is_none());
        assert!(json.get("speaker_inferred").is_none());
        assert_eq!(json["inputs"], serde_json::json!([]));
    }
}
