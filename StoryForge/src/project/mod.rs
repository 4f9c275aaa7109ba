//! In-memory model of a converted dialogue project
//!
//! A [`Project`] owns every mapping the parsers fill in: images, entities,
//! dialogues, fragments and the localization table. Parsers receive it by
//! mutable reference and insert into it; a later insert with the same id
//! replaces the earlier one, keeping the original position.
//!
//! Once parsing finishes, [`Project::resolve`] normalizes the fragment graph,
//! after which the model is only read.
//!
//! # Usage
//!
//! ```
//! use storyforge::project::{Dialogue, Fragment, Project};
//!
//! let mut project = Project::new();
//! project.insert_dialogue(Dialogue::new("D1".into(), "D1.Name".into()));
//! project.insert_fragment("F1".into(), Fragment {
//!     dialogue: "D1".into(),
//!     text: "F1.Text".into(),
//!     outputs: vec!["F2".into()],
//!     speaker: Some("S1".into()),
//!     ..Default::default()
//! });
//! project.insert_fragment("F2".into(), Fragment {
//!     dialogue: "D1".into(),
//!     text: "F2.Text".into(),
//!     ..Default::default()
//! });
//!
//! project.resolve();
//! assert_eq!(project.fragments["F2"].inputs, vec!["F1"]);
//! assert_eq!(project.fragments["F2"].speaker.as_deref(), Some("S1"));
//! ```

mod resolve;
mod types;

pub use resolve::ResolveStats;
pub use types::*;

use indexmap::IndexMap;
use serde::Serialize;

/// Project name used until a manifest provides one
pub const UNNAMED_PROJECT: &str = "None";

/// Everything parsed from one project export
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    /// Display name from the manifest
    pub project: String,
    /// Localization key -> variant key -> record
    pub localization: IndexMap<String, LocalizedVariants>,
    pub entities: IndexMap<String, Entity>,
    pub dialogues: IndexMap<String, Dialogue>,
    pub fragments: IndexMap<String, Fragment>,
    pub images: IndexMap<String, ImageAsset>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    #[must_use]
    pub fn new() -> Self {
        Self {
            project: UNNAMED_PROJECT.to_string(),
            localization: IndexMap::new(),
            entities: IndexMap::new(),
            dialogues: IndexMap::new(),
            fragments: IndexMap::new(),
            images: IndexMap::new(),
        }
    }

    pub fn set_name(&mut self, name: String) {
        self.project = name;
    }

    pub fn insert_image(&mut self, image: ImageAsset) {
        self.images.insert(image.id.clone(), image);
    }

    pub fn insert_entity(&mut self, entity: Entity) {
        self.entities.insert(entity.id.clone(), entity);
    }

    pub fn insert_dialogue(&mut self, dialogue: Dialogue) {
        self.dialogues.insert(dialogue.id.clone(), dialogue);
    }

    /// Insert a fragment, recording its declared speaker on the owning dialogue.
    ///
    /// The speaker is only recorded if the dialogue has already been parsed.
    pub fn insert_fragment(&mut self, id: String, fragment: Fragment) {
        if let Some(speaker) = fragment.declared_speaker()
            && let Some(dialogue) = self.dialogues.get_mut(&fragment.dialogue)
        {
            dialogue.add_speaker(speaker);
        }
        self.fragments.insert(id, fragment);
    }

    /// Merge a parsed localization table; keys from later files win.
    pub fn merge_localization(&mut self, table: IndexMap<String, LocalizedVariants>) {
        self.localization.extend(table);
    }

    /// Run the fragment graph resolver over every parsed fragment.
    pub fn resolve(&mut self) -> ResolveStats {
        resolve::resolve_fragments(&mut self.fragments)
    }

    /// Text of the unlocalized default variant for a key
    #[must_use]
    pub fn default_text(&self, key: &str) -> Option<&str> {
        self.localization
            .get(key)?
            .get("")?
            .get("text")?
            .as_str()
    }
}
