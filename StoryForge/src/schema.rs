//! Field names and type literals of the authoring tool's JSON export
//!
//! Every key the parsers look up lives here.

/// Manifest file name at the project root.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Null object id used by the export for unset references.
pub const NULL_ID: &str = "0x0000000000000000";

// Manifest
pub const PROJECT: &str = "Project";
pub const NAME: &str = "Name";
pub const PACKAGES: &str = "Packages";
pub const FILES: &str = "Files";
pub const OBJECTS: &str = "Objects";
pub const TEXTS: &str = "Texts";
pub const FILE_NAME: &str = "FileName";

// Object envelope
pub const TYPE: &str = "Type";
pub const CATEGORY: &str = "Category";
pub const PROPERTIES: &str = "Properties";
pub const ASSET_REF: &str = "AssetRef";

// Object types and categories
pub const ASSET_TYPE: &str = "Asset";
pub const IMAGE_CATEGORY: &str = "Image";
pub const ENTITY: &str = "Entity";
pub const DIALOGUE: &str = "Dialogue";
pub const DIALOGUE_FRAGMENT: &str = "DialogueFragment";
pub const FLOW_FRAGMENT: &str = "FlowFragment";

// Object properties
pub const ID: &str = "Id";
pub const DISPLAY_NAME: &str = "DisplayName";
pub const PREVIEW_IMAGE: &str = "PreviewImage";
pub const ASSET: &str = "Asset";
pub const SIZE: &str = "Size";
pub const WIDTH: &str = "w";
pub const HEIGHT: &str = "h";
pub const PARENT: &str = "Parent";
pub const TEXT: &str = "Text";
pub const SPEAKER: &str = "Speaker";
pub const ATTACHMENTS: &str = "Attachments";
pub const OUTPUT_PINS: &str = "OutputPins";
pub const CONNECTIONS: &str = "Connections";
pub const TARGET: &str = "Target";

/// Object types the parser understands.
///
/// Anything else in an objects file is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Image,
    Entity,
    Dialogue,
    DialogueFragment,
    FlowFragment,
}

impl ObjectKind {
    /// Classify an object by its `Type` and optional `Category`.
    pub fn classify(object_type: &str, category: Option<&str>) -> Option<Self> {
        match (object_type, category) {
            (ASSET_TYPE, Some(IMAGE_CATEGORY)) => Some(ObjectKind::Image),
            (ENTITY, _) => Some(ObjectKind::Entity),
            (DIALOGUE, _) => Some(ObjectKind::Dialogue),
            (DIALOGUE_FRAGMENT, _) => Some(ObjectKind::DialogueFragment),
            (FLOW_FRAGMENT, _) => Some(ObjectKind::FlowFragment),
            _ => None,
        }
    }
}
