//! Error types for `StoryForge`

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The kind of key a persisted row failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A localization key (entity/dialogue names, fragment text).
    Localization,
    /// An image asset key (entity previews).
    Asset,
    /// An entity key (dialogue speaker lists).
    Entity,
    /// A dialogue key (fragment owners).
    Dialogue,
    /// A fragment speaker.
    Speaker,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReferenceKind::Localization => "localization",
            ReferenceKind::Asset => "asset",
            ReferenceKind::Entity => "entity",
            ReferenceKind::Dialogue => "dialogue",
            ReferenceKind::Speaker => "speaker",
        };
        f.write_str(name)
    }
}

/// The error type for `StoryForge` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== Input Errors ====================
    /// A manifest, objects, or localization file does not exist.
    #[error("the file was not found: {}", path.display())]
    FileNotFound {
        /// The missing file.
        path: PathBuf,
    },

    /// A file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file being read.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// A file is not valid JSON.
    #[error("error decoding JSON in {}: {source}", path.display())]
    InvalidJson {
        /// The file being decoded.
        path: PathBuf,
        /// The decoder error.
        source: serde_json::Error,
    },

    /// A required field of a recognised object is absent or has the wrong shape.
    #[error("missing or malformed field '{field}' in {}", path.display())]
    MissingField {
        /// The file the object came from.
        path: PathBuf,
        /// Dotted path of the field, e.g. `Properties.Size.w`.
        field: String,
    },

    /// A binary image referenced by an asset object does not exist.
    #[error("image asset not found: {}", path.display())]
    AssetNotFound {
        /// The resolved image path.
        path: PathBuf,
    },

    /// The project config file could not be parsed.
    #[error("invalid config file {}: {source}", path.display())]
    Config {
        /// The config file.
        path: PathBuf,
        /// The TOML decoder error.
        source: toml::de::Error,
    },

    // ==================== Reference Integrity Errors ====================
    /// A row references a key that was never parsed.
    #[error("unresolved {kind} reference: {key}")]
    UnresolvedReference {
        /// What kind of key was expected.
        kind: ReferenceKind,
        /// The key that failed to resolve.
        key: String,
    },

    /// A fragment selected for the database has no declared or inferred speaker.
    #[error("fragment {fragment} has no speaker and cannot be stored")]
    MissingSpeaker {
        /// The fragment id.
        fragment: String,
    },

    // ==================== Output Errors ====================
    /// Database error from the story store.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error from writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for `StoryForge` operations.
pub type Result<T> = std::result::Result<T, Error>;
