//! # StoryForge
//!
//! Converts a dialogue-authoring tool's JSON export into a form a game or
//! visual-novel runtime can load directly.
//!
//! ## Pipeline
//!
//! - **Parse** - `manifest.json` lists packages; each package has an objects
//!   file (images, entities, dialogues, dialogue/flow fragments) and a
//!   localization file
//! - **Resolve** - prune dangling fragment edges, derive input edges, infer
//!   speakers of connector nodes from their direct predecessors
//! - **Export** - one JSON document plus a normalized SQLite database
//!
//! ## Quick Start
//!
//! ```no_run
//! use storyforge::{ConvertOptions, convert};
//!
//! let options = ConvertOptions::new()
//!     .with_output_path("assets/data.json")
//!     .with_database_path("assets/story.db");
//! let summary = convert("path/to/export", &options)?;
//! println!("{} fragments", summary.fragments);
//! # Ok::<(), storyforge::Error>(())
//! ```
//!
//! ### Working with the model directly
//!
//! ```no_run
//! use storyforge::prelude::*;
//!
//! let mut project = parse_project("path/to/export")?;
//! project.resolve();
//! for (id, fragment) in &project.fragments {
//!     println!("{id}: {:?} says {}", fragment.speaker, fragment.text);
//! }
//! # Ok::<(), storyforge::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `storyforge` command-line binary

pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod parser;
pub mod project;
pub mod schema;
pub mod utils;

// Re-exports for convenience
pub use config::{ConvertOptions, ProjectConfig};
pub use convert::{ConversionSummary, convert, convert_with_progress};
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{ConvertOptions, ProjectConfig};
    pub use crate::convert::{ConversionSummary, ConvertPhase, convert, convert_with_progress};
    pub use crate::error::{Error, ReferenceKind, Result};
    pub use crate::export::{StoryDatabase, write_document};
    pub use crate::parser::parse_project;
    pub use crate::project::{Dialogue, Entity, Fragment, ImageAsset, Project};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
