//! Parsers for the authoring tool's JSON export
//!
//! - [`parse_project`] reads `manifest.json` and every package it lists
//! - [`parse_objects_file`] extracts images, entities, dialogues and fragments
//! - [`parse_localization_file`] flattens a localization file
//!
//! All parsers fail fast: the first missing file, malformed document or
//! missing required field aborts the run.

pub mod json;
mod localization;
mod manifest;
mod objects;

pub use localization::{flatten_variants, parse_localization_file};
pub use manifest::{load_manifest, parse_project};
pub use objects::{ObjectStats, parse_objects_file};
