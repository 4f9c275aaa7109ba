//! Output writers for a resolved project
//!
//! - [`write_document`] emits the single JSON document consumed by the runtime
//! - [`StoryDatabase`] materializes the normalized relational store

mod database;
mod document;

pub use database::{MaterializeStats, StoryDatabase};
pub use document::{to_document, write_document};
