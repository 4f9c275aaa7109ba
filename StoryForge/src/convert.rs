//! End-to-end conversion pipeline
//!
//! parse -> resolve -> JSON document -> relational store

use std::path::Path;

use crate::config::ConvertOptions;
use crate::error::Result;
use crate::export::{MaterializeStats, StoryDatabase, write_document};
use crate::parser::parse_project;
use crate::project::{Project, ResolveStats};

/// Phases reported while converting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertPhase {
    ReadingProject,
    ResolvingGraph,
    WritingDocument,
    WritingDatabase,
}

impl ConvertPhase {
    /// Returns a display-friendly description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            ConvertPhase::ReadingProject => "Reading project",
            ConvertPhase::ResolvingGraph => "Resolving fragment graph",
            ConvertPhase::WritingDocument => "Writing JSON document",
            ConvertPhase::WritingDatabase => "Writing story database",
        }
    }
}

/// Progress callback invoked at the start of each phase
pub type ConvertProgressCallback<'a> = &'a dyn Fn(ConvertPhase);

/// What a conversion run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub project: String,
    pub images: usize,
    pub entities: usize,
    pub localization_keys: usize,
    pub dialogues: usize,
    pub fragments: usize,
    pub graph: ResolveStats,
    /// `None` when the database was not written
    pub database: Option<MaterializeStats>,
}

impl ConversionSummary {
    fn from_project(project: &Project, graph: ResolveStats) -> Self {
        Self {
            project: project.project.clone(),
            images: project.images.len(),
            entities: project.entities.len(),
            localization_keys: project.localization.len(),
            dialogues: project.dialogues.len(),
            fragments: project.fragments.len(),
            graph,
            database: None,
        }
    }
}

/// Convert the project export in `project_dir`.
///
/// # Errors
/// Any input error aborts before output is written. A reference-integrity
/// error during the database phase is returned after the JSON document has
/// already been written.
pub fn convert<P: AsRef<Path>>(
    project_dir: P,
    options: &ConvertOptions,
) -> Result<ConversionSummary> {
    convert_with_progress(project_dir, options, &|_| {})
}

/// Convert with a progress callback.
pub fn convert_with_progress<P: AsRef<Path>>(
    project_dir: P,
    options: &ConvertOptions,
    progress: ConvertProgressCallback,
) -> Result<ConversionSummary> {
    let project_dir = project_dir.as_ref();

    progress(ConvertPhase::ReadingProject);
    let mut project = parse_project(project_dir)?;

    progress(ConvertPhase::ResolvingGraph);
    let graph = project.resolve();
    let mut summary = ConversionSummary::from_project(&project, graph);

    progress(ConvertPhase::WritingDocument);
    write_document(&project, &options.output_path, options.pretty)?;

    if let Some(database_path) = &options.database_path {
        progress(ConvertPhase::WritingDatabase);
        let mut db = StoryDatabase::open(database_path)?;
        summary.database = Some(db.materialize(&project)?);
    }

    tracing::info!(
        "Converted '{}': {} dialogues, {} fragments, {} entities, {} images",
        summary.project,
        summary.dialogues,
        summary.fragments,
        summary.entities,
        summary.images
    );
    Ok(summary)
}
