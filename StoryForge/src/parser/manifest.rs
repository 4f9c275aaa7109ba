//! Manifest-driven project loading
//!
//! The manifest names the project and lists packages. Each package points to
//! one objects file and one localization file, both relative to the project
//! root. Packages are parsed in manifest order into a single [`Project`].

use std::path::Path;

use serde_json::Value;

use super::json::{read_json, require_array, require_id, require_str};
use super::localization::parse_localization_file;
use super::objects::{ObjectStats, parse_objects_file};
use crate::error::Result;
use crate::project::Project;
use crate::schema;
use crate::utils::resolve_in_project;

/// Parse every package declared by `<root>/manifest.json`.
///
/// The returned project has not been resolved yet.
///
/// # Errors
/// Fails on the first missing or malformed manifest, objects, localization
/// or image file.
pub fn parse_project<P: AsRef<Path>>(root: P) -> Result<Project> {
    let mut project = Project::new();
    load_manifest(root.as_ref(), &mut project)?;
    Ok(project)
}

/// Parse the manifest at `root` into an existing project.
pub fn load_manifest(root: &Path, project: &mut Project) -> Result<ObjectStats> {
    let manifest_path = root.join(schema::MANIFEST_FILE);
    let manifest = read_json(&manifest_path)?;

    let name = require_id(&manifest, &[schema::PROJECT, schema::NAME], &manifest_path)?;
    tracing::info!("Loading project '{}' from {}", name, root.display());
    project.set_name(name);

    let packages = require_array(&manifest, &[schema::PACKAGES], &manifest_path)?;
    let mut totals = ObjectStats::default();
    for (index, package) in packages.iter().enumerate() {
        let stats = parse_package(root, &manifest_path, package, project)?;
        tracing::debug!("Package {} parsed", index + 1);
        totals.images += stats.images;
        totals.entities += stats.entities;
        totals.dialogues += stats.dialogues;
        totals.fragments += stats.fragments;
        totals.skipped += stats.skipped;
    }

    if totals.skipped > 0 {
        tracing::debug!("Skipped {} objects of unconverted types", totals.skipped);
    }
    Ok(totals)
}

fn parse_package(
    root: &Path,
    manifest_path: &Path,
    package: &Value,
    project: &mut Project,
) -> Result<ObjectStats> {
    let objects_file = require_str(
        package,
        &[schema::FILES, schema::OBJECTS, schema::FILE_NAME],
        manifest_path,
    )?;
    let texts_file = require_str(
        package,
        &[schema::FILES, schema::TEXTS, schema::FILE_NAME],
        manifest_path,
    )?;

    let stats = parse_objects_file(root, &resolve_in_project(root, objects_file), project)?;
    let table = parse_localization_file(&resolve_in_project(root, texts_file))?;
    project.merge_localization(table);
    Ok(stats)
}
