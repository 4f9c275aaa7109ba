//! JSON document output
//!
//! The document mirrors the resolved [`Project`]: every parsed fragment is
//! included, even ones the database leaves out.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::project::Project;

/// Serialize a project to a JSON string.
pub fn to_document(project: &Project, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(project)?
    } else {
        serde_json::to_string(project)?
    };
    Ok(json)
}

/// Write the JSON document for a project, creating parent directories.
///
/// # Errors
/// Returns an error if serialization or writing fails.
pub fn write_document<P: AsRef<Path>>(project: &Project, path: P, pretty: bool) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, to_document(project, pretty)?)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}
