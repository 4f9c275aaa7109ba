//! Objects file parsing
//!
//! An objects file holds a flat `Objects` array of typed export objects.
//! Each object is classified by `Type`/`Category` and handed to the matching
//! extractor; unrecognised objects are skipped.

use std::fs;
use std::path::Path;

use serde_json::Value;

use super::json::{
    as_id, lookup, optional_reference, read_json, require, require_array, require_number,
    require_id, require_str,
};
use crate::error::{Error, Result};
use crate::project::{Dialogue, Entity, Fragment, ImageAsset, Project};
use crate::schema::{self, ObjectKind};
use crate::utils::{data_uri, image_subtype, resolve_in_project};

/// Counts of objects taken from one objects file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectStats {
    pub images: usize,
    pub entities: usize,
    pub dialogues: usize,
    pub fragments: usize,
    /// Objects whose type/category is not converted
    pub skipped: usize,
}

/// Parse an objects file into `project`.
///
/// `root` is the project directory that asset references are relative to.
///
/// # Errors
/// Fails on a missing or malformed file, a recognised object lacking a
/// required field, or an image file that cannot be read.
pub fn parse_objects_file(
    root: &Path,
    path: &Path,
    project: &mut Project,
) -> Result<ObjectStats> {
    let data = read_json(path)?;
    let objects = require_array(&data, &[schema::OBJECTS], path)?;

    let mut stats = ObjectStats::default();
    for object in objects {
        let object_type = object.get(schema::TYPE).and_then(Value::as_str).unwrap_or("");
        let category = object.get(schema::CATEGORY).and_then(Value::as_str);

        match ObjectKind::classify(object_type, category) {
            Some(ObjectKind::Image) => {
                project.insert_image(parse_image(root, path, object)?);
                stats.images += 1;
            }
            Some(ObjectKind::Entity) => {
                project.insert_entity(parse_entity(path, object)?);
                stats.entities += 1;
            }
            Some(ObjectKind::Dialogue) => {
                project.insert_dialogue(parse_dialogue(path, object)?);
                stats.dialogues += 1;
            }
            Some(ObjectKind::DialogueFragment | ObjectKind::FlowFragment) => {
                let (id, fragment) = parse_fragment(path, object)?;
                project.insert_fragment(id, fragment);
                stats.fragments += 1;
            }
            None => stats.skipped += 1,
        }
    }

    tracing::debug!(
        "Parsed {}: {} images, {} entities, {} dialogues, {} fragments, {} skipped",
        path.display(),
        stats.images,
        stats.entities,
        stats.dialogues,
        stats.fragments,
        stats.skipped
    );
    Ok(stats)
}

fn parse_image(root: &Path, path: &Path, object: &Value) -> Result<ImageAsset> {
    let asset_ref = require_str(object, &[schema::ASSET_REF], path)?;
    let image_path = resolve_in_project(root, asset_ref);

    let id = require_id(object, &[schema::PROPERTIES, schema::ID], path)?;
    let width = require_number(object, &[schema::PROPERTIES, schema::SIZE, schema::WIDTH], path)?;
    let height =
        require_number(object, &[schema::PROPERTIES, schema::SIZE, schema::HEIGHT], path)?;

    let bytes = fs::read(&image_path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::AssetNotFound { path: image_path.clone() }
        } else {
            Error::Read {
                path: image_path.clone(),
                source,
            }
        }
    })?;

    Ok(ImageAsset {
        id,
        width,
        height,
        uri: data_uri(&image_subtype(&image_path), &bytes),
    })
}

fn parse_entity(path: &Path, object: &Value) -> Result<Entity> {
    Ok(Entity {
        id: require_id(object, &[schema::PROPERTIES, schema::ID], path)?,
        name: require_id(object, &[schema::PROPERTIES, schema::DISPLAY_NAME], path)?,
        preview: require_id(
            object,
            &[schema::PROPERTIES, schema::PREVIEW_IMAGE, schema::ASSET],
            path,
        )?,
    })
}

fn parse_dialogue(path: &Path, object: &Value) -> Result<Dialogue> {
    Ok(Dialogue::new(
        require_id(object, &[schema::PROPERTIES, schema::ID], path)?,
        require_id(object, &[schema::PROPERTIES, schema::DISPLAY_NAME], path)?,
    ))
}

fn parse_fragment(path: &Path, object: &Value) -> Result<(String, Fragment)> {
    let props = require(object, &[schema::PROPERTIES], path)?;
    let id = require_id(props, &[schema::ID], path)?;

    let attachments = props
        .get(schema::ATTACHMENTS)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(as_id).collect());

    let fragment = Fragment {
        dialogue: require_id(props, &[schema::PARENT], path)?,
        text: require_id(props, &[schema::TEXT], path)?,
        outputs: output_targets(props),
        inputs: Vec::new(),
        speaker: optional_reference(props, &[schema::SPEAKER]),
        attachments,
        speaker_inferred: false,
    };
    Ok((id, fragment))
}

/// Targets of every connection on every output pin, in declaration order
fn output_targets(props: &Value) -> Vec<String> {
    let Some(pins) = props.get(schema::OUTPUT_PINS).and_then(Value::as_array) else {
        return Vec::new();
    };

    pins.iter()
        .filter_map(|pin| pin.get(schema::CONNECTIONS).and_then(Value::as_array))
        .flatten()
        .filter_map(|connection| lookup(connection, &[schema::TARGET]).and_then(as_id))
        .collect()
}
