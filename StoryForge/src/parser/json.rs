//! JSON reading and field lookup shared by the export parsers

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::{Number, Value};

use crate::error::{Error, Result};
use crate::schema;

/// Read and decode a JSON file.
///
/// # Errors
/// Returns `FileNotFound` if the file does not exist, `Read` for other IO
/// failures and `InvalidJson` if the content cannot be decoded.
pub fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&content).map_err(|source| Error::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Follow a chain of object keys.
pub fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| current.get(*key))
}

/// Read an id that the export may write as a string or an integer.
pub fn as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }
}

/// Look up a field that must be present.
///
/// # Errors
/// Returns `MissingField` naming the dotted key path and the source file.
pub fn require<'a>(value: &'a Value, keys: &[&str], path: &Path) -> Result<&'a Value> {
    lookup(value, keys).ok_or_else(|| missing(keys, path))
}

/// Look up a required id or reference.
pub fn require_id(value: &Value, keys: &[&str], path: &Path) -> Result<String> {
    require(value, keys, path).and_then(|v| as_id(v).ok_or_else(|| missing(keys, path)))
}

/// Look up a required string.
pub fn require_str<'a>(value: &'a Value, keys: &[&str], path: &Path) -> Result<&'a str> {
    require(value, keys, path).and_then(|v| v.as_str().ok_or_else(|| missing(keys, path)))
}

/// Look up a required number, integer or float.
pub fn require_number(value: &Value, keys: &[&str], path: &Path) -> Result<Number> {
    require(value, keys, path).and_then(|v| match v {
        Value::Number(n) => Ok(n.clone()),
        _ => Err(missing(keys, path)),
    })
}

/// Look up a required array.
pub fn require_array<'a>(value: &'a Value, keys: &[&str], path: &Path) -> Result<&'a Vec<Value>> {
    require(value, keys, path).and_then(|v| v.as_array().ok_or_else(|| missing(keys, path)))
}

/// Look up a reference that may be unset.
///
/// `null`, the empty string and the export's null id all count as unset.
pub fn optional_reference(value: &Value, keys: &[&str]) -> Option<String> {
    lookup(value, keys)
        .and_then(as_id)
        .filter(|id| !id.is_empty() && id != schema::NULL_ID)
}

fn missing(keys: &[&str], path: &Path) -> Error {
    Error::MissingField {
        path: path.to_path_buf(),
        field: keys.join("."),
    }
}
