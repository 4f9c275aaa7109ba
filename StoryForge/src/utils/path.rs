//! Path utilities

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Extensions whose MIME subtype differs from the file extension
const SUBTYPE_ALIASES: &[(&str, &str)] = &[("jpg", "jpeg")];

/// Resolve a path from an export file relative to the project root.
///
/// Exports written on Windows use backslash separators.
pub fn resolve_in_project<P: AsRef<Path>>(root: P, relative: &str) -> PathBuf {
    let normalized = relative.replace('\\', "/");
    root.as_ref().join(normalized)
}

/// MIME image subtype for a file, derived from its lower-cased extension
pub fn image_subtype<P: AsRef<Path>>(path: P) -> String {
    let extension = path
        .as_ref()
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    SUBTYPE_ALIASES
        .iter()
        .find(|(from, _)| *from == extension)
        .map_or(extension.clone(), |(_, to)| (*to).to_string())
}

/// Encode bytes as `data:image/<subtype>;base64,<payload>`
pub fn data_uri(subtype: &str, bytes: &[u8]) -> String {
    format!("data:image/{subtype};base64,{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_subtype() {
        assert_eq!(image_subtype("art/portrait.png"), "png");
        assert_eq!(image_subtype("art/portrait.PNG"), "png");
        assert_eq!(image_subtype("art/portrait.jpg"), "jpeg");
        assert_eq!(image_subtype("art/portrait.JPG"), "jpeg");
        assert_eq!(image_subtype("art/portrait.jpeg"), "jpeg");
        assert_eq!(image_subtype("art/portrait"), "");
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(data_uri("png", b"abc"), "data:image/png;base64,YWJj");
        assert_eq!(data_uri("gif", b""), "data:image/gif;base64,");
    }

    #[test]
    fn test_resolve_in_project() {
        let path = resolve_in_project("/project", "Assets\\Images\\a.png");
        assert_eq!(path, PathBuf::from("/project/Assets/Images/a.png"));
    }
}
