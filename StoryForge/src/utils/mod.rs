//! Utility functions

pub mod path;

pub use path::{data_uri, image_subtype, resolve_in_project};
