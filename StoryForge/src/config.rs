//! Conversion options and the optional `storyforge.toml` project config
//!
//! Options come from three places, later ones winning: built-in defaults,
//! a `storyforge.toml` in the project directory, and explicit CLI flags.
//!
//! ```toml
//! [output]
//! json = "build/data.json"
//! database = "build/story.db"
//! write_database = true
//! ```
//!
//! Relative paths in the config file are resolved against the project
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Config file looked up in the project directory
pub const CONFIG_FILE: &str = "storyforge.toml";
/// Default JSON document path
pub const DEFAULT_OUTPUT_FILE: &str = "data.json";
/// Default database path
pub const DEFAULT_DATABASE_FILE: &str = "story.db";

fn default_json() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_FILE)
}

fn default_true() -> bool {
    true
}

/// Contents of `storyforge.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub output: OutputSettings,
}

/// `[output]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_json")]
    pub json: PathBuf,
    #[serde(default = "default_database")]
    pub database: PathBuf,
    #[serde(default = "default_true")]
    pub write_database: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            json: default_json(),
            database: default_database(),
            write_database: true,
        }
    }
}

impl ProjectConfig {
    /// Load `storyforge.toml` from a project directory, if there is one.
    ///
    /// # Errors
    /// Returns `Config` if the file exists but is not valid TOML for this
    /// layout, or `Read` if it cannot be read.
    pub fn load(project_dir: &Path) -> Result<Option<Self>> {
        let path = project_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|source| Error::Read {
            path: path.clone(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| Error::Config {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(Some(config))
    }
}

/// Options for a conversion run
///
/// # Example
///
/// ```
/// use storyforge::ConvertOptions;
///
/// let options = ConvertOptions::new()
///     .with_output_path("assets/data.json")
///     .without_database();
/// assert!(options.database_path.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Where the JSON document is written
    pub output_path: PathBuf,
    /// Where the relational store is written; `None` skips it
    pub database_path: Option<PathBuf>,
    /// Pretty-print the JSON document
    pub pretty: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvertOptions {
    /// Defaults: `data.json`, `story.db`, pretty-printed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output_path: default_json(),
            database_path: Some(default_database()),
            pretty: true,
        }
    }

    /// Options taken from a project config, with paths resolved against
    /// `project_dir`.
    #[must_use]
    pub fn from_config(config: &ProjectConfig, project_dir: &Path) -> Self {
        let output = &config.output;
        Self {
            output_path: project_dir.join(&output.json),
            database_path: output
                .write_database
                .then(|| project_dir.join(&output.database)),
            pretty: true,
        }
    }

    /// Set the JSON document path.
    #[must_use]
    pub fn with_output_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the database path.
    #[must_use]
    pub fn with_database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Skip the relational store.
    #[must_use]
    pub fn without_database(mut self) -> Self {
        self.database_path = None;
        self
    }

    /// Set whether the JSON document is pretty-printed.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}
