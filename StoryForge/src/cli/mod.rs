//! StoryForge CLI - convert a dialogue project export

pub mod progress;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use crate::config::{ConvertOptions, ProjectConfig};
use crate::convert::convert_with_progress;

#[derive(Parser)]
#[command(name = "storyforge")]
#[command(about = "StoryForge: convert dialogue project exports to JSON and SQLite", long_about = None)]
#[command(version)]
struct Cli {
    /// Project directory containing manifest.json (defaults to the current directory)
    directory: Option<PathBuf>,

    /// JSON document to write (default: data.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Story database to write (default: story.db)
    #[arg(long, conflicts_with = "no_database")]
    database: Option<PathBuf>,

    /// Only write the JSON document
    #[arg(long)]
    no_database: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Build options: defaults, then `storyforge.toml`, then flags.
    fn options(&self, directory: &std::path::Path) -> anyhow::Result<ConvertOptions> {
        let mut options = match ProjectConfig::load(directory)? {
            Some(config) => ConvertOptions::from_config(&config, directory),
            None => ConvertOptions::new(),
        };

        if let Some(output) = &self.output {
            options = options.with_output_path(output);
        }
        if let Some(database) = &self.database {
            options = options.with_database_path(database);
        }
        if self.no_database {
            options = options.without_database();
        }
        Ok(options)
    }
}

/// Run the StoryForge CLI
pub fn run_cli() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let directory = match &cli.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let options = cli.options(&directory)?;

    let started = Instant::now();
    let total = if options.database_path.is_some() { 4 } else { 3 };
    let summary = if cli.quiet {
        convert_with_progress(&directory, &options, &|_| {})?
    } else {
        convert_with_progress(&directory, &options, &|phase| {
            progress::print_phase(phase, total);
        })?
    };

    if !cli.quiet {
        progress::print_summary(&summary);
        progress::print_done(started.elapsed());
    }
    Ok(())
}
