//! `mdtriage outdated` - stale, superseded, removable, archivable

use std::path::Path;

use chrono::Utc;

use crate::cli::{Cli, OutputFormat};
use mdtriage_core::config::TriageConfig;
use mdtriage_core::error::Result;
use mdtriage_core::{outdated, pipeline, report};

pub fn execute(cli: &Cli, root: &Path, config: &TriageConfig) -> Result<()> {
    let mut files = pipeline::analyze(root, config)?;
    let flags = outdated::detect(&mut files, config, Utc::now());

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&flags)?);
        }
        OutputFormat::Human => {
            print!("{}", report::render_outdated(&flags));
        }
    }

    Ok(())
}
