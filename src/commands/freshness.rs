//! `mdtriage freshness` - per-file freshness indicators

use std::path::Path;

use chrono::Utc;

use crate::cli::{Cli, OutputFormat};
use mdtriage_core::config::TriageConfig;
use mdtriage_core::error::Result;
use mdtriage_core::{pipeline, report};

pub fn execute(cli: &Cli, root: &Path, config: &TriageConfig) -> Result<()> {
    let files = pipeline::analyze(root, config)?;
    let indicators = report::freshness_map(&files, Utc::now());

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&indicators)?);
        }
        OutputFormat::Human => {
            print!("{}", report::render_freshness(&indicators));
        }
    }

    Ok(())
}
