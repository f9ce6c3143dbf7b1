//! `mdtriage run` - the full reorganization

use std::path::Path;
use std::time::Instant;

use serde::Serialize;

use crate::cli::{Cli, OutputFormat};
use mdtriage_core::config::TriageConfig;
use mdtriage_core::error::Result;
use mdtriage_core::pipeline::{self, RunOptions};

/// JSON summary of one pipeline run
#[derive(Serialize)]
struct RunSummary<'a> {
    dry_run: bool,
    files: usize,
    groups: usize,
    merged_documents: usize,
    archive_planned: usize,
    written: Vec<String>,
    warnings: &'a [String],
    errors: &'a [String],
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    cli: &Cli,
    root: &Path,
    mut config: TriageConfig,
    dry_run: bool,
    no_archive: bool,
    output_dir: Option<String>,
    start: Instant,
) -> Result<()> {
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }

    let options = RunOptions {
        dry_run,
        archive: !no_archive,
    };
    let outcome = pipeline::run(root, &config, &options)?;

    if cli.verbose {
        eprintln!("pipeline: {:?}", start.elapsed());
    }

    match cli.format {
        OutputFormat::Json => {
            let summary = RunSummary {
                dry_run,
                files: outcome.files.len(),
                groups: outcome.groups.len(),
                merged_documents: outcome.merges.iter().filter(|m| !m.is_empty()).count(),
                archive_planned: outcome.archive_plan.len(),
                written: outcome
                    .written
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect(),
                warnings: &outcome.log.warnings,
                errors: &outcome.log.errors,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                println!(
                    "{} files -> {} groups -> {} documents; {} archive candidates",
                    outcome.files.len(),
                    outcome.groups.len(),
                    outcome.merges.iter().filter(|m| !m.is_empty()).count(),
                    outcome.archive_plan.len(),
                );
                if dry_run {
                    println!("dry run: nothing written");
                } else {
                    for path in &outcome.written {
                        println!("wrote {}", path.display());
                    }
                }
                for warning in &outcome.log.warnings {
                    println!("warning: {warning}");
                }
            }
        }
    }

    Ok(())
}
