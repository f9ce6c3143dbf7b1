//! `mdtriage groups` - preview the consolidation groups

use std::path::Path;

use crate::cli::{Cli, OutputFormat};
use mdtriage_core::config::TriageConfig;
use mdtriage_core::error::Result;
use mdtriage_core::{grouping, pipeline};

pub fn execute(cli: &Cli, root: &Path, config: &TriageConfig) -> Result<()> {
    let files = pipeline::analyze(root, config)?;
    let groups = grouping::identify_groups(&files);

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        OutputFormat::Human => {
            for group in &groups {
                println!(
                    "{} [{}] -> {} ({} files)",
                    group.group_id,
                    group.strategy,
                    group.output_filename,
                    group.total_files(),
                );
                println!("  primary: {}", group.primary_file);
                for related in &group.related_files {
                    println!("  related: {related}");
                }
            }
            if !cli.quiet {
                eprintln!("{} groups", groups.len());
            }
        }
    }

    Ok(())
}
