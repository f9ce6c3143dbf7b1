//! `mdtriage classify` - classify every file and print the results

use std::path::Path;

use crate::cli::{Cli, OutputFormat};
use mdtriage_core::config::TriageConfig;
use mdtriage_core::error::Result;
use mdtriage_core::pipeline;

pub fn execute(cli: &Cli, root: &Path, config: &TriageConfig) -> Result<()> {
    let files = pipeline::analyze(root, config)?;

    match cli.format {
        OutputFormat::Json => {
            let output: Vec<_> = files
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "file": f.filename(),
                        "category": f.classification.category,
                        "content_type": f.classification.content_type,
                        "preservation_priority": f.classification.preservation_priority,
                        "confidence": f.classification.confidence_score,
                        "word_count": f.metadata.word_count,
                        "topics": f.metadata.key_topics,
                        "notes": f.classification.processing_notes,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            for f in &files {
                println!(
                    "{}: {} / {} (priority {}, confidence {:.2})",
                    f.filename(),
                    f.classification.category.as_str(),
                    f.classification.content_type.as_str(),
                    f.classification.preservation_priority,
                    f.classification.confidence_score,
                );
            }
            if !cli.quiet {
                eprintln!("{} files classified", files.len());
            }
        }
    }

    Ok(())
}
