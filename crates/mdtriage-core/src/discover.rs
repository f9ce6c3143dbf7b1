//! Markdown file discovery under a documentation root

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::TriageConfig;
use crate::error::{Result, TriageError};

/// Walk the root and collect documentation files by extension.
///
/// Hidden directories and the tool's own output/archive directories are
/// skipped so a second run does not re-ingest its own output.
pub fn discover_files(root: &Path, config: &TriageConfig) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(TriageError::RootNotFound {
            root: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(TriageError::RootNotADirectory {
            root: root.to_path_buf(),
        });
    }

    let skip_dirs = [config.output_dir.as_str(), config.archive_dir.as_str()];

    let mut paths = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            if e.file_type().is_dir() {
                !name.starts_with('.') && !skip_dirs.contains(&name.as_ref())
            } else {
                true
            }
        })
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let has_doc_extension = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| config.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false);

        if has_doc_extension {
            paths.push(entry.path().to_path_buf());
        }
    }

    paths.sort();
    debug!(count = paths.len(), root = %root.display(), "discovered documentation files");
    Ok(paths)
}
