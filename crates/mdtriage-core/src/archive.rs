//! Archive planning and writing
//!
//! Routing a flagged file into an archive subdirectory used to be worth
//! two overlapping keyword cascades; here it is one ranked rule table
//! checked against the filename and the classification's processing notes.
//! The writer copies bytes into the archive tree and never deletes
//! sources; removal is a separate, explicitly-requested operation.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::classify::AnalyzedFile;
use crate::error::{Result, TriageError};
use crate::outdated::OutdatedReport;

/// Ranked routing table: first matching rule wins. Keywords are checked
/// against the lowercased filename first, then the processing notes.
const SUBDIR_RULES: &[(&str, &[&str])] = &[
    ("deprecated", &["deprecated", "obsolete", "legacy", "superseded", "discontinued"]),
    ("completed_tasks", &["complete", "task_", "phase_", "_done", "summary"]),
    ("old_setup", &["setup", "install", "config", "deploy", "environment"]),
    ("old_tests", &["test", "validation", "_qa", "verify"]),
    ("old_features", &["feature", "guide", "howto"]),
];
const DEFAULT_SUBDIR: &str = "misc";

/// One planned archival: where the file goes and the header it gets.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub source: PathBuf,
    pub subdirectory: String,
    pub target_filename: String,
    pub header: String,
}

impl ArchiveEntry {
    pub fn target_path(&self, archive_root: &Path) -> PathBuf {
        archive_root.join(&self.subdirectory).join(&self.target_filename)
    }
}

/// Plan archival for every archive-candidate file. Pure computation; the
/// filesystem is untouched until [`write_archive`] runs.
pub fn plan_archive(
    files: &[AnalyzedFile],
    report: &OutdatedReport,
    now: DateTime<Utc>,
) -> Vec<ArchiveEntry> {
    let mut taken: HashSet<(String, String)> = HashSet::new();
    let mut entries = Vec::new();

    for file in files {
        let Some(reason) = report
            .archive_candidates
            .iter()
            .find(|f| f.filename == file.filename())
            .map(|f| f.reason.clone())
        else {
            continue;
        };

        let subdirectory = route_subdirectory(file);
        let target_filename =
            resolve_conflict(&subdirectory, file.filename(), &mut taken);
        debug!(
            file = file.filename(),
            subdir = %subdirectory,
            target = %target_filename,
            "planned archival"
        );

        entries.push(ArchiveEntry {
            source: file.record.path().to_path_buf(),
            subdirectory,
            target_filename,
            header: archival_header(file, &reason, now),
        });
    }

    entries
}

/// First matching rule in the ranked table decides the subdirectory.
pub fn route_subdirectory(file: &AnalyzedFile) -> String {
    let filename = file.filename().to_lowercase();
    let notes = file.classification.processing_notes.join(" ").to_lowercase();

    for (subdir, keywords) in SUBDIR_RULES {
        if keywords.iter().any(|k| filename.contains(k) || notes.contains(k)) {
            return (*subdir).to_string();
        }
    }
    DEFAULT_SUBDIR.to_string()
}

/// `name.md`, then `name_1.md`, `name_2.md`, ... within one subdirectory.
fn resolve_conflict(
    subdirectory: &str,
    filename: &str,
    taken: &mut HashSet<(String, String)>,
) -> String {
    let key = |name: &str| (subdirectory.to_string(), name.to_string());
    if taken.insert(key(filename)) {
        return filename.to_string();
    }

    let (stem, ext) = match filename.rsplit_once('.') {
        Some((s, e)) => (s.to_string(), format!(".{e}")),
        None => (filename.to_string(), String::new()),
    };
    let mut counter = 1;
    loop {
        let candidate = format!("{stem}_{counter}{ext}");
        if taken.insert(key(&candidate)) {
            return candidate;
        }
        counter += 1;
    }
}

/// Header block prepended to the archived copy.
fn archival_header(file: &AnalyzedFile, reason: &str, now: DateTime<Utc>) -> String {
    let modified = file
        .metadata
        .last_modified
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "<!--\nArchived: {archived}\nOriginal file: {name}\nLast modified: {modified}\n\
         Reason: {reason}\nCategory: {category}\n-->\n\n",
        archived = now.format("%Y-%m-%d"),
        name = file.filename(),
        category = file.classification.category.as_str(),
    )
}

/// Copy every planned entry into the archive tree, header first, and drop
/// a README index at the archive root. Sources stay in place.
pub fn write_archive(
    entries: &[ArchiveEntry],
    files: &[AnalyzedFile],
    archive_root: &Path,
) -> Result<Vec<PathBuf>> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let mut written = Vec::new();
    for entry in entries {
        let target = entry.target_path(archive_root);
        let Some(parent) = target.parent() else {
            continue;
        };
        fs::create_dir_all(parent)
            .map_err(|e| TriageError::io_operation("create archive dir", parent.display(), e))?;

        let text = files
            .iter()
            .find(|f| f.record.path() == entry.source)
            .and_then(|f| f.record.text());
        let Some(text) = text else {
            warn!(source = %entry.source.display(), "skipping unreadable archive source");
            continue;
        };

        fs::write(&target, format!("{}{}", entry.header, text))
            .map_err(|e| TriageError::io_operation("write archive file", target.display(), e))?;
        written.push(target);
    }

    let readme = archive_root.join("README.md");
    fs::write(&readme, archive_readme(entries))
        .map_err(|e| TriageError::io_operation("write archive index", readme.display(), e))?;

    Ok(written)
}

/// Archive index grouped by subdirectory.
fn archive_readme(entries: &[ArchiveEntry]) -> String {
    let mut subdirs: Vec<&str> = entries.iter().map(|e| e.subdirectory.as_str()).collect();
    subdirs.sort_unstable();
    subdirs.dedup();

    let mut out = String::from(
        "# Archived Documentation\n\nFiles moved here were flagged as outdated or \
         superseded. Originals are preserved verbatim below their archival headers.\n",
    );
    for subdir in subdirs {
        out.push_str(&format!("\n## {subdir}\n\n"));
        for entry in entries.iter().filter(|e| e.subdirectory == subdir) {
            out.push_str(&format!(
                "- [{name}]({subdir}/{name})\n",
                name = entry.target_filename
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outdated::test_support::{aged_file, now};

    #[test]
    fn test_routing_prefers_deprecated_over_setup() {
        // "deprecated" outranks the setup keywords also present in the name
        let file = aged_file(
            "DEPRECATED_SETUP_GUIDE.md",
            "# Old Setup\n\nlegacy install notes\n",
            400,
        );
        assert_eq!(route_subdirectory(&file), "deprecated");
    }

    #[test]
    fn test_routing_by_processing_notes() {
        let mut file = aged_file("notes.md", "plain prose with no markers\n", 400);
        file.classification.note("matched deprecated-content lexicon");
        assert_eq!(route_subdirectory(&file), "deprecated");
    }

    #[test]
    fn test_routing_default() {
        let file = aged_file("random_notes.md", "nothing special in here\n", 10);
        assert_eq!(route_subdirectory(&file), DEFAULT_SUBDIR);
    }

    #[test]
    fn test_conflicting_targets_get_suffixes() {
        let mut taken = HashSet::new();
        assert_eq!(resolve_conflict("misc", "notes.md", &mut taken), "notes.md");
        assert_eq!(resolve_conflict("misc", "notes.md", &mut taken), "notes_1.md");
        assert_eq!(resolve_conflict("misc", "notes.md", &mut taken), "notes_2.md");
        // Same name in a different subdirectory does not conflict
        assert_eq!(resolve_conflict("old_tests", "notes.md", &mut taken), "notes.md");
    }

    #[test]
    fn test_header_carries_reason_and_date() {
        let file = aged_file("TASK_9_COMPLETE.md", "# Task 9\n\nwrapped up\n", 400);
        let header = archival_header(&file, "Old completion summary (>1 year)", now());
        assert!(header.contains("Original file: TASK_9_COMPLETE.md"));
        assert!(header.contains("Reason: Old completion summary (>1 year)"));
        assert!(header.contains("Archived: 2025-06-15"));
    }

    #[test]
    fn test_write_archive_copies_and_indexes() {
        let dir = tempfile::tempdir().unwrap();
        let file = aged_file(
            "DEPRECATED_AUTH.md",
            "# Old Auth\n\nthe legacy cookie scheme\n",
            400,
        );
        let entries = vec![ArchiveEntry {
            source: file.record.path().to_path_buf(),
            subdirectory: "deprecated".to_string(),
            target_filename: "DEPRECATED_AUTH.md".to_string(),
            header: "<!-- archived -->\n\n".to_string(),
        }];

        let files = vec![file];
        let written = write_archive(&entries, &files, dir.path()).unwrap();
        assert_eq!(written.len(), 1);

        let copied = fs::read_to_string(&written[0]).unwrap();
        assert!(copied.starts_with("<!-- archived -->"));
        assert!(copied.contains("legacy cookie scheme"));

        let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
        assert!(readme.contains("DEPRECATED_AUTH.md"));
    }
}
