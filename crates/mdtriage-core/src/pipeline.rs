//! One-shot pipeline orchestration
//!
//! discover -> read -> extract -> classify -> detect outdated -> group ->
//! merge -> cross-reference -> plan archive, all in memory; nothing
//! touches the filesystem until every merge result exists, so a run
//! either writes a consistent output set or writes nothing.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::archive::{self, ArchiveEntry};
use crate::classify::{self, AnalyzedFile, Classification};
use crate::config::TriageConfig;
use crate::discover;
use crate::error::{Result, TriageError};
use crate::file::FileRecord;
use crate::grouping::{self, ConsolidationGroup};
use crate::merge::{self, MergeResult};
use crate::metadata;
use crate::migration::{MigrationLog, OperationKind};
use crate::outdated::{self, FreshnessIndicator, OutdatedReport};
use crate::reader;
use crate::report;
use crate::xref::{self, CrossReferenceMap};

const LOG_FILENAME: &str = "MIGRATION_LOG.md";
const FRESHNESS_FILENAME: &str = "FRESHNESS.md";

/// Knobs for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Compute everything, write nothing
    pub dry_run: bool,
    /// Copy archive candidates into the archive tree
    pub archive: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            archive: true,
        }
    }
}

/// Everything a run computed, whether or not it was written.
#[derive(Debug)]
pub struct RunOutcome {
    pub files: Vec<AnalyzedFile>,
    pub outdated: OutdatedReport,
    pub groups: Vec<ConsolidationGroup>,
    pub merges: Vec<MergeResult>,
    pub xrefs: CrossReferenceMap,
    pub freshness: BTreeMap<String, FreshnessIndicator>,
    pub archive_plan: Vec<ArchiveEntry>,
    pub log: MigrationLog,
    pub written: Vec<PathBuf>,
}

/// Discover, read, and classify every documentation file under `root`.
/// Unreadable files stay in the set with a degenerate classification so
/// one bad input never hides the rest of the corpus.
#[instrument(skip(config))]
pub fn analyze(root: &Path, config: &TriageConfig) -> Result<Vec<AnalyzedFile>> {
    let paths = discover::discover_files(root, config)?;
    info!(count = paths.len(), "discovered documentation files");

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match reader::read_text(&path, config.fallback_encoding) {
            Ok(text) => {
                let mut record = FileRecord::new(path);
                record.set_text(text.clone());
                let mut meta = metadata::extract(&text, config.max_topics);
                if meta.last_modified.is_none() {
                    meta.last_modified = record.modified();
                }
                let classification = classify::classify(record.filename(), &meta, &text);
                debug!(
                    file = record.filename(),
                    category = classification.category.as_str(),
                    confidence = classification.confidence_score,
                    "classified"
                );
                files.push(AnalyzedFile {
                    record,
                    metadata: meta,
                    classification,
                });
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable file");
                let record = FileRecord::new(path);
                files.push(AnalyzedFile {
                    record,
                    metadata: metadata::ContentMetadata::default(),
                    classification: Classification::unreadable(&err.to_string()),
                });
            }
        }
    }
    Ok(files)
}

/// Run the full reorganization.
#[instrument(skip(config, options))]
pub fn run(root: &Path, config: &TriageConfig, options: &RunOptions) -> Result<RunOutcome> {
    let now = Utc::now();
    let mut log = MigrationLog::default();

    let mut files = analyze(root, config)?;
    for file in &files {
        if file.record.text().is_none() {
            log.warn(format!("unreadable file: {}", file.filename()));
        }
        log.record(
            OperationKind::Classify,
            file.filename(),
            None,
            format!(
                "{} ({:.2})",
                file.classification.category.as_str(),
                file.classification.confidence_score
            ),
            now,
        );
    }

    let outdated = outdated::detect(&mut files, config, now);
    let groups = grouping::identify_groups(&files);
    info!(groups = groups.len(), "identified consolidation groups");
    for group in &groups {
        log.record(
            OperationKind::Group,
            group.primary_file.clone(),
            Some(group.group_id.clone()),
            format!("{} files, {} strategy", group.total_files(), group.strategy),
            now,
        );
    }

    let mut merges = merge_all(&groups, &files, config, &mut log, now)?;

    // Cross-references run over the final document set only
    let documents: BTreeMap<String, String> = merges
        .iter()
        .filter(|m| !m.is_empty())
        .map(|m| (m.output_filename.clone(), m.text.clone()))
        .collect();
    let xrefs = xref::generate(&documents, &config.xref);

    for merged in &mut merges {
        let footer = report::render_xref_footer(&xrefs, &merged.output_filename);
        if !footer.is_empty() {
            merged.text.push_str(&footer);
        }
    }

    let freshness = report::freshness_map(&files, now);

    let archive_plan = if options.archive {
        plan_archival(&files, &outdated, &mut log, now)
    } else {
        Vec::new()
    };

    let written = if options.dry_run {
        info!("dry run, skipping all writes");
        Vec::new()
    } else {
        write_outputs(root, config, &merges, &archive_plan, &files, &freshness, &mut log)?
    };

    Ok(RunOutcome {
        files,
        outdated,
        groups,
        merges,
        xrefs,
        freshness,
        archive_plan,
        log,
        written,
    })
}

fn merge_all(
    groups: &[ConsolidationGroup],
    files: &[AnalyzedFile],
    config: &TriageConfig,
    log: &mut MigrationLog,
    now: DateTime<Utc>,
) -> Result<Vec<MergeResult>> {
    let mut merges = Vec::with_capacity(groups.len());
    for group in groups {
        let result = merge::merge_group(group, files, config)?;
        log.record(
            OperationKind::Merge,
            group.primary_file.clone(),
            Some(group.output_filename.clone()),
            format!(
                "{} strategy over {} files",
                group.strategy,
                result.sources.len()
            ),
            now,
        );
        for warning in &result.warnings {
            log.warn(warning.clone());
        }
        merges.push(result);
    }
    Ok(merges)
}

fn plan_archival(
    files: &[AnalyzedFile],
    outdated: &OutdatedReport,
    log: &mut MigrationLog,
    now: DateTime<Utc>,
) -> Vec<ArchiveEntry> {
    let plan = archive::plan_archive(files, outdated, now);
    for entry in &plan {
        log.record(
            OperationKind::Archive,
            entry.source.display().to_string(),
            Some(format!("{}/{}", entry.subdirectory, entry.target_filename)),
            "archive candidate",
            now,
        );
    }
    plan
}

/// The only writes in the pipeline, after every merge result exists.
fn write_outputs(
    root: &Path,
    config: &TriageConfig,
    merges: &[MergeResult],
    archive_plan: &[ArchiveEntry],
    files: &[AnalyzedFile],
    freshness: &BTreeMap<String, FreshnessIndicator>,
    log: &mut MigrationLog,
) -> Result<Vec<PathBuf>> {
    let now = Utc::now();
    let output_root = root.join(&config.output_dir);
    fs::create_dir_all(&output_root)
        .map_err(|e| TriageError::io_operation("create output dir", output_root.display(), e))?;

    let mut written = Vec::new();
    for merged in merges {
        if merged.is_empty() {
            log.record(
                OperationKind::Skip,
                merged.group_id.clone(),
                None,
                "empty merge result, nothing to write",
                now,
            );
            continue;
        }
        let target = output_root.join(&merged.output_filename);
        fs::write(&target, &merged.text)
            .map_err(|e| TriageError::io_operation("write consolidated file", target.display(), e))?;
        log.record(
            OperationKind::Write,
            merged.group_id.clone(),
            Some(target.display().to_string()),
            format!("{} bytes", merged.text.len()),
            now,
        );
        written.push(target);
    }

    if !archive_plan.is_empty() {
        let archive_root = root.join(&config.archive_dir);
        written.extend(archive::write_archive(archive_plan, files, &archive_root)?);
    }

    let freshness_path = output_root.join(FRESHNESS_FILENAME);
    fs::write(&freshness_path, report::render_freshness(freshness))
        .map_err(|e| TriageError::io_operation("write freshness report", freshness_path.display(), e))?;
    written.push(freshness_path);

    let log_path = output_root.join(LOG_FILENAME);
    fs::write(&log_path, log.render_markdown())
        .map_err(|e| TriageError::io_operation("write migration log", log_path.display(), e))?;
    written.push(log_path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn corpus(dir: &Path) {
        seed(
            dir,
            "TASK_1_COMPLETE.md",
            "# Task 1\n\nDate: 2024-01-15\n\nImplemented JWT tokens with bcrypt hashing.\n",
        );
        seed(
            dir,
            "TASK_2_COMPLETE.md",
            "# Task 2\n\nDate: 2024-02-01\n\nCompleted OAuth with bcrypt and salt.\n",
        );
        seed(
            dir,
            "SETUP_GUIDE.md",
            "# Setup\n\nInstall dependencies, configure the environment, deploy.\n",
        );
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        corpus(dir.path());

        let options = RunOptions {
            dry_run: true,
            archive: true,
        };
        let outcome = run(dir.path(), &TriageConfig::default(), &options).unwrap();

        assert!(outcome.written.is_empty());
        assert!(!outcome.merges.is_empty());
        assert!(!dir.path().join("consolidated").exists());
        assert!(!dir.path().join("archive").exists());
    }

    #[test]
    fn test_full_run_writes_consolidated_set() {
        let dir = tempfile::tempdir().unwrap();
        corpus(dir.path());

        let outcome = run(dir.path(), &TriageConfig::default(), &RunOptions::default()).unwrap();

        assert!(!outcome.written.is_empty());
        let output_root = dir.path().join("consolidated");
        assert!(output_root.join(LOG_FILENAME).exists());
        assert!(output_root.join(FRESHNESS_FILENAME).exists());

        // The two task files merge into one combined summary document
        let combined = outcome
            .merges
            .iter()
            .find(|m| m.sources.contains(&"TASK_1_COMPLETE.md".to_string()))
            .unwrap();
        assert!(combined.text.contains("JWT tokens"));
        assert!(combined.text.contains("OAuth"));
    }

    #[test]
    fn test_rerun_skips_own_output() {
        let dir = tempfile::tempdir().unwrap();
        corpus(dir.path());

        run(dir.path(), &TriageConfig::default(), &RunOptions::default()).unwrap();
        let second = run(dir.path(), &TriageConfig::default(), &RunOptions::default()).unwrap();

        // Discovery must not pick consolidated/ output back up
        assert!(second
            .files
            .iter()
            .all(|f| !f.record.path().starts_with(dir.path().join("consolidated"))));
    }

    #[test]
    fn test_missing_root_errors() {
        let err = run(
            Path::new("/nonexistent/mdtriage-root"),
            &TriageConfig::default(),
            &RunOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TriageError::RootNotFound { .. }));
    }
}
