//! The read-only input unit handed from discovery to the pipeline

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// One discovered documentation file.
///
/// Created once per discovered path and never mutated afterwards. Text is
/// loaded lazily by the reader and cached here so every downstream stage
/// sees the same bytes.
#[derive(Debug, Clone)]
pub struct FileRecord {
    path: PathBuf,
    filename: String,
    /// None until the reader has been asked for this file's text
    text: Option<String>,
    modified: Option<DateTime<Utc>>,
    created: Option<DateTime<Utc>>,
}

impl FileRecord {
    pub fn new(path: PathBuf) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (modified, created) = match std::fs::metadata(&path) {
            Ok(meta) => (
                meta.modified().ok().map(DateTime::<Utc>::from),
                meta.created().ok().map(DateTime::<Utc>::from),
            ),
            Err(_) => (None, None),
        };

        Self {
            path,
            filename,
            text: None,
            modified,
            created,
        }
    }

    /// Construct a record with known text and an explicit modify time.
    /// Used by tests and by callers that already hold the content.
    pub fn with_text(
        path: PathBuf,
        text: String,
        modified: Option<DateTime<Utc>>,
    ) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            filename,
            text: Some(text),
            modified,
            created: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Cached text, if the reader has loaded it
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: String) {
        self.text = Some(text);
    }

    /// Filesystem modify time
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    /// Filesystem creation time, where the platform reports one
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_path() {
        let record = FileRecord::with_text(
            PathBuf::from("/docs/TASK_1_COMPLETE.md"),
            String::new(),
            None,
        );
        assert_eq!(record.filename(), "TASK_1_COMPLETE.md");
    }

    #[test]
    fn test_text_starts_unloaded() {
        let record = FileRecord::new(PathBuf::from("/nonexistent/doc.md"));
        assert!(record.text().is_none());
    }
}
