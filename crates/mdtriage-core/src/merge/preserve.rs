//! Archive preservation: members are emitted verbatim, each behind an
//! archival metadata block and an explicit staleness warning. Historical
//! content is never rewritten.

use crate::classify::AnalyzedFile;
use crate::grouping::ConsolidationGroup;

use super::group_title;

pub fn merge(members: &[&AnalyzedFile], group: &ConsolidationGroup) -> String {
    let mut out = format!(
        "# {} (Archived)\n\n> **Warning**: the content below is preserved for \
         historical reference and may be outdated.\n",
        group_title(group)
    );

    for file in members {
        let modified = file
            .metadata
            .last_modified
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string());

        out.push_str(&format!(
            "\n---\n\n**Archived file**: {}\n**Last modified**: {}\n\
             **Word count**: {}\n**Preservation priority**: {}\n\n",
            file.filename(),
            modified,
            file.metadata.word_count,
            file.classification.preservation_priority,
        ));
        out.push_str(file.record.text().unwrap_or_default());
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Category;
    use crate::grouping::ConsolidationStrategy;
    use crate::outdated::test_support::{aged_file, undated_file};

    fn archive_group() -> ConsolidationGroup {
        ConsolidationGroup {
            group_id: "historical-archive-historical".to_string(),
            category: Category::HistoricalArchive,
            primary_file: "DEPRECATED_AUTH.md".to_string(),
            related_files: vec![],
            strategy: ConsolidationStrategy::ArchivePreserve,
            output_filename: "historical-archive-historical.md".to_string(),
        }
    }

    #[test]
    fn test_content_preserved_verbatim_with_banner() {
        let a = aged_file(
            "DEPRECATED_AUTH.md",
            "# Old Auth\n\nThe legacy session cookie scheme, kept for the record.\n",
            400,
        );
        let members = vec![&a];
        let text = merge(&members, &archive_group());

        assert!(text.contains("may be outdated"));
        assert!(text.contains("**Archived file**: DEPRECATED_AUTH.md"));
        assert!(text.contains("# Old Auth"));
        assert!(text.contains("legacy session cookie scheme"));
        assert!(text.contains("**Word count**"));
        // Lowercase display form, not the debug variant name
        assert!(text.contains("**Preservation priority**: archive"));
    }

    #[test]
    fn test_unknown_modified_date() {
        let a = undated_file("DEPRECATED_AUTH.md", "# Old Auth\n\nno dates anywhere here\n");
        let members = vec![&a];
        let text = merge(&members, &archive_group());
        assert!(text.contains("**Last modified**: unknown"));
    }
}
