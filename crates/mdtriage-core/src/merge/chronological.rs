//! Chronological merge: members ordered by resolved date, each emitted as
//! one dated section with a table of contents up front.

use crate::chronology::{self, DateSource};
use crate::classify::AnalyzedFile;
use crate::grouping::ConsolidationGroup;

use super::{file_title, group_title, strip_top_heading};

pub fn merge(members: &[&AnalyzedFile], group: &ConsolidationGroup) -> String {
    let ordered = chronology::order(members);

    let mut out = format!("# {}\n\n", group_title(group));

    out.push_str("## Contents\n\n");
    for file in &ordered {
        let title = file_title(file);
        out.push_str(&format!(
            "- [{title}](#{anchor}) - {date}\n",
            anchor = slug::slugify(&title),
            date = date_label(file),
        ));
    }
    out.push('\n');

    for file in &ordered {
        let body = strip_top_heading(file.record.text().unwrap_or_default());
        out.push_str(&format!(
            "## {}\n\n*Date: {} | Source: {}*\n\n{}\n\n",
            file_title(file),
            date_label(file),
            file.filename(),
            body,
        ));
    }

    out.trim_end().to_string() + "\n"
}

fn date_label(file: &AnalyzedFile) -> String {
    match chronology::resolve_date(file) {
        (_, DateSource::None) => "undated".to_string(),
        (date, _) => date.format("%Y-%m-%d").to_string(),
    }
}
