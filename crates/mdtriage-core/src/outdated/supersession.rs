//! Version/supersession conflicts between sibling files
//!
//! Files are grouped by a normalized base name (version suffixes, ISO
//! dates, and trailing numeric suffixes stripped). Within a group, two
//! independent checks run: extractable version tokens keep only the highest,
//! and multiple completion/summary files keep only the most recently
//! modified.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::{flag, OutdatedReport};
use crate::classify::AnalyzedFile;

/// Strip version suffixes, embedded ISO dates, and trailing numeric
/// suffixes from a filename stem, lowercased.
pub fn normalize_base_name(filename: &str) -> String {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    let version_re = VERSION_RE.get_or_init(|| {
        Regex::new(r"(?i)[_-]?(?:v\d+(?:\.\d+)*|rev\d+|version[_-]?\d+|\d+\.\d+(?:\.\d+)?)")
            .unwrap()
    });

    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    let date_re =
        DATE_RE.get_or_init(|| Regex::new(r"[_-]?\d{4}[-_]\d{2}[-_]\d{2}").unwrap());

    static TRAILING_NUM_RE: OnceLock<Regex> = OnceLock::new();
    let trailing_num_re = TRAILING_NUM_RE.get_or_init(|| Regex::new(r"[_-]\d+$").unwrap());

    let stem = filename
        .rsplit_once('.')
        .map(|(s, _)| s)
        .unwrap_or(filename)
        .to_lowercase();

    let stem = version_re.replace_all(&stem, "");
    let stem = date_re.replace_all(&stem, "");
    let stem = trailing_num_re.replace_all(&stem, "");
    stem.trim_matches(['_', '-']).to_string()
}

/// Extract a comparable version token from a filename.
///
/// Supports dotted semantic versions, `_vN`, `revN`, and `version_N`.
pub fn version_token(filename: &str) -> Option<(u64, u64, u64)> {
    static SEMVER_RE: OnceLock<Regex> = OnceLock::new();
    let semver_re =
        SEMVER_RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

    static SINGLE_RE: OnceLock<Regex> = OnceLock::new();
    let single_re = SINGLE_RE
        .get_or_init(|| Regex::new(r"(?i)(?:_v|rev|version[_-]?)(\d+)").unwrap());

    let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(filename);

    if let Some(caps) = semver_re.captures(stem) {
        let major = caps[1].parse().ok()?;
        let minor = caps[2].parse().ok()?;
        let patch = caps
            .get(3)
            .map(|m| m.as_str().parse().ok())
            .unwrap_or(Some(0))?;
        return Some((major, minor, patch));
    }

    if let Some(caps) = single_re.captures(stem) {
        let major = caps[1].parse().ok()?;
        return Some((major, 0, 0));
    }

    None
}

pub(super) fn analyze(files: &mut [AnalyzedFile], report: &mut OutdatedReport) {
    // Group indices by normalized base name
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, file) in files.iter().enumerate() {
        let base = normalize_base_name(file.filename());
        if !base.is_empty() {
            groups.entry(base).or_default().push(i);
        }
    }

    for indices in groups.values() {
        if indices.len() < 2 {
            continue;
        }

        flag_versioned(files, indices, report);
        flag_stale_completions(files, indices, report);
    }
}

/// Within a base-name group, if two or more files carry a version token,
/// everything but the highest version is superseded.
fn flag_versioned(files: &mut [AnalyzedFile], indices: &[usize], report: &mut OutdatedReport) {
    let versioned: Vec<(usize, (u64, u64, u64))> = indices
        .iter()
        .filter_map(|&i| version_token(files[i].filename()).map(|v| (i, v)))
        .collect();

    if versioned.len() < 2 {
        return;
    }

    let Some(&(winner, best)) = versioned.iter().max_by_key(|(_, v)| *v) else {
        return;
    };
    let winner_name = files[winner].filename().to_string();

    for (i, version) in versioned {
        if i == winner {
            continue;
        }
        flag(
            &mut files[i],
            &mut report.superseded,
            "superseded",
            format!(
                "version {}.{}.{} superseded by {} ({}.{}.{})",
                version.0, version.1, version.2, winner_name, best.0, best.1, best.2
            ),
        );
    }
}

/// Within a base-name group, if two or more files look like
/// completion/summary files, everything but the most recently modified is
/// superseded.
fn flag_stale_completions(
    files: &mut [AnalyzedFile],
    indices: &[usize],
    report: &mut OutdatedReport,
) {
    let completions: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|&i| {
            let name = files[i].filename().to_lowercase();
            name.contains("complete") || name.contains("summary")
        })
        .collect();

    if completions.len() < 2 {
        return;
    }

    let Some(&newest) = completions
        .iter()
        .max_by_key(|&&i| files[i].metadata.last_modified)
    else {
        return;
    };
    let newest_name = files[newest].filename().to_string();

    for i in completions {
        if i == newest {
            continue;
        }
        flag(
            &mut files[i],
            &mut report.superseded,
            "superseded",
            format!("older completion doc superseded by {newest_name}"),
        );
    }
}
