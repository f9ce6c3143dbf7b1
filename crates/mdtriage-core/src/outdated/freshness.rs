//! Human-readable freshness indicators
//!
//! Age buckets are inclusive at the 7/30/90/180-day marks; anything older
//! is "old" with the literal day count. Content type adds a qualitative
//! recommendation so a 40-day-old test report reads differently from a
//! 40-day-old feature guide.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::{AnalyzedFile, ContentType};

/// Discrete freshness bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessBucket {
    Fresh,
    Recent,
    Aging,
    Stale,
    Old,
    Unknown,
}

/// Derived freshness signal for one file
#[derive(Debug, Clone, Serialize)]
pub struct FreshnessIndicator {
    pub bucket: FreshnessBucket,
    pub age_days: Option<i64>,
    /// Bucket marker plus age, e.g. "old (432 days)"
    pub label: String,
    /// Content-type-specific advice
    pub recommendation: String,
}

/// Compute the freshness indicator for a file.
pub fn freshness_indicator(file: &AnalyzedFile, now: DateTime<Utc>) -> FreshnessIndicator {
    let Some(modified) = file.metadata.last_modified else {
        return FreshnessIndicator {
            bucket: FreshnessBucket::Unknown,
            age_days: None,
            label: "unknown age".to_string(),
            recommendation: "no modification timestamp available".to_string(),
        };
    };

    let age = (now - modified).num_days();
    let bucket = bucket_for_age(age);
    let label = match bucket {
        FreshnessBucket::Fresh => "fresh".to_string(),
        FreshnessBucket::Recent => "recent".to_string(),
        FreshnessBucket::Aging => "aging".to_string(),
        FreshnessBucket::Stale => "stale".to_string(),
        FreshnessBucket::Old => format!("old ({age} days)"),
        FreshnessBucket::Unknown => "unknown age".to_string(),
    };

    FreshnessIndicator {
        bucket,
        age_days: Some(age),
        label,
        recommendation: recommendation(file.classification.content_type, age),
    }
}

/// Inclusive bucket boundaries at 7/30/90/180 days
pub fn bucket_for_age(age_days: i64) -> FreshnessBucket {
    match age_days {
        d if d <= 7 => FreshnessBucket::Fresh,
        d if d <= 30 => FreshnessBucket::Recent,
        d if d <= 90 => FreshnessBucket::Aging,
        d if d <= 180 => FreshnessBucket::Stale,
        _ => FreshnessBucket::Old,
    }
}

fn recommendation(content_type: ContentType, age_days: i64) -> String {
    match content_type {
        ContentType::TestReport if age_days > 30 => "likely outdated".to_string(),
        ContentType::SetupProcedure if age_days > 90 => {
            "verify steps still apply".to_string()
        }
        ContentType::CompletionSummary if age_days > 365 => {
            "historical record".to_string()
        }
        ContentType::HistoricalDoc => "intentionally historical".to_string(),
        _ if age_days > 180 => "review for relevance".to_string(),
        _ => "appears current".to_string(),
    }
}
