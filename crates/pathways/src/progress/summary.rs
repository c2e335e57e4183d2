use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::activity::{ActivityRecord, ActivityType};

const RECENT_WINDOW_DAYS: i64 = 7;

/// Headline aggregates over one user's full history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub total_activities: usize,
    /// Mean over every record, zero-score study plans included. That drags
    /// the displayed average down, but it is the established behavior.
    pub average_score: f64,
    /// Records within the last seven days of the supplied "now".
    pub recent_activities: usize,
    pub activity_type_counts: BTreeMap<ActivityType, usize>,
}

pub fn summarize(records: &[ActivityRecord], now: DateTime<Utc>) -> ActivitySummary {
    if records.is_empty() {
        return ActivitySummary::default();
    }

    let total_activities = records.len();
    let average_score =
        records.iter().map(|record| record.score).sum::<f64>() / total_activities as f64;

    let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let recent_activities = records
        .iter()
        .filter(|record| record.recorded_at >= cutoff)
        .count();

    let mut activity_type_counts: BTreeMap<ActivityType, usize> = BTreeMap::new();
    for record in records {
        *activity_type_counts.entry(record.activity).or_default() += 1;
    }

    ActivitySummary {
        total_activities,
        average_score,
        recent_activities,
        activity_type_counts,
    }
}

/// Mean score over scored (non-study-plan) records; `None` when there are
/// none.
pub fn scored_mean(records: &[ActivityRecord]) -> Option<f64> {
    let scored: Vec<f64> = records
        .iter()
        .filter(|record| record.activity.is_scored())
        .map(|record| record.score)
        .collect();
    if scored.is_empty() {
        None
    } else {
        Some(scored.iter().sum::<f64>() / scored.len() as f64)
    }
}
