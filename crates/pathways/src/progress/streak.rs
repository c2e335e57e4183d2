use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::activity::ActivityRecord;

/// Consecutive-day study streaks over a user's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    /// Run of consecutive calendar days ending at the most recent study
    /// day. Zero when that day is older than yesterday.
    pub current: u32,
    /// Longest run anywhere in the history.
    pub best: u32,
    /// Distinct calendar days with at least one recorded activity.
    pub study_days: usize,
}

/// Deduplicated calendar dates with at least one activity.
pub fn study_days(records: &[ActivityRecord]) -> BTreeSet<NaiveDate> {
    records
        .iter()
        .map(|record| record.recorded_at.date_naive())
        .collect()
}

pub fn streaks(records: &[ActivityRecord], today: NaiveDate) -> StreakSummary {
    let days = study_days(records);
    StreakSummary {
        current: current_streak(&days, today),
        best: best_streak(&days),
        study_days: days.len(),
    }
}

fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(&last) = days.iter().next_back() else {
        return 0;
    };
    if (today - last).num_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    let mut cursor = last;
    for &day in days.iter().rev().skip(1) {
        if (cursor - day).num_days() == 1 {
            streak += 1;
            cursor = day;
        } else {
            break;
        }
    }
    streak
}

fn best_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for &day in days {
        run = match previous {
            Some(prev) if (day - prev).num_days() == 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(day);
    }

    best
}
