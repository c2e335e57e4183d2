use std::collections::BTreeMap;

use super::activity::{ActivityRecord, ActivityType};
use super::summary::ActivitySummary;

const WEAK_AREA_THRESHOLD: f64 = 75.0;
const MIN_WEEKLY_ACTIVITIES: usize = 3;

/// Advisory strings derived from the summary, evaluated in a fixed order:
/// score band, then activity frequency, then type diversity, then per-type
/// weak areas. Every applicable rule fires; the list is never truncated to
/// the first match.
pub fn improvement_suggestions(
    records: &[ActivityRecord],
    summary: &ActivitySummary,
) -> Vec<String> {
    if records.is_empty() {
        return vec!["Start taking quizzes to get personalized suggestions!".to_string()];
    }

    let mut suggestions = Vec::new();

    if summary.average_score < 70.0 {
        suggestions.push(
            "Focus on reviewing fundamental concepts before taking advanced quizzes.".to_string(),
        );
    } else if summary.average_score < 85.0 {
        suggestions.push(
            "Great progress! Try tackling more challenging topics to improve further.".to_string(),
        );
    } else {
        suggestions
            .push("Excellent performance! Consider exploring new subject areas.".to_string());
    }

    if summary.recent_activities < MIN_WEEKLY_ACTIVITIES {
        suggestions.push(
            "Try to maintain regular study sessions - aim for at least 3 activities per week."
                .to_string(),
        );
    }

    if summary.activity_type_counts.len() == 1 {
        suggestions
            .push("Diversify your learning by trying different types of assessments.".to_string());
    }

    let weak_areas = weak_areas(records);
    if !weak_areas.is_empty() {
        let labels: Vec<&str> = weak_areas.iter().map(|area| area.label()).collect();
        suggestions.push(format!(
            "Consider spending more time on: {}",
            labels.join(", ")
        ));
    }

    suggestions
}

/// Scored activity types whose mean score sits below the weak-area
/// threshold.
fn weak_areas(records: &[ActivityRecord]) -> Vec<ActivityType> {
    let mut totals: BTreeMap<ActivityType, (f64, usize)> = BTreeMap::new();
    for record in records.iter().filter(|record| record.activity.is_scored()) {
        let entry = totals.entry(record.activity).or_insert((0.0, 0));
        entry.0 += record.score;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .filter(|(_, (total, count))| *count > 0 && total / (*count as f64) < WEAK_AREA_THRESHOLD)
        .map(|(activity, _)| activity)
        .collect()
}
