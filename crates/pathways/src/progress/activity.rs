use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kinds of activity the platform records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    IqTest,
    CareerQuiz,
    StudyPlan,
    CourseCompletion,
    SkillAssessment,
}

impl ActivityType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "iq_test" => Some(Self::IqTest),
            "career_quiz" => Some(Self::CareerQuiz),
            "study_plan" => Some(Self::StudyPlan),
            "course_completion" => Some(Self::CourseCompletion),
            "skill_assessment" => Some(Self::SkillAssessment),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ActivityType::IqTest => "iq_test",
            ActivityType::CareerQuiz => "career_quiz",
            ActivityType::StudyPlan => "study_plan",
            ActivityType::CourseCompletion => "course_completion",
            ActivityType::SkillAssessment => "skill_assessment",
        }
    }

    /// Study plans carry no meaningful score; everything else does.
    pub const fn is_scored(self) -> bool {
        !matches!(self, ActivityType::StudyPlan)
    }
}

/// Structured payload per activity type, kept alongside the rendered
/// human-readable summary so downstream consumers never re-parse free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityDetails {
    IqTest {
        iq_score: f64,
        correct: usize,
        total: usize,
    },
    CareerQuiz {
        top_field: String,
        top_score: f64,
        fields_assessed: usize,
    },
    StudyPlan {
        goal: String,
        deadline: String,
        status: String,
    },
    Note {
        text: String,
    },
}

impl ActivityDetails {
    /// Human-readable rendering, matching the historical summary strings.
    pub fn summary(&self) -> String {
        match self {
            ActivityDetails::IqTest {
                iq_score,
                correct,
                total,
            } => format!("IQ Score: {iq_score:.0}, Correct: {correct}/{total}"),
            ActivityDetails::CareerQuiz {
                top_field,
                top_score,
                fields_assessed,
            } => format!(
                "Top career: {top_field}, Score: {top_score:.1}, Total fields assessed: {fields_assessed}"
            ),
            ActivityDetails::StudyPlan {
                goal,
                deadline,
                status,
            } => format!("Goal: {goal}, Deadline: {deadline}, Status: {status}"),
            ActivityDetails::Note { text } => text.clone(),
        }
    }
}

/// One appended entry in a user's history. Records are never mutated or
/// deleted; a logical status change appends a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: String,
    pub user_id: String,
    pub activity: ActivityType,
    pub recorded_at: DateTime<Utc>,
    /// Percentage score; zero for unscored types such as study plans.
    pub score: f64,
    pub details: ActivityDetails,
}

impl ActivityRecord {
    pub fn new(
        user_id: &str,
        activity: ActivityType,
        recorded_at: DateTime<Utc>,
        score: f64,
        details: ActivityDetails,
    ) -> Self {
        let id = format!(
            "{user_id}_{}_{}",
            activity.label(),
            recorded_at.format("%Y%m%d_%H%M%S")
        );
        Self {
            id,
            user_id: user_id.to_string(),
            activity,
            recorded_at,
            score,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn id_derives_from_user_type_and_timestamp() {
        let recorded_at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 9).unwrap();
        let record = ActivityRecord::new(
            "avery",
            ActivityType::IqTest,
            recorded_at,
            85.0,
            ActivityDetails::IqTest {
                iq_score: 106.0,
                correct: 17,
                total: 20,
            },
        );
        assert_eq!(record.id, "avery_iq_test_20240305_143009");
    }

    #[test]
    fn summaries_match_historical_strings() {
        let details = ActivityDetails::StudyPlan {
            goal: "Master Rust".to_string(),
            deadline: "2024-06-01".to_string(),
            status: "Active".to_string(),
        };
        assert_eq!(
            details.summary(),
            "Goal: Master Rust, Deadline: 2024-06-01, Status: Active"
        );

        let details = ActivityDetails::IqTest {
            iq_score: 112.4,
            correct: 18,
            total: 20,
        };
        assert_eq!(details.summary(), "IQ Score: 112, Correct: 18/20");
    }

    #[test]
    fn types_round_trip_through_labels() {
        for activity in [
            ActivityType::IqTest,
            ActivityType::CareerQuiz,
            ActivityType::StudyPlan,
            ActivityType::CourseCompletion,
            ActivityType::SkillAssessment,
        ] {
            assert_eq!(ActivityType::parse(activity.label()), Some(activity));
        }
        assert_eq!(ActivityType::parse("unknown"), None);
    }
}
