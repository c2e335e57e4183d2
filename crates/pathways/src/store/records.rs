use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::auth::StudentRecord;
use crate::career::{CareerQuestion, QuestionKind, StreamRecommendation};
use crate::progress::{ActivityDetails, ActivityRecord, ActivityType};
use crate::quiz::domain::{AnswerLetter, Difficulty, Question};

/// Raw row shapes mirror the flat-file columns exactly; they convert into
/// domain types here, at the storage boundary, so point-of-use code never
/// sees loosely-typed data.

#[derive(Debug, Deserialize)]
pub(super) struct QuestionRow {
    question_id: String,
    question: String,
    stream: String,
    difficulty: String,
    option_a: String,
    option_b: String,
    option_c: String,
    option_d: String,
    correct_answer: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    explanation: Option<String>,
}

impl QuestionRow {
    pub(super) fn into_domain(self) -> Option<Question> {
        let Some(difficulty) = Difficulty::parse(&self.difficulty) else {
            warn!(
                question = %self.question_id,
                value = %self.difficulty,
                "skipping question with unknown difficulty"
            );
            return None;
        };
        let Some(correct_answer) = AnswerLetter::parse(&self.correct_answer) else {
            warn!(
                question = %self.question_id,
                value = %self.correct_answer,
                "skipping question with unknown correct answer"
            );
            return None;
        };

        Some(Question {
            id: self.question_id,
            text: self.question,
            stream: self.stream,
            difficulty,
            options: [self.option_a, self.option_b, self.option_c, self.option_d],
            correct_answer,
            explanation: self.explanation,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CareerQuestionRow {
    question: String,
    career_field: String,
    question_type: String,
    option_a: String,
    option_b: String,
    option_c: String,
    option_d: String,
}

impl CareerQuestionRow {
    pub(super) fn into_domain(self) -> Option<CareerQuestion> {
        let Some(kind) = QuestionKind::parse(&self.question_type) else {
            warn!(
                question = %self.question,
                value = %self.question_type,
                "skipping career question with unknown type"
            );
            return None;
        };

        Some(CareerQuestion {
            text: self.question,
            career_field: self.career_field,
            kind,
            options: [self.option_a, self.option_b, self.option_c, self.option_d],
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct StreamRow {
    stream_name: String,
    category: String,
    description: String,
    difficulty_level: String,
    resource_type: String,
    duration: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    url: Option<String>,
    platform: String,
}

impl StreamRow {
    pub(super) fn into_domain(self) -> StreamRecommendation {
        // Legacy files used "N/A" for absent links.
        let url = self.url.filter(|value| value != "N/A");
        StreamRecommendation {
            stream_name: self.stream_name,
            category: self.category,
            description: self.description,
            difficulty_level: self.difficulty_level,
            resource_type: self.resource_type,
            duration: self.duration,
            url,
            platform: self.platform,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct StudentRow {
    #[serde(rename = "Username")]
    username: String,
    #[serde(rename = "Password")]
    password: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Email", default, deserialize_with = "empty_string_as_none")]
    email: Option<String>,
}

impl StudentRow {
    pub(super) fn into_domain(self) -> StudentRecord {
        StudentRecord {
            username: self.username,
            password: self.password,
            name: self.name,
            email: self.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct ActivityRow {
    progress_id: String,
    user_id: String,
    activity_type: String,
    date: String,
    score: f64,
    details: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    payload: Option<String>,
}

impl ActivityRow {
    pub(super) fn from_record(record: &ActivityRecord) -> Result<Self, serde_json::Error> {
        Ok(Self {
            progress_id: record.id.clone(),
            user_id: record.user_id.clone(),
            activity_type: record.activity.label().to_string(),
            date: record.recorded_at.to_rfc3339(),
            score: record.score,
            details: record.details.summary(),
            payload: Some(serde_json::to_string(&record.details)?),
        })
    }

    pub(super) fn into_domain(self) -> Option<ActivityRecord> {
        let Some(activity) = ActivityType::parse(&self.activity_type) else {
            warn!(
                record = %self.progress_id,
                value = %self.activity_type,
                "skipping activity record with unknown type"
            );
            return None;
        };
        let Some(recorded_at) = parse_timestamp(&self.date) else {
            warn!(
                record = %self.progress_id,
                value = %self.date,
                "skipping activity record with unreadable timestamp"
            );
            return None;
        };

        // Prefer the structured payload; plain text from older rows becomes
        // a free-form note.
        let details = self
            .payload
            .as_deref()
            .and_then(|payload| serde_json::from_str::<ActivityDetails>(payload).ok())
            .unwrap_or(ActivityDetails::Note {
                text: self.details,
            });

        Some(ActivityRecord {
            id: self.progress_id,
            user_id: self.user_id,
            activity,
            recorded_at,
            score: self.score,
            details,
        })
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }

    None
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn question_rows_with_bad_difficulty_convert_to_none() {
        let row = QuestionRow {
            question_id: "q1".to_string(),
            question: "2 + 2 = ?".to_string(),
            stream: "Mathematics".to_string(),
            difficulty: "impossible".to_string(),
            option_a: "3".to_string(),
            option_b: "4".to_string(),
            option_c: "5".to_string(),
            option_d: "6".to_string(),
            correct_answer: "b".to_string(),
            explanation: None,
        };
        assert!(row.into_domain().is_none());
    }

    #[test]
    fn activity_rows_round_trip_with_payload() {
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

        let row = ActivityRow::from_record(&record).expect("payload encodes");
        let loaded = row.into_domain().expect("row converts back");
        assert_eq!(loaded, record);
    }

    #[test]
    fn legacy_rows_without_payload_become_notes() {
        let row = ActivityRow {
            progress_id: "avery_iq_test_20240305_143009".to_string(),
            user_id: "avery".to_string(),
            activity_type: "iq_test".to_string(),
            date: "2024-03-05 14:30:09".to_string(),
            score: 85.0,
            details: "IQ Score: 106, Correct: 17/20".to_string(),
            payload: None,
        };

        let record = row.into_domain().expect("legacy row converts");
        assert_eq!(
            record.details,
            ActivityDetails::Note {
                text: "IQ Score: 106, Correct: 17/20".to_string()
            }
        );
        assert_eq!(
            record.recorded_at,
            Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 9).unwrap()
        );
    }

    #[test]
    fn na_urls_load_as_absent() {
        let row = StreamRow {
            stream_name: "Data Science".to_string(),
            category: "Technology".to_string(),
            description: "Working with data".to_string(),
            difficulty_level: "Intermediate".to_string(),
            resource_type: "Course".to_string(),
            duration: "8 weeks".to_string(),
            url: Some("N/A".to_string()),
            platform: "OpenLearn".to_string(),
        };
        assert_eq!(row.into_domain().url, None);
    }
}
