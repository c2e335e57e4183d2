use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::StudentRecord;
use crate::career::{
    rank_streams, score_answers, AffinityProfile, CareerAnswers, CareerQuestion, RankedStream,
    StreamRecommendation, DEFAULT_RECOMMENDATION_CAP,
};
use crate::certificate::CertificateRenderer;
use crate::progress::{
    self, AchievementConfig, ActivityDetails, ActivityRecord, ActivityType, CertificateAward,
    ProgressReport,
};
use crate::store::{ActivityLog, StoreError};

use super::domain::{AnswerSheet, Question};
use super::sampler::{sample_questions, SamplePlan};
use super::scoring::{CognitiveOutcome, CognitiveScorer, ScoringConfig};

/// Reference collections the assessment endpoints serve from. Loaded once
/// at startup; an empty collection simply yields empty samples and
/// recommendations.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub students: Vec<StudentRecord>,
    pub questions: Vec<Question>,
    pub career_questions: Vec<CareerQuestion>,
    pub streams: Vec<StreamRecommendation>,
}

/// Service composing the sampler, the two scorers, the progress aggregator,
/// and the activity log.
pub struct AssessmentService<L> {
    log: Arc<L>,
    reference: Arc<ReferenceData>,
    scorer: CognitiveScorer,
    achievements: AchievementConfig,
    renderer: CertificateRenderer,
}

impl<L> AssessmentService<L>
where
    L: ActivityLog + 'static,
{
    pub fn new(
        log: Arc<L>,
        reference: Arc<ReferenceData>,
        scoring: ScoringConfig,
        achievements: AchievementConfig,
    ) -> Self {
        Self {
            log,
            reference,
            scorer: CognitiveScorer::new(scoring),
            achievements,
            renderer: CertificateRenderer::new(),
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn scorer(&self) -> &CognitiveScorer {
        &self.scorer
    }

    /// Draws a fresh question set for one attempt.
    pub fn sample(&self, plan: &SamplePlan) -> Vec<Question> {
        sample_questions(&self.reference.questions, plan, &mut rand::rng())
    }

    /// Resolves submitted question ids against the bank, preserving
    /// submission order. Unknown ids are dropped.
    pub fn resolve_questions(&self, ids: &[String]) -> Vec<Question> {
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            match self
                .reference
                .questions
                .iter()
                .find(|question| &question.id == id)
            {
                Some(question) => resolved.push(question.clone()),
                None => warn!(question = %id, "ignoring unknown question id in submission"),
            }
        }
        resolved
    }

    /// Scores a cognitive attempt and appends the result to the history.
    pub fn submit_iq(
        &self,
        user_id: &str,
        answers: &AnswerSheet,
        questions: &[Question],
        time_taken_seconds: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<CognitiveOutcome, AssessmentError> {
        let outcome = match time_taken_seconds {
            Some(elapsed) => self.scorer.score_timed(answers, questions, elapsed),
            None => self.scorer.score(answers, questions),
        };

        let record = ActivityRecord::new(
            user_id,
            ActivityType::IqTest,
            now,
            outcome.accuracy,
            ActivityDetails::IqTest {
                iq_score: outcome.composite,
                correct: outcome.correct,
                total: outcome.total,
            },
        );
        self.log.append(record)?;

        info!(
            user = %user_id,
            accuracy = outcome.accuracy,
            composite = outcome.composite,
            "cognitive assessment scored"
        );
        Ok(outcome)
    }

    /// Scores a career attempt, derives stream recommendations, and appends
    /// the result to the history. The persisted score rescales the [1, 4]
    /// top-field average to a percentage.
    pub fn submit_career(
        &self,
        user_id: &str,
        answers: &CareerAnswers,
        now: DateTime<Utc>,
    ) -> Result<CareerOutcome, AssessmentError> {
        let profile = score_answers(answers, &self.reference.career_questions);
        let recommended = rank_streams(&profile, &self.reference.streams, DEFAULT_RECOMMENDATION_CAP);

        let (top_field, top_score) = profile
            .best()
            .map(|field| (field.field.clone(), field.average()))
            .unwrap_or_else(|| ("Undecided".to_string(), 0.0));

        let record = ActivityRecord::new(
            user_id,
            ActivityType::CareerQuiz,
            now,
            top_score * 25.0,
            ActivityDetails::CareerQuiz {
                top_field: top_field.clone(),
                top_score,
                fields_assessed: profile.len(),
            },
        );
        self.log.append(record)?;

        info!(user = %user_id, top_field = %top_field, "career assessment scored");
        Ok(CareerOutcome {
            profile,
            recommended,
        })
    }

    /// Aggregates the user's history into the dashboard report. An
    /// unavailable or empty history reports the same way.
    pub fn progress(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ProgressReport, AssessmentError> {
        let records = self.log.for_user(user_id)?;
        Ok(progress::report(&records, now, &self.achievements))
    }

    /// Certificates the user is currently eligible to generate.
    pub fn certificates(&self, user_id: &str) -> Result<Vec<CertificateAward>, AssessmentError> {
        let mut records = self.log.for_user(user_id)?;
        records.sort_by_key(|record| record.recorded_at);
        Ok(progress::certificate_awards(&records, &self.achievements))
    }

    /// Renders the document for one eligible certificate, selected by title.
    /// `None` means the user has not earned a certificate with that title.
    pub fn certificate(
        &self,
        user_id: &str,
        user_name: &str,
        title: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Vec<u8>>, AssessmentError> {
        let awards = self.certificates(user_id)?;
        let Some(award) = awards.into_iter().find(|award| award.title == title) else {
            return Ok(None);
        };

        let date_line = now.format("%B %d, %Y").to_string();
        let bytes = match award.score {
            Some(score) => {
                self.renderer
                    .completion(user_name, &award.title, &date_line, Some(score))
            }
            None => self
                .renderer
                .achievement(user_name, &award.title, &award.description, &date_line),
        };

        info!(user = %user_id, certificate = %award.title, "certificate rendered");
        Ok(Some(bytes))
    }
}

/// Career submission result: the affinity profile plus ranked streams.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerOutcome {
    pub profile: AffinityProfile,
    pub recommended: Vec<RankedStream>,
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AssessmentError> for crate::error::AppError {
    fn from(value: AssessmentError) -> Self {
        match value {
            AssessmentError::Store(err) => crate::error::AppError::Store(err),
        }
    }
}
