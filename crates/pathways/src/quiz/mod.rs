//! Cognitive assessment: question sampling, quiz session lifecycle,
//! scoring, and the assessment HTTP surface.

pub mod domain;
pub mod router;
pub mod sampler;
pub mod scoring;
pub mod service;
pub mod session;

pub use domain::{AnswerLetter, AnswerSheet, Difficulty, Question};
pub use router::assessment_router;
pub use sampler::{sample_questions, BucketRequest, SamplePlan};
pub use scoring::{
    recommended_difficulty, stream_breakdown, CenteringMode, CognitiveOutcome, CognitiveScorer,
    ScoreBand, ScoringConfig, StreamPerformance,
};
pub use service::{AssessmentError, AssessmentService, CareerOutcome, ReferenceData};
pub use session::{QuizPhase, QuizSession};
