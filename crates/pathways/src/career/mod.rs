//! Career-interest scoring and learning-stream recommendation.

pub mod domain;
pub mod recommend;
pub mod scorer;

pub use domain::{AffinityProfile, CareerQuestion, FieldScore, QuestionKind};
pub use recommend::{
    filter_streams, parse_duration_weeks, rank_streams, stream_category, RankedStream,
    RecommendationFilter, StreamRecommendation, DEFAULT_RECOMMENDATION_CAP,
};
pub use scorer::{score_answers, CareerAnswers};
