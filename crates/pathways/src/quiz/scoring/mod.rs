mod config;

pub use config::{CenteringMode, ScoringConfig};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{AnswerSheet, Difficulty, Question};

/// Stateless scorer applying the configured composite formula.
///
/// Every path degrades to a safe default instead of failing: an empty
/// question set scores zero across the board, and out-of-range composites
/// are clamped rather than rejected.
#[derive(Debug, Clone, Default)]
pub struct CognitiveScorer {
    config: ScoringConfig,
}

/// Result of scoring one cognitive assessment attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitiveOutcome {
    /// Percentage of presented questions answered correctly.
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
    /// Bounded IQ-scale composite derived from accuracy.
    pub composite: f64,
}

impl CognitiveOutcome {
    fn empty() -> Self {
        Self {
            accuracy: 0.0,
            correct: 0,
            total: 0,
            composite: 0.0,
        }
    }
}

impl CognitiveScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores an answer sheet against the question sequence it was presented
    /// with. Missing answers count as incorrect.
    pub fn score(&self, answers: &AnswerSheet, questions: &[Question]) -> CognitiveOutcome {
        if questions.is_empty() {
            return CognitiveOutcome::empty();
        }

        let total = questions.len();
        let correct = questions
            .iter()
            .enumerate()
            .filter(|(index, question)| answers.get(*index) == Some(question.correct_answer))
            .count();
        let accuracy = correct as f64 / total as f64 * 100.0;

        CognitiveOutcome {
            accuracy,
            correct,
            total,
            composite: self.composite(accuracy),
        }
    }

    /// Variant applying the elapsed-time adjustment: finishing faster than
    /// the optimal pace earns up to the configured bonus, finishing slower
    /// shrinks the composite, and the result is re-clamped after rounding.
    pub fn score_timed(
        &self,
        answers: &AnswerSheet,
        questions: &[Question],
        time_taken_seconds: u32,
    ) -> CognitiveOutcome {
        let mut outcome = self.score(answers, questions);
        if outcome.total == 0 {
            return outcome;
        }

        let optimal = outcome.total as f64 * f64::from(self.config.optimal_seconds_per_question);
        let elapsed = f64::from(time_taken_seconds.max(1));
        let factor = (optimal / elapsed).min(self.config.max_time_bonus);
        outcome.composite = (outcome.composite * factor)
            .round()
            .clamp(self.config.floor, self.config.ceiling);
        outcome
    }

    /// Maps an accuracy percentage onto the bounded composite scale.
    pub fn composite(&self, accuracy: f64) -> f64 {
        let centered = match self.config.centering {
            CenteringMode::Zero => accuracy,
            CenteringMode::Fifty => accuracy - 50.0,
        };
        (self.config.baseline + centered * self.config.multiplier)
            .clamp(self.config.floor, self.config.ceiling)
    }
}

/// Correct/total tally for one subject stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamPerformance {
    pub correct: usize,
    pub total: usize,
}

/// Per-subject breakdown over the same answer sheet, for the detailed
/// analysis view.
pub fn stream_breakdown(
    answers: &AnswerSheet,
    questions: &[Question],
) -> BTreeMap<String, StreamPerformance> {
    let mut breakdown: BTreeMap<String, StreamPerformance> = BTreeMap::new();
    for (index, question) in questions.iter().enumerate() {
        let entry = breakdown.entry(question.stream.clone()).or_default();
        entry.total += 1;
        if answers.get(index) == Some(question.correct_answer) {
            entry.correct += 1;
        }
    }
    breakdown
}

/// Interpretation band for a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    HighlyGifted,
    Superior,
    HighAverage,
    Average,
    LowAverage,
    BelowAverage,
}

impl ScoreBand {
    pub fn for_composite(composite: f64) -> Self {
        if composite >= 130.0 {
            ScoreBand::HighlyGifted
        } else if composite >= 120.0 {
            ScoreBand::Superior
        } else if composite >= 110.0 {
            ScoreBand::HighAverage
        } else if composite >= 90.0 {
            ScoreBand::Average
        } else if composite >= 80.0 {
            ScoreBand::LowAverage
        } else {
            ScoreBand::BelowAverage
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreBand::HighlyGifted => "Highly Gifted",
            ScoreBand::Superior => "Superior",
            ScoreBand::HighAverage => "High Average",
            ScoreBand::Average => "Average",
            ScoreBand::LowAverage => "Low Average",
            ScoreBand::BelowAverage => "Below Average",
        }
    }
}

/// Suggested course difficulty from the user's latest accuracy score.
pub fn recommended_difficulty(accuracy: f64) -> Difficulty {
    if accuracy >= 85.0 {
        Difficulty::Advanced
    } else if accuracy >= 70.0 {
        Difficulty::Intermediate
    } else {
        Difficulty::Beginner
    }
}
