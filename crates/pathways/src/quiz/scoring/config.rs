use serde::{Deserialize, Serialize};

/// Which baseline the accuracy percentage is centered on before scaling.
///
/// Two variants circulated historically; the default centers accuracy at
/// 50% so that an average run lands near the scale midpoint. `Zero` keeps
/// the legacy uncentered path available for comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenteringMode {
    Zero,
    #[default]
    Fifty,
}

/// Composite-score tuning for the cognitive assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub baseline: f64,
    pub multiplier: f64,
    pub centering: CenteringMode,
    pub floor: f64,
    pub ceiling: f64,
    pub optimal_seconds_per_question: u32,
    pub max_time_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            baseline: 85.0,
            multiplier: 0.6,
            centering: CenteringMode::default(),
            floor: 70.0,
            ceiling: 150.0,
            optimal_seconds_per_question: 30,
            max_time_bonus: 1.2,
        }
    }
}
