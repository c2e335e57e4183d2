use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::activity::{ActivityRecord, ActivityType};
use super::summary::scored_mean;

/// Activity-count and score thresholds gating certificates and
/// achievements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementConfig {
    /// Ascending activity-count milestones.
    pub milestone_thresholds: Vec<usize>,
    /// Best IQ accuracy at or above this earns the excellence tier.
    pub excellence_score: f64,
    /// A single assessment at or above this counts as a high score.
    pub high_score: f64,
    /// High scores needed for the high-performance certificate.
    pub high_score_count: usize,
    /// Scored-record mean needed for the consistent-performance fallback.
    pub consistent_average: f64,
    /// Lookback window for recent achievements.
    pub achievement_window_days: i64,
}

impl Default for AchievementConfig {
    fn default() -> Self {
        Self {
            milestone_thresholds: vec![5, 10, 25, 50, 100],
            excellence_score: 75.0,
            high_score: 90.0,
            high_score_count: 3,
            consistent_average: 80.0,
            achievement_window_days: 30,
        }
    }
}

/// Standing against one activity-count milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MilestoneStatus {
    pub threshold: usize,
    pub achieved: bool,
    /// Activities still needed; zero once achieved.
    pub remaining: usize,
}

/// Every configured milestone is reported independently, so reaching 50
/// also lists 25, 10, and 5 as achieved.
pub fn milestone_statuses(
    total_activities: usize,
    config: &AchievementConfig,
) -> Vec<MilestoneStatus> {
    config
        .milestone_thresholds
        .iter()
        .map(|&threshold| MilestoneStatus {
            threshold,
            achieved: total_activities >= threshold,
            remaining: threshold.saturating_sub(total_activities),
        })
        .collect()
}

/// Certificate tier for the cognitive assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IqTier {
    Excellence,
    Participation,
}

/// What a certificate attests to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CertificateKind {
    IqAssessment { tier: IqTier, best_score: f64 },
    CareerDiscovery { latest_score: f64 },
    Milestone { threshold: usize },
    HighPerformance { high_score_count: usize },
    ConsistentPerformance { average: f64 },
}

/// A certificate the user is currently eligible to generate. Eligibility is
/// always derived from the history; nothing is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateAward {
    pub kind: CertificateKind,
    pub title: String,
    pub description: String,
    /// Score printed on the document, when the certificate carries one.
    pub score: Option<f64>,
}

pub fn certificate_awards(
    records: &[ActivityRecord],
    config: &AchievementConfig,
) -> Vec<CertificateAward> {
    let mut awards = Vec::new();

    let best_iq = records
        .iter()
        .filter(|record| record.activity == ActivityType::IqTest)
        .map(|record| record.score)
        .fold(None, |best: Option<f64>, score| {
            Some(best.map_or(score, |b| b.max(score)))
        });
    if let Some(best_score) = best_iq {
        let (tier, title, description) = if best_score >= config.excellence_score {
            (
                IqTier::Excellence,
                "IQ Assessment Excellence",
                format!("Outstanding performance in cognitive assessment (Score: {best_score:.1}%)"),
            )
        } else {
            (
                IqTier::Participation,
                "IQ Assessment Participation",
                format!("Completed cognitive assessment (Score: {best_score:.1}%)"),
            )
        };
        awards.push(CertificateAward {
            kind: CertificateKind::IqAssessment { tier, best_score },
            title: title.to_string(),
            description,
            score: Some(best_score),
        });
    }

    let latest_career = records
        .iter()
        .filter(|record| record.activity == ActivityType::CareerQuiz)
        .next_back();
    if let Some(record) = latest_career {
        awards.push(CertificateAward {
            kind: CertificateKind::CareerDiscovery {
                latest_score: record.score,
            },
            title: "Career Path Discovery".to_string(),
            description: "Successfully completed career assessment and discovered your ideal path"
                .to_string(),
            score: Some(record.score),
        });
    }

    for status in milestone_statuses(records.len(), config) {
        if status.achieved {
            awards.push(CertificateAward {
                kind: CertificateKind::Milestone {
                    threshold: status.threshold,
                },
                title: format!("{} Activities Milestone", status.threshold),
                description: format!(
                    "Completed {} learning activities on the platform",
                    status.threshold
                ),
                score: None,
            });
        }
    }

    let high_scores = records
        .iter()
        .filter(|record| record.activity.is_scored() && record.score >= config.high_score)
        .count();
    let average = scored_mean(records);
    if high_scores >= config.high_score_count {
        awards.push(CertificateAward {
            kind: CertificateKind::HighPerformance {
                high_score_count: high_scores,
            },
            title: "High Performance Excellence".to_string(),
            description: format!("Achieved {:.0}%+ scores in {high_scores} assessments", config.high_score),
            score: average,
        });
    } else if let Some(average) = average.filter(|mean| *mean >= config.consistent_average) {
        awards.push(CertificateAward {
            kind: CertificateKind::ConsistentPerformance { average },
            title: "Consistent Performance".to_string(),
            description: format!(
                "Maintained average score of {average:.1}% across all assessments"
            ),
            score: Some(average),
        });
    }

    awards
}

/// A noteworthy event inside the recent lookback window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub achieved_on: NaiveDate,
}

pub fn recent_achievements(
    records: &[ActivityRecord],
    now: DateTime<Utc>,
    config: &AchievementConfig,
) -> Vec<Achievement> {
    let mut achievements = Vec::new();
    let cutoff = now - Duration::days(config.achievement_window_days);

    for record in records
        .iter()
        .filter(|record| record.recorded_at >= cutoff && record.score >= config.high_score)
    {
        achievements.push(Achievement {
            title: "High Score".to_string(),
            description: format!(
                "Scored {:.1}% in {}",
                record.score,
                record.activity.label()
            ),
            achieved_on: record.recorded_at.date_naive(),
        });
    }

    let total = records.len();
    if total >= 10 && total % 5 == 0 {
        achievements.push(Achievement {
            title: "Milestone".to_string(),
            description: format!("Completed {total} total activities!"),
            achieved_on: now.date_naive(),
        });
    }

    achievements
}
