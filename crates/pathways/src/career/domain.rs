use serde::{Deserialize, Serialize};

/// How a career question's selections translate into points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Scale,
    MultipleChoice,
}

impl QuestionKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "scale" => Some(Self::Scale),
            "multiple_choice" => Some(Self::MultipleChoice),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            QuestionKind::Scale => "scale",
            QuestionKind::MultipleChoice => "multiple_choice",
        }
    }
}

/// Immutable career-interest question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerQuestion {
    pub text: String,
    pub career_field: String,
    pub kind: QuestionKind,
    pub options: [String; 4],
}

/// Accumulated affinity for one career field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldScore {
    pub field: String,
    pub total: u32,
    pub count: u32,
}

impl FieldScore {
    /// Mean points per answered question; scale questions bound this to
    /// [1.0, 4.0].
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            f64::from(self.total) / f64::from(self.count)
        }
    }
}

/// Field scores in first-seen order.
///
/// Ranking tie-breaks rely on this ordering, so entries live in a vector
/// rather than a sorted map. A field only materializes once at least one
/// answered question maps to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AffinityProfile {
    entries: Vec<FieldScore>,
}

impl AffinityProfile {
    /// Adds points for one answered question to the field's running score.
    pub fn add(&mut self, field: &str, points: u32) {
        match self.entries.iter_mut().find(|entry| entry.field == field) {
            Some(entry) => {
                entry.total += points;
                entry.count += 1;
            }
            None => self.entries.push(FieldScore {
                field: field.to_string(),
                total: points,
                count: 1,
            }),
        }
    }

    pub fn entries(&self) -> &[FieldScore] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The top `n` fields by average, descending. The sort is stable, so
    /// fields with equal averages keep their first-seen order.
    pub fn top(&self, n: usize) -> Vec<&FieldScore> {
        let mut ranked: Vec<&FieldScore> = self.entries.iter().collect();
        ranked.sort_by(|a, b| {
            b.average()
                .partial_cmp(&a.average())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(n);
        ranked
    }

    pub fn best(&self) -> Option<&FieldScore> {
        self.top(1).into_iter().next()
    }
}
