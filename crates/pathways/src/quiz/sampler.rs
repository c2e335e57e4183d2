use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use super::domain::{Difficulty, Question};

/// One difficulty bucket request within a sampling plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketRequest {
    pub difficulty: Difficulty,
    pub count: usize,
}

/// Ordered bucket composition for one assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePlan {
    buckets: Vec<BucketRequest>,
}

impl SamplePlan {
    pub fn new(buckets: Vec<BucketRequest>) -> Self {
        Self { buckets }
    }

    /// The standard cognitive assessment mix: 5 beginner, 10 intermediate,
    /// 5 advanced.
    pub fn standard() -> Self {
        Self::new(vec![
            BucketRequest {
                difficulty: Difficulty::Beginner,
                count: 5,
            },
            BucketRequest {
                difficulty: Difficulty::Intermediate,
                count: 10,
            },
            BucketRequest {
                difficulty: Difficulty::Advanced,
                count: 5,
            },
        ])
    }

    pub fn buckets(&self) -> &[BucketRequest] {
        &self.buckets
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }
}

/// Draws questions per bucket uniformly without replacement, then shuffles
/// the merged sequence so difficulty does not telegraph position.
///
/// A bucket holding fewer questions than requested contributes everything it
/// has; an empty bucket contributes nothing. The returned count may therefore
/// fall short of the plan total.
pub fn sample_questions<R: Rng + ?Sized>(
    bank: &[Question],
    plan: &SamplePlan,
    rng: &mut R,
) -> Vec<Question> {
    let mut selected: Vec<Question> = Vec::with_capacity(plan.total());

    for bucket in plan.buckets() {
        let pool: Vec<&Question> = bank
            .iter()
            .filter(|question| question.difficulty == bucket.difficulty)
            .collect();

        for question in pool.choose_multiple(rng, bucket.count) {
            selected.push((*question).clone());
        }
    }

    selected.shuffle(rng);
    selected
}
