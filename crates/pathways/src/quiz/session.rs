use serde::Serialize;

use super::domain::{AnswerLetter, AnswerSheet, Question};
use super::scoring::{CognitiveOutcome, CognitiveScorer};

/// Where a quiz attempt currently stands.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum QuizPhase {
    NotStarted,
    InProgress { current: usize },
    Completed { outcome: CognitiveOutcome },
}

/// One quiz attempt, carried explicitly through its lifecycle instead of
/// living in ambient session state. Answers cannot be revisited; the cursor
/// only moves forward.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    answers: AnswerSheet,
    phase: QuizPhase,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            answers: AnswerSheet::new(),
            phase: QuizPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    /// Moves into `InProgress` at the first question. No-op once started.
    pub fn begin(&mut self) {
        if matches!(self.phase, QuizPhase::NotStarted) {
            self.phase = QuizPhase::InProgress { current: 0 };
        }
    }

    /// The question awaiting an answer, if the attempt is mid-flight.
    pub fn current_question(&self) -> Option<&Question> {
        match &self.phase {
            QuizPhase::InProgress { current } => self.questions.get(*current),
            _ => None,
        }
    }

    /// Records an answer for the current question and advances the cursor.
    /// Returns false when there is no question to answer.
    pub fn answer(&mut self, letter: AnswerLetter) -> bool {
        let current = match &self.phase {
            QuizPhase::InProgress { current } => *current,
            _ => return false,
        };
        if current >= self.questions.len() {
            return false;
        }

        self.answers.record(current, letter);
        self.phase = QuizPhase::InProgress {
            current: current + 1,
        };
        true
    }

    /// True once every presented question has been answered.
    pub fn is_exhausted(&self) -> bool {
        match &self.phase {
            QuizPhase::InProgress { current } => *current >= self.questions.len(),
            QuizPhase::Completed { .. } => true,
            QuizPhase::NotStarted => self.questions.is_empty(),
        }
    }

    /// Scores the attempt and transitions to `Completed`. Scoring a session
    /// twice returns the stored outcome unchanged.
    pub fn finish(
        &mut self,
        scorer: &CognitiveScorer,
        time_taken_seconds: Option<u32>,
    ) -> CognitiveOutcome {
        if let QuizPhase::Completed { outcome } = &self.phase {
            return outcome.clone();
        }

        let outcome = match time_taken_seconds {
            Some(elapsed) => scorer.score_timed(&self.answers, &self.questions, elapsed),
            None => scorer.score(&self.answers, &self.questions),
        };
        self.phase = QuizPhase::Completed {
            outcome: outcome.clone(),
        };
        outcome
    }
}
