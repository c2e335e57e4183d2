use std::collections::BTreeMap;

use crate::quiz::domain::AnswerLetter;

use super::domain::{AffinityProfile, CareerQuestion, QuestionKind};

/// Raw career-quiz responses keyed by 0-based question index. Values are
/// whatever the client selected; they are parsed leniently during scoring so
/// an unrecognizable selection still counts against the field's average.
pub type CareerAnswers = BTreeMap<usize, String>;

/// Points for a scale response: a=1 through d=4.
pub fn scale_points(letter: AnswerLetter) -> u32 {
    match letter {
        AnswerLetter::A => 1,
        AnswerLetter::B => 2,
        AnswerLetter::C => 3,
        AnswerLetter::D => 4,
    }
}

/// Flat heuristic for multiple-choice responses: the first two options score
/// 3, anything else scores 2. Kept exactly as the historical rubric defines
/// it.
pub fn choice_points(letter: Option<AnswerLetter>) -> u32 {
    match letter {
        Some(AnswerLetter::A) | Some(AnswerLetter::B) => 3,
        _ => 2,
    }
}

/// Aggregates responses into per-field affinity scores.
///
/// Indices beyond the question sequence are skipped silently. Scale
/// selections that fail to parse score zero but still count, mirroring the
/// historical behavior.
pub fn score_answers(answers: &CareerAnswers, questions: &[CareerQuestion]) -> AffinityProfile {
    let mut profile = AffinityProfile::default();

    for (&index, selection) in answers {
        let Some(question) = questions.get(index) else {
            continue;
        };

        let letter = AnswerLetter::parse(selection);
        let points = match question.kind {
            QuestionKind::Scale => letter.map(scale_points).unwrap_or(0),
            QuestionKind::MultipleChoice => choice_points(letter),
        };

        profile.add(&question.career_field, points);
    }

    profile
}
