use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Selectable option letter for a four-option question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    /// Lenient, case-insensitive parse of a client-supplied selection.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "a" => Some(Self::A),
            "b" => Some(Self::B),
            "c" => Some(Self::C),
            "d" => Some(Self::D),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AnswerLetter::A => "a",
            AnswerLetter::B => "b",
            AnswerLetter::C => "c",
            AnswerLetter::D => "d",
        }
    }

    /// Position of this letter's option text within a question's option list.
    pub const fn index(self) -> usize {
        match self {
            AnswerLetter::A => 0,
            AnswerLetter::B => 1,
            AnswerLetter::C => 2,
            AnswerLetter::D => 3,
        }
    }
}

/// Difficulty bucket an assessment question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    pub const fn ordered() -> [Difficulty; 3] {
        [
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ]
    }
}

/// Immutable assessment question from the question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub stream: String,
    pub difficulty: Difficulty,
    pub options: [String; 4],
    pub correct_answer: AnswerLetter,
    pub explanation: Option<String>,
}

impl Question {
    pub fn option(&self, letter: AnswerLetter) -> &str {
        &self.options[letter.index()]
    }
}

/// Answers for one attempt, keyed by 0-based question index.
///
/// Indices follow presentation order, so iteration order doubles as the
/// order the questions were shown in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerSheet {
    entries: BTreeMap<usize, AnswerLetter>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a selection, replacing any earlier answer for the index.
    pub fn record(&mut self, index: usize, letter: AnswerLetter) {
        self.entries.insert(index, letter);
    }

    pub fn get(&self, index: usize) -> Option<AnswerLetter> {
        self.entries.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, AnswerLetter)> + '_ {
        self.entries.iter().map(|(index, letter)| (*index, *letter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_parse_case_insensitively() {
        assert_eq!(AnswerLetter::parse("A"), Some(AnswerLetter::A));
        assert_eq!(AnswerLetter::parse(" d "), Some(AnswerLetter::D));
        assert_eq!(AnswerLetter::parse("e"), None);
        assert_eq!(AnswerLetter::parse(""), None);
    }

    #[test]
    fn difficulty_parses_labels_back() {
        for difficulty in Difficulty::ordered() {
            assert_eq!(Difficulty::parse(difficulty.label()), Some(difficulty));
        }
        assert_eq!(Difficulty::parse("expert"), None);
    }

    #[test]
    fn sheet_replaces_earlier_answers() {
        let mut sheet = AnswerSheet::new();
        sheet.record(0, AnswerLetter::A);
        sheet.record(0, AnswerLetter::C);
        assert_eq!(sheet.get(0), Some(AnswerLetter::C));
        assert_eq!(sheet.len(), 1);
    }
}
