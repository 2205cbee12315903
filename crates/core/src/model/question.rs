use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::model::ids::{QuestionId, SyllabusId};

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty bucket a question belongs to.
///
/// The wire form is the lowercase name; parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties, in ascending order. Useful for filter widgets.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// The lowercase wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty: {raw}")]
pub struct ParseDifficultyError {
    raw: String,
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError { raw: s.to_string() }),
        }
    }
}

//
// ─── OPTION LETTER ─────────────────────────────────────────────────────────────
//

/// One of the four answer slots of a question.
///
/// Correctness is decided by comparing letters, so parsing trims whitespace
/// and ignores case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    /// All letters in display order.
    pub const ALL: [OptionLetter; 4] = [
        OptionLetter::A,
        OptionLetter::B,
        OptionLetter::C,
        OptionLetter::D,
    ];

    /// Maps a 0-based option index to its letter.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(OptionLetter::A),
            1 => Some(OptionLetter::B),
            2 => Some(OptionLetter::C),
            3 => Some(OptionLetter::D),
            _ => None,
        }
    }

    /// The 0-based index of this letter.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            OptionLetter::A => 0,
            OptionLetter::B => 1,
            OptionLetter::C => 2,
            OptionLetter::D => 3,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionLetter::A => "A",
            OptionLetter::B => "B",
            OptionLetter::C => "C",
            OptionLetter::D => "D",
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected an option letter A-D, got {raw:?}")]
pub struct ParseOptionLetterError {
    raw: String,
}

impl FromStr for OptionLetter {
    type Err = ParseOptionLetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(OptionLetter::A),
            "B" => Ok(OptionLetter::B),
            "C" => Ok(OptionLetter::C),
            "D" => Ok(OptionLetter::D),
            _ => Err(ParseOptionLetterError { raw: s.to_string() }),
        }
    }
}

//
// ─── ANSWER OPTION ─────────────────────────────────────────────────────────────
//

/// One answer choice: its text and an optional illustration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    text: String,
    image: Option<Url>,
}

impl AnswerOption {
    /// Validates and builds an option.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyOption` for blank text and
    /// `QuestionError::InvalidImageUrl` for an unparsable image link.
    pub fn new(text: impl Into<String>, image: Option<&str>) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyOption);
        }
        let image = match image {
            Some(raw) if !raw.trim().is_empty() => {
                Some(Url::parse(raw.trim()).map_err(|_| QuestionError::InvalidImageUrl {
                    raw: raw.to_string(),
                })?)
            }
            _ => None,
        };
        Ok(Self { text, image })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn image(&self) -> Option<&Url> {
        self.image.as_ref()
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A four-option multiple-choice question.
///
/// Immutable once fetched; the attempt machinery only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    syllabus_id: SyllabusId,
    difficulty: Difficulty,
    prompt: String,
    options: [AnswerOption; 4],
    correct: OptionLetter,
    explanation: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt is empty")]
    EmptyPrompt,

    #[error("question option text is empty")]
    EmptyOption,

    #[error("invalid option image url: {raw}")]
    InvalidImageUrl { raw: String },
}

impl Question {
    /// Validates and builds a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` when the prompt is blank.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: QuestionId,
        syllabus_id: SyllabusId,
        difficulty: Difficulty,
        prompt: impl Into<String>,
        options: [AnswerOption; 4],
        correct: OptionLetter,
        explanation: impl Into<String>,
        active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        Ok(Self {
            id,
            syllabus_id,
            difficulty,
            prompt,
            options,
            correct,
            explanation: explanation.into(),
            active,
            created_at,
            updated_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn syllabus_id(&self) -> SyllabusId {
        self.syllabus_id
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption; 4] {
        &self.options
    }

    /// The option at the given letter.
    #[must_use]
    pub fn option(&self, letter: OptionLetter) -> &AnswerOption {
        &self.options[letter.index()]
    }

    #[must_use]
    pub fn correct(&self) -> OptionLetter {
        self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the given letter is the correct answer to this question.
    #[must_use]
    pub fn is_correct(&self, selected: OptionLetter) -> bool {
        selected == self.correct
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn build_options() -> [AnswerOption; 4] {
        [
            AnswerOption::new("3", None).unwrap(),
            AnswerOption::new("4", None).unwrap(),
            AnswerOption::new("5", None).unwrap(),
            AnswerOption::new("6", None).unwrap(),
        ]
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!(" Easy ".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn difficulty_wire_form_is_lowercase() {
        assert_eq!(Difficulty::Medium.as_str(), "medium");
    }

    #[test]
    fn option_letter_from_index_covers_all_slots() {
        for (index, letter) in OptionLetter::ALL.iter().enumerate() {
            assert_eq!(OptionLetter::from_index(index), Some(*letter));
            assert_eq!(letter.index(), index);
        }
        assert_eq!(OptionLetter::from_index(4), None);
    }

    #[test]
    fn option_letter_parse_trims_and_ignores_case() {
        assert_eq!(" b ".parse::<OptionLetter>().unwrap(), OptionLetter::B);
        assert!("E".parse::<OptionLetter>().is_err());
        assert!("".parse::<OptionLetter>().is_err());
    }

    #[test]
    fn answer_option_rejects_blank_text() {
        let err = AnswerOption::new("   ", None).unwrap_err();
        assert!(matches!(err, QuestionError::EmptyOption));
    }

    #[test]
    fn answer_option_rejects_bad_image_url() {
        let err = AnswerOption::new("ok", Some("not a url")).unwrap_err();
        assert!(matches!(err, QuestionError::InvalidImageUrl { .. }));
    }

    #[test]
    fn answer_option_accepts_empty_image_field() {
        let option = AnswerOption::new("ok", Some("  ")).unwrap();
        assert!(option.image().is_none());
    }

    #[test]
    fn question_rejects_blank_prompt() {
        let now = fixed_now();
        let err = Question::new(
            QuestionId::new(1),
            SyllabusId::new(1),
            Difficulty::Easy,
            "  ",
            build_options(),
            OptionLetter::B,
            "",
            true,
            now,
            now,
        )
        .unwrap_err();
        assert!(matches!(err, QuestionError::EmptyPrompt));
    }

    #[test]
    fn question_grades_by_letter() {
        let now = fixed_now();
        let question = Question::new(
            QuestionId::new(1),
            SyllabusId::new(1),
            Difficulty::Easy,
            "2 + 2 = ?",
            build_options(),
            OptionLetter::B,
            "Basic addition.",
            true,
            now,
            now,
        )
        .unwrap();

        assert!(question.is_correct(OptionLetter::B));
        assert!(!question.is_correct(OptionLetter::A));
        assert_eq!(question.option(OptionLetter::B).text(), "4");
    }
}
