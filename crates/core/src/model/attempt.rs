use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{AttemptId, ExamId, QuestionId, SectionId, SyllabusId, UserId};
use crate::model::question::{Difficulty, OptionLetter};

//
// ─── ANSWER STATUS ─────────────────────────────────────────────────────────────
//

/// Per-question status as recorded on the server.
///
/// The wire form is the numeric code: 0 visited-not-answered,
/// 1 answered-correct, 2 answered-incorrect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerStatus {
    Visited,
    Correct,
    Incorrect,
}

impl AnswerStatus {
    /// The numeric wire code.
    #[must_use]
    pub fn code(&self) -> u8 {
        match self {
            AnswerStatus::Visited => 0,
            AnswerStatus::Correct => 1,
            AnswerStatus::Incorrect => 2,
        }
    }

    /// Maps a wire code back to a status.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(AnswerStatus::Visited),
            1 => Some(AnswerStatus::Correct),
            2 => Some(AnswerStatus::Incorrect),
            _ => None,
        }
    }

    /// Whether this status represents a submitted answer.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        matches!(self, AnswerStatus::Correct | AnswerStatus::Incorrect)
    }
}

//
// ─── ATTEMPT ENTRY ─────────────────────────────────────────────────────────────
//

/// One per-question record inside an attempt.
///
/// Invariant, enforced at construction: `Visited` carries no selection,
/// `Correct`/`Incorrect` always carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptEntry {
    question_id: QuestionId,
    status: AnswerStatus,
    selected: Option<OptionLetter>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptEntryError {
    #[error("status {status:?} requires a selected option")]
    MissingSelection { status: AnswerStatus },

    #[error("a visited-only entry cannot carry a selection")]
    UnexpectedSelection,

    #[error("unknown status code: {code}")]
    UnknownStatus { code: u8 },
}

impl AttemptEntry {
    /// An entry for a question that was opened but not answered.
    #[must_use]
    pub fn visited(question_id: QuestionId) -> Self {
        Self {
            question_id,
            status: AnswerStatus::Visited,
            selected: None,
        }
    }

    /// An entry for a submitted answer, graded against the correct letter.
    #[must_use]
    pub fn graded(question_id: QuestionId, selected: OptionLetter, correct: OptionLetter) -> Self {
        let status = if selected == correct {
            AnswerStatus::Correct
        } else {
            AnswerStatus::Incorrect
        };
        Self {
            question_id,
            status,
            selected: Some(selected),
        }
    }

    /// Rehydrates an entry from its wire parts, enforcing the
    /// status/selection invariant.
    ///
    /// # Errors
    ///
    /// Returns `AttemptEntryError` when the parts contradict each other.
    pub fn from_parts(
        question_id: QuestionId,
        status: AnswerStatus,
        selected: Option<OptionLetter>,
    ) -> Result<Self, AttemptEntryError> {
        match (status, selected) {
            (AnswerStatus::Visited, Some(_)) => Err(AttemptEntryError::UnexpectedSelection),
            (AnswerStatus::Correct | AnswerStatus::Incorrect, None) => {
                Err(AttemptEntryError::MissingSelection { status })
            }
            _ => Ok(Self {
                question_id,
                status,
                selected,
            }),
        }
    }

    #[must_use]
    pub fn question_id(&self) -> QuestionId {
        self.question_id
    }

    #[must_use]
    pub fn status(&self) -> AnswerStatus {
        self.status
    }

    #[must_use]
    pub fn selected(&self) -> Option<OptionLetter> {
        self.selected
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.status == AnswerStatus::Correct
    }
}

//
// ─── RETRY SEED ────────────────────────────────────────────────────────────────
//

/// Everything needed to start a fresh attempt with the same scope as a
/// finished one. Syllabus and difficulty are absent in section-practice
/// mode, where the question set spans a whole section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySeed {
    pub user: UserId,
    pub exam: ExamId,
    pub section: SectionId,
    pub syllabus: Option<SyllabusId>,
    pub difficulty: Option<Difficulty>,
}

//
// ─── SCORE SUMMARY ─────────────────────────────────────────────────────────────
//

/// Aggregate result of a completed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    total_questions: u32,
    correct: u32,
    incorrect: u32,
    elapsed_seconds: u32,
    completed_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreSummaryError {
    #[error("submitted answers ({submitted}) exceed total questions ({total})")]
    CountMismatch { submitted: u32, total: u32 },
}

impl ScoreSummary {
    /// Builds a summary from grading counts.
    ///
    /// # Errors
    ///
    /// Returns `ScoreSummaryError::CountMismatch` when correct + incorrect
    /// exceeds the question count.
    pub fn new(
        total_questions: u32,
        correct: u32,
        incorrect: u32,
        elapsed_seconds: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ScoreSummaryError> {
        let submitted = correct.saturating_add(incorrect);
        if submitted > total_questions {
            return Err(ScoreSummaryError::CountMismatch {
                submitted,
                total: total_questions,
            });
        }
        Ok(Self {
            total_questions,
            correct,
            incorrect,
            elapsed_seconds,
            completed_at,
        })
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    /// The score: one point per correct submission.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    /// Questions never submitted, visited or not.
    #[must_use]
    pub fn unanswered(&self) -> u32 {
        self.total_questions - self.correct - self.incorrect
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Score as a percentage of the full question set, rounded to whole
    /// percent. Zero for an empty set.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        (self.correct * 100 + self.total_questions / 2) / self.total_questions
    }

    /// Whether every question was answered correctly.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.total_questions > 0 && self.correct == self.total_questions
    }
}

//
// ─── ATTEMPT RECORD ────────────────────────────────────────────────────────────
//

/// A historical attempt as listed by the server, consumed read-only by the
/// performance dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub id: AttemptId,
    pub exam: ExamId,
    pub section: SectionId,
    pub syllabus: Option<SyllabusId>,
    pub difficulty: Option<Difficulty>,
    pub score: u32,
    pub total_questions: u32,
    pub total_time_seconds: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl AttemptRecord {
    /// Score as a whole percentage, zero for an empty set.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        (self.score * 100 + self.total_questions / 2) / self.total_questions
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
