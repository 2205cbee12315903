mod attempt;
mod catalog;
mod ids;
mod question;
mod user;

pub use ids::{
    AttemptId, ExamId, ParseIdError, QuestionId, SectionId, SyllabusId, UserId,
};

pub use attempt::{
    AnswerStatus, AttemptEntry, AttemptEntryError, AttemptRecord, RetrySeed, ScoreSummary,
    ScoreSummaryError,
};
pub use catalog::{CatalogItemError, Exam, Section, SyllabusTopic};
pub use question::{
    AnswerOption, Difficulty, OptionLetter, ParseDifficultyError, ParseOptionLetterError,
    Question, QuestionError,
};
pub use user::{NewUser, UserError, UserProfile};
