//! Wire shapes for the remote service.
//!
//! DTOs mirror what the server actually sends (ids that may arrive as
//! numbers or strings, optional fields, empty strings standing in for
//! null) and convert into the strict `prep-core` model exactly once, at
//! this boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prep_core::model::{
    AnswerOption, AnswerStatus, AttemptEntry, AttemptId, AttemptRecord, Difficulty, Exam, ExamId,
    NewUser, OptionLetter, Question, QuestionId, RetrySeed, Section, SectionId, SyllabusId,
    SyllabusTopic, UserId, UserProfile,
};

use crate::error::DtoError;

//
// ─── RAW ID ────────────────────────────────────────────────────────────────────
//

/// An id field that the server may send as a JSON number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Num(u64),
    Text(String),
}

impl RawId {
    /// # Errors
    ///
    /// Returns `DtoError::BadId` when the string form is not a number.
    pub fn value(&self, field: &'static str) -> Result<u64, DtoError> {
        match self {
            RawId::Num(n) => Ok(*n),
            RawId::Text(s) => s.trim().parse().map_err(|_| DtoError::BadId {
                field,
                raw: s.clone(),
            }),
        }
    }
}

fn optional_letter(
    raw: Option<&str>,
    question: u64,
) -> Result<Option<OptionLetter>, DtoError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<OptionLetter>()
            .map(Some)
            .map_err(|_| DtoError::BadLetter {
                question,
                raw: s.to_string(),
            }),
    }
}

fn parse_difficulty(raw: &str) -> Result<Difficulty, DtoError> {
    raw.parse::<Difficulty>().map_err(|_| DtoError::BadDifficulty {
        raw: raw.to_string(),
    })
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDto {
    pub id: RawId,
    pub syllabus_id: RawId,
    pub difficulty: String,
    #[serde(alias = "question")]
    pub prompt: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    #[serde(default)]
    pub option_a_image: Option<String>,
    #[serde(default)]
    pub option_b_image: Option<String>,
    #[serde(default)]
    pub option_c_image: Option<String>,
    #[serde(default)]
    pub option_d_image: Option<String>,
    #[serde(alias = "answer")]
    pub correct_option: String,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default = "default_active", alias = "is_active")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl QuestionDto {
    /// # Errors
    ///
    /// Returns `DtoError` for malformed ids, difficulty, letters, or
    /// question content.
    pub fn into_question(self) -> Result<Question, DtoError> {
        let id = self.id.value("id")?;
        let syllabus = self.syllabus_id.value("syllabus_id")?;
        let difficulty = parse_difficulty(&self.difficulty)?;
        let correct = optional_letter(Some(self.correct_option.as_str()), id)?.ok_or(
            DtoError::MissingField {
                field: "correct_option",
            },
        )?;
        let options = [
            AnswerOption::new(self.option_a, self.option_a_image.as_deref())?,
            AnswerOption::new(self.option_b, self.option_b_image.as_deref())?,
            AnswerOption::new(self.option_c, self.option_c_image.as_deref())?,
            AnswerOption::new(self.option_d, self.option_d_image.as_deref())?,
        ];
        let created_at = self.created_at.unwrap_or_else(epoch);
        let updated_at = self.updated_at.unwrap_or(created_at);
        Ok(Question::new(
            QuestionId::new(id),
            SyllabusId::new(syllabus),
            difficulty,
            self.prompt,
            options,
            correct,
            self.explanation.unwrap_or_default(),
            self.active,
            created_at,
            updated_at,
        )?)
    }
}

//
// ─── ATTEMPT SYNC ──────────────────────────────────────────────────────────────
//

/// Request body for one visit/answer PUT.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerUpdateRequest {
    pub question_id: u64,
    pub status: u8,
    pub selected_answer: Option<String>,
}

impl From<&AttemptEntry> for AnswerUpdateRequest {
    fn from(entry: &AttemptEntry) -> Self {
        Self {
            question_id: entry.question_id().value(),
            status: entry.status().code(),
            selected_answer: entry.selected().map(|letter| letter.as_str().to_string()),
        }
    }
}

/// One per-question entry as echoed by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct AttemptEntryDto {
    pub question_id: RawId,
    pub status: u8,
    #[serde(default, alias = "selected_answer")]
    pub selected: Option<String>,
}

impl AttemptEntryDto {
    /// # Errors
    ///
    /// Returns `DtoError` for unknown status codes, bad letters, or a
    /// status/selection contradiction.
    pub fn into_entry(self) -> Result<AttemptEntry, DtoError> {
        let question = self.question_id.value("question_id")?;
        let status = AnswerStatus::from_code(self.status).ok_or(DtoError::BadStatus {
            question,
            code: self.status,
        })?;
        let selected = optional_letter(self.selected.as_deref(), question)?;
        Ok(AttemptEntry::from_parts(
            QuestionId::new(question),
            status,
            selected,
        )?)
    }
}

/// Decodes the reconciled per-question list out of a sync response.
///
/// # Errors
///
/// Propagates per-entry conversion failures.
pub fn into_entries(dtos: Vec<AttemptEntryDto>) -> Result<Vec<AttemptEntry>, DtoError> {
    dtos.into_iter().map(AttemptEntryDto::into_entry).collect()
}

//
// ─── ATTEMPT LIFECYCLE ─────────────────────────────────────────────────────────
//

/// Request body for the practice-start POST. Difficulty travels lowercased.
#[derive(Debug, Clone, Serialize)]
pub struct StartAttemptRequest {
    pub user_id: u64,
    pub exam_id: u64,
    pub section_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syllabus_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl From<&RetrySeed> for StartAttemptRequest {
    fn from(seed: &RetrySeed) -> Self {
        Self {
            user_id: seed.user.value(),
            exam_id: seed.exam.value(),
            section_id: seed.section.value(),
            syllabus_id: seed.syllabus.map(|id| id.value()),
            difficulty: seed.difficulty.map(|d| d.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartAttemptResponse {
    #[serde(alias = "attempt_detail_id", alias = "attempt_id")]
    pub id: RawId,
}

impl StartAttemptResponse {
    /// # Errors
    ///
    /// Returns `DtoError::BadId` for a non-numeric id.
    pub fn attempt_id(&self) -> Result<AttemptId, DtoError> {
        Ok(AttemptId::new(self.id.value("id")?))
    }
}

/// Request body for the finish PUT.
#[derive(Debug, Clone, Serialize)]
pub struct FinishRequest {
    pub score: u32,
    pub total_time: u32,
    pub end_time: DateTime<Utc>,
}

/// Finish response; the retry-seed tuple is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinishResponse {
    #[serde(default)]
    pub user_id: Option<RawId>,
    #[serde(default)]
    pub exam_id: Option<RawId>,
    #[serde(default)]
    pub section_id: Option<RawId>,
    #[serde(default)]
    pub syllabus_id: Option<RawId>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl FinishResponse {
    /// Extracts the retry seed if the server supplied the full tuple.
    ///
    /// # Errors
    ///
    /// Returns `DtoError` for malformed ids or difficulty.
    pub fn retry_seed(&self) -> Result<Option<RetrySeed>, DtoError> {
        let (Some(user), Some(exam), Some(section)) =
            (&self.user_id, &self.exam_id, &self.section_id)
        else {
            return Ok(None);
        };
        let syllabus = match &self.syllabus_id {
            Some(raw) => Some(SyllabusId::new(raw.value("syllabus_id")?)),
            None => None,
        };
        let difficulty = match self.difficulty.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(parse_difficulty(raw)?),
            _ => None,
        };
        Ok(Some(RetrySeed {
            user: UserId::new(user.value("user_id")?),
            exam: ExamId::new(exam.value("exam_id")?),
            section: SectionId::new(section.value("section_id")?),
            syllabus,
            difficulty,
        }))
    }
}

//
// ─── HISTORY ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize)]
pub struct AttemptRecordDto {
    pub id: RawId,
    pub exam_id: RawId,
    pub section_id: RawId,
    #[serde(default)]
    pub syllabus_id: Option<RawId>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub score: u32,
    #[serde(alias = "total_questions", default)]
    pub total: u32,
    #[serde(alias = "total_time", default)]
    pub total_time_seconds: u32,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl AttemptRecordDto {
    /// # Errors
    ///
    /// Returns `DtoError` for malformed ids or difficulty.
    pub fn into_record(self) -> Result<AttemptRecord, DtoError> {
        let syllabus = match &self.syllabus_id {
            Some(raw) => Some(SyllabusId::new(raw.value("syllabus_id")?)),
            None => None,
        };
        let difficulty = match self.difficulty.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(parse_difficulty(raw)?),
            _ => None,
        };
        Ok(AttemptRecord {
            id: AttemptId::new(self.id.value("id")?),
            exam: ExamId::new(self.exam_id.value("exam_id")?),
            section: SectionId::new(self.section_id.value("section_id")?),
            syllabus,
            difficulty,
            score: self.score,
            total_questions: self.total,
            total_time_seconds: self.total_time_seconds,
            started_at: self.start_time.unwrap_or_else(epoch),
            ended_at: self.end_time,
        })
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Deserialize)]
pub struct ExamDto {
    pub id: RawId,
    pub name: String,
    #[serde(default)]
    pub grade: Option<u8>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ExamDto {
    /// # Errors
    ///
    /// Returns `DtoError` for a malformed id or blank name.
    pub fn into_exam(self) -> Result<Exam, DtoError> {
        Ok(Exam::new(
            ExamId::new(self.id.value("id")?),
            self.name,
            self.grade,
            self.description.unwrap_or_default(),
        )?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionDto {
    pub id: RawId,
    pub exam_id: RawId,
    pub name: String,
}

impl SectionDto {
    /// # Errors
    ///
    /// Returns `DtoError` for a malformed id or blank name.
    pub fn into_section(self) -> Result<Section, DtoError> {
        Ok(Section::new(
            SectionId::new(self.id.value("id")?),
            ExamId::new(self.exam_id.value("exam_id")?),
            self.name,
        )?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyllabusDto {
    pub id: RawId,
    pub section_id: RawId,
    pub name: String,
}

impl SyllabusDto {
    /// # Errors
    ///
    /// Returns `DtoError` for a malformed id or blank name.
    pub fn into_topic(self) -> Result<SyllabusTopic, DtoError> {
        Ok(SyllabusTopic::new(
            SyllabusId::new(self.id.value("id")?),
            SectionId::new(self.section_id.value("section_id")?),
            self.name,
        )?)
    }
}

//
// ─── AUTH ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<u8>,
}

impl From<&NewUser> for RegisterRequest {
    fn from(new_user: &NewUser) -> Self {
        Self {
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password: new_user.password.clone(),
            grade: new_user.grade,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    pub id: RawId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub grade: Option<u8>,
}

impl UserDto {
    /// # Errors
    ///
    /// Returns `DtoError` for a malformed id or invalid profile fields.
    pub fn into_profile(self) -> Result<UserProfile, DtoError> {
        Ok(UserProfile::new(
            UserId::new(self.id.value("id")?),
            self.name,
            self.email,
            self.grade,
        )?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
