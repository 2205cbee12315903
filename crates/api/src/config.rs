use std::env;

use prep_core::model::{AttemptId, ExamId, SectionId, SyllabusId, UserId};

/// Where the remote service lives and how its endpoints are spelled.
///
/// All URL construction happens here so path patterns exist in exactly one
/// place.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Builds a config for the given base address, trimming any trailing
    /// slash.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Reads `PREP_API_URL`, if set and non-blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let raw = env::var("PREP_API_URL").ok()?;
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self::new(raw))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ─── Attempt endpoints ─────────────────────────────────────────────────

    #[must_use]
    pub fn start_attempt_url(&self) -> String {
        format!("{}/user_practice_exam", self.base_url)
    }

    #[must_use]
    pub fn attempt_detail_url(&self, attempt: AttemptId) -> String {
        format!("{}/practice_exam_attempt_details/{attempt}", self.base_url)
    }

    #[must_use]
    pub fn attempt_finish_url(&self, attempt: AttemptId) -> String {
        format!(
            "{}/practice_exam_attempt_details_finish/{attempt}",
            self.base_url
        )
    }

    #[must_use]
    pub fn attempt_history_url(&self, user: UserId, page: u32) -> String {
        format!(
            "{}/users/{user}/practice_exam_attempts?page={page}",
            self.base_url
        )
    }

    // ─── Question-set endpoints (the two practice modes) ───────────────────

    #[must_use]
    pub fn syllabus_questions_url(&self, syllabus: SyllabusId) -> String {
        format!("{}/syllabus/{syllabus}/questions", self.base_url)
    }

    #[must_use]
    pub fn section_questions_url(&self, section: SectionId) -> String {
        format!("{}/sections/{section}/questions", self.base_url)
    }

    // ─── Catalog endpoints ─────────────────────────────────────────────────

    #[must_use]
    pub fn exams_url(&self) -> String {
        format!("{}/exams", self.base_url)
    }

    #[must_use]
    pub fn exam_sections_url(&self, exam: ExamId) -> String {
        format!("{}/exams/{exam}/sections", self.base_url)
    }

    #[must_use]
    pub fn section_syllabus_url(&self, section: SectionId) -> String {
        format!("{}/sections/{section}/syllabus", self.base_url)
    }

    // ─── Auth endpoints ────────────────────────────────────────────────────

    #[must_use]
    pub fn login_url(&self) -> String {
        format!("{}/login", self.base_url)
    }

    #[must_use]
    pub fn register_url(&self) -> String {
        format!("{}/users", self.base_url)
    }
}
