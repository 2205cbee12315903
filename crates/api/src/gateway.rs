//! Gateway contracts for the remote service.
//!
//! Everything above this crate depends on these traits, never on
//! `reqwest` directly, so the HTTP client and the in-memory fake are
//! interchangeable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use prep_core::model::{
    AttemptEntry, AttemptId, AttemptRecord, Difficulty, Exam, ExamId, NewUser, Question,
    RetrySeed, ScoreSummary, Section, SectionId, SyllabusId, SyllabusTopic, UserId, UserProfile,
};

use crate::error::ApiError;

/// Read-only catalog and question-set access.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// List every exam.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport, status, or decoding failures.
    async fn list_exams(&self) -> Result<Vec<Exam>, ApiError>;

    /// List the sections of an exam.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport, status, or decoding failures.
    async fn list_sections(&self, exam: ExamId) -> Result<Vec<Section>, ApiError>;

    /// List the syllabus topics of a section.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport, status, or decoding failures.
    async fn list_topics(&self, section: SectionId) -> Result<Vec<SyllabusTopic>, ApiError>;

    /// Question set for syllabus practice, filtered to one difficulty.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport, status, or decoding failures.
    async fn syllabus_questions(
        &self,
        syllabus: SyllabusId,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, ApiError>;

    /// Question set for whole-section practice.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport, status, or decoding failures.
    async fn section_questions(&self, section: SectionId) -> Result<Vec<Question>, ApiError>;
}

/// Attempt lifecycle: start, per-question sync, finish, history.
#[async_trait]
pub trait AttemptGateway: Send + Sync {
    /// Create a server-side attempt record and return its id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport, status, or decoding failures.
    async fn start_attempt(&self, seed: &RetrySeed) -> Result<AttemptId, ApiError>;

    /// Record one question's visit or answer. The response is the server's
    /// authoritative, reconciled per-question list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport, status, or decoding failures.
    async fn push_entry(
        &self,
        attempt: AttemptId,
        entry: &AttemptEntry,
    ) -> Result<Vec<AttemptEntry>, ApiError>;

    /// Finalize an attempt. The server may echo the retry-seed tuple.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport, status, or decoding failures.
    async fn finish_attempt(
        &self,
        attempt: AttemptId,
        summary: &ScoreSummary,
        end_time: DateTime<Utc>,
    ) -> Result<Option<RetrySeed>, ApiError>;

    /// One page of a user's historical attempts.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport, status, or decoding failures.
    async fn list_attempts(&self, user: UserId, page: u32)
        -> Result<Vec<AttemptRecord>, ApiError>;
}

/// Account access.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for the user's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::HttpStatus` for rejected credentials, or other
    /// transport/decoding failures.
    async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError>;

    /// Create an account and return the resulting profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport, status, or decoding failures.
    async fn register(&self, new_user: &NewUser) -> Result<UserProfile, ApiError>;
}
