//! In-memory stand-in for the remote service, for tests and prototyping.
//!
//! Mirrors the observable contract of the real API: monotonically
//! increasing attempt ids, an authoritative per-question entry list echoed
//! on every sync, and a retry-seed tuple on finish. A scripted failure
//! switch makes the silent-failure sync paths testable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;

use prep_core::model::{
    AttemptEntry, AttemptId, AttemptRecord, Difficulty, Exam, ExamId, NewUser, Question,
    RetrySeed, ScoreSummary, Section, SectionId, SyllabusId, SyllabusTopic, UserId, UserProfile,
};

use crate::error::ApiError;
use crate::gateway::{AttemptGateway, AuthGateway, CatalogGateway};

#[derive(Debug, Clone)]
struct FakeAttempt {
    seed: RetrySeed,
    entries: Vec<AttemptEntry>,
    finished: Option<ScoreSummary>,
}

#[derive(Debug, Default)]
struct FakeState {
    next_attempt_id: u64,
    next_user_id: u64,
    attempts: HashMap<AttemptId, FakeAttempt>,
    exams: Vec<Exam>,
    sections: Vec<Section>,
    topics: Vec<SyllabusTopic>,
    questions: Vec<Question>,
    users: Vec<(UserProfile, String)>,
    records: HashMap<UserId, Vec<AttemptRecord>>,
    fail_next_sync: bool,
}

/// Fake remote service backed by mutexed maps.
#[derive(Clone, Default)]
pub struct InMemoryApi {
    state: Arc<Mutex<FakeState>>,
}

impl InMemoryApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ─── Seeding ───────────────────────────────────────────────────────────

    pub fn add_exam(&self, exam: Exam) {
        self.lock().exams.push(exam);
    }

    pub fn add_section(&self, section: Section) {
        self.lock().sections.push(section);
    }

    pub fn add_topic(&self, topic: SyllabusTopic) {
        self.lock().topics.push(topic);
    }

    pub fn add_questions(&self, questions: impl IntoIterator<Item = Question>) {
        self.lock().questions.extend(questions);
    }

    pub fn add_user(&self, profile: UserProfile, password: impl Into<String>) {
        let mut state = self.lock();
        state.next_user_id = state.next_user_id.max(profile.id().value());
        state.users.push((profile, password.into()));
    }

    pub fn add_records(&self, user: UserId, records: impl IntoIterator<Item = AttemptRecord>) {
        self.lock().records.entry(user).or_default().extend(records);
    }

    /// Make the next `push_entry` call answer with HTTP 500.
    pub fn fail_next_sync(&self) {
        self.lock().fail_next_sync = true;
    }

    // ─── Inspection ────────────────────────────────────────────────────────

    /// The server-side entry list for an attempt, if it exists.
    #[must_use]
    pub fn entries(&self, attempt: AttemptId) -> Option<Vec<AttemptEntry>> {
        self.lock()
            .attempts
            .get(&attempt)
            .map(|record| record.entries.clone())
    }

    /// The recorded final summary for an attempt, if finished.
    #[must_use]
    pub fn finished_summary(&self, attempt: AttemptId) -> Option<ScoreSummary> {
        self.lock()
            .attempts
            .get(&attempt)
            .and_then(|record| record.finished)
    }

    /// How many attempts have been started so far.
    #[must_use]
    pub fn attempt_count(&self) -> usize {
        self.lock().attempts.len()
    }
}

#[async_trait]
impl CatalogGateway for InMemoryApi {
    async fn list_exams(&self) -> Result<Vec<Exam>, ApiError> {
        Ok(self.lock().exams.clone())
    }

    async fn list_sections(&self, exam: ExamId) -> Result<Vec<Section>, ApiError> {
        Ok(self
            .lock()
            .sections
            .iter()
            .filter(|section| section.exam_id() == exam)
            .cloned()
            .collect())
    }

    async fn list_topics(&self, section: SectionId) -> Result<Vec<SyllabusTopic>, ApiError> {
        Ok(self
            .lock()
            .topics
            .iter()
            .filter(|topic| topic.section_id() == section)
            .cloned()
            .collect())
    }

    async fn syllabus_questions(
        &self,
        syllabus: SyllabusId,
        difficulty: Difficulty,
    ) -> Result<Vec<Question>, ApiError> {
        Ok(self
            .lock()
            .questions
            .iter()
            .filter(|question| {
                question.syllabus_id() == syllabus && question.difficulty() == difficulty
            })
            .cloned()
            .collect())
    }

    async fn section_questions(&self, section: SectionId) -> Result<Vec<Question>, ApiError> {
        let state = self.lock();
        let syllabi: Vec<SyllabusId> = state
            .topics
            .iter()
            .filter(|topic| topic.section_id() == section)
            .map(SyllabusTopic::id)
            .collect();
        Ok(state
            .questions
            .iter()
            .filter(|question| syllabi.contains(&question.syllabus_id()))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AttemptGateway for InMemoryApi {
    async fn start_attempt(&self, seed: &RetrySeed) -> Result<AttemptId, ApiError> {
        let mut state = self.lock();
        state.next_attempt_id += 1;
        let id = AttemptId::new(state.next_attempt_id);
        state.attempts.insert(
            id,
            FakeAttempt {
                seed: *seed,
                entries: Vec::new(),
                finished: None,
            },
        );
        Ok(id)
    }

    async fn push_entry(
        &self,
        attempt: AttemptId,
        entry: &AttemptEntry,
    ) -> Result<Vec<AttemptEntry>, ApiError> {
        let mut state = self.lock();
        if state.fail_next_sync {
            state.fail_next_sync = false;
            return Err(ApiError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR));
        }
        let record = state
            .attempts
            .get_mut(&attempt)
            .ok_or(ApiError::HttpStatus(StatusCode::NOT_FOUND))?;
        match record
            .entries
            .iter_mut()
            .find(|existing| existing.question_id() == entry.question_id())
        {
            Some(existing) => *existing = *entry,
            None => record.entries.push(*entry),
        }
        Ok(record.entries.clone())
    }

    async fn finish_attempt(
        &self,
        attempt: AttemptId,
        summary: &ScoreSummary,
        _end_time: DateTime<Utc>,
    ) -> Result<Option<RetrySeed>, ApiError> {
        let mut state = self.lock();
        let record = state
            .attempts
            .get_mut(&attempt)
            .ok_or(ApiError::HttpStatus(StatusCode::NOT_FOUND))?;
        record.finished = Some(*summary);
        Ok(Some(record.seed))
    }

    async fn list_attempts(
        &self,
        user: UserId,
        page: u32,
    ) -> Result<Vec<AttemptRecord>, ApiError> {
        const PAGE_SIZE: usize = 10;
        let state = self.lock();
        let records = state.records.get(&user).cloned().unwrap_or_default();
        let start = (page as usize).saturating_sub(1) * PAGE_SIZE;
        Ok(records.into_iter().skip(start).take(PAGE_SIZE).collect())
    }
}

#[async_trait]
impl AuthGateway for InMemoryApi {
    async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        self.lock()
            .users
            .iter()
            .find(|(profile, stored)| profile.email() == email && stored == password)
            .map(|(profile, _)| profile.clone())
            .ok_or(ApiError::HttpStatus(StatusCode::UNAUTHORIZED))
    }

    async fn register(&self, new_user: &NewUser) -> Result<UserProfile, ApiError> {
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|(profile, _)| profile.email() == new_user.email)
        {
            return Err(ApiError::HttpStatus(StatusCode::CONFLICT));
        }
        state.next_user_id += 1;
        let profile = UserProfile::new(
            UserId::new(state.next_user_id),
            new_user.name.clone(),
            new_user.email.clone(),
            new_user.grade,
        )
        .map_err(crate::error::DtoError::from)?;
        state.users.push((profile.clone(), new_user.password.clone()));
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::model::OptionLetter;
    use prep_core::time::fixed_now;

    fn build_seed() -> RetrySeed {
        RetrySeed {
            user: UserId::new(1),
            exam: ExamId::new(1),
            section: SectionId::new(1),
            syllabus: Some(SyllabusId::new(1)),
            difficulty: Some(Difficulty::Easy),
        }
    }

    #[tokio::test]
    async fn attempt_ids_are_fresh_and_monotonic() {
        let api = InMemoryApi::new();
        let first = api.start_attempt(&build_seed()).await.unwrap();
        let second = api.start_attempt(&build_seed()).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(api.attempt_count(), 2);
    }

    #[tokio::test]
    async fn push_entry_upserts_by_question() {
        let api = InMemoryApi::new();
        let attempt = api.start_attempt(&build_seed()).await.unwrap();

        let visit = AttemptEntry::visited(prep_core::model::QuestionId::new(7));
        let echoed = api.push_entry(attempt, &visit).await.unwrap();
        assert_eq!(echoed.len(), 1);

        let answer = AttemptEntry::graded(
            prep_core::model::QuestionId::new(7),
            OptionLetter::A,
            OptionLetter::A,
        );
        let echoed = api.push_entry(attempt, &answer).await.unwrap();
        assert_eq!(echoed.len(), 1);
        assert!(echoed[0].is_correct());
    }

    #[tokio::test]
    async fn scripted_failure_hits_exactly_once() {
        let api = InMemoryApi::new();
        let attempt = api.start_attempt(&build_seed()).await.unwrap();
        api.fail_next_sync();

        let visit = AttemptEntry::visited(prep_core::model::QuestionId::new(1));
        let err = api.push_entry(attempt, &visit).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR)
        ));

        assert!(api.push_entry(attempt, &visit).await.is_ok());
    }

    #[tokio::test]
    async fn finish_echoes_the_seed() {
        let api = InMemoryApi::new();
        let seed = build_seed();
        let attempt = api.start_attempt(&seed).await.unwrap();
        let summary = ScoreSummary::new(5, 3, 1, 120, fixed_now()).unwrap();

        let echoed = api
            .finish_attempt(attempt, &summary, fixed_now())
            .await
            .unwrap();
        assert_eq!(echoed, Some(seed));
        assert_eq!(api.finished_summary(attempt), Some(summary));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let api = InMemoryApi::new();
        let profile =
            UserProfile::new(UserId::new(1), "Ada", "ada@example.com", Some(9)).unwrap();
        api.add_user(profile, "secret");

        let err = api.login("ada@example.com", "wrong").await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::HttpStatus(StatusCode::UNAUTHORIZED)
        ));
        assert!(api.login("ada@example.com", "secret").await.is_ok());
    }
}
