use std::sync::Arc;

use api::gateway::{AttemptGateway, CatalogGateway};
use prep_core::Clock;
use prep_core::model::{
    AttemptId, Difficulty, ExamId, RetrySeed, ScoreSummary, SectionId, SyllabusId, UserId,
};

use super::machine::AttemptMachine;
use crate::error::AttemptError;

//
// ─── PRACTICE ATTEMPT ──────────────────────────────────────────────────────────
//

/// One live attempt: the server-issued id, the scope it was started with,
/// and the local state machine.
#[derive(Debug)]
pub struct PracticeAttempt {
    id: AttemptId,
    seed: RetrySeed,
    machine: AttemptMachine,
    retry_seed: Option<RetrySeed>,
}

impl PracticeAttempt {
    #[must_use]
    pub fn id(&self) -> AttemptId {
        self.id
    }

    #[must_use]
    pub fn seed(&self) -> RetrySeed {
        self.seed
    }

    #[must_use]
    pub fn machine(&self) -> &AttemptMachine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut AttemptMachine {
        &mut self.machine
    }

    /// The scope to reuse for a fresh attempt, once captured at finish.
    #[must_use]
    pub fn retry_seed(&self) -> Option<RetrySeed> {
        self.retry_seed
    }
}

/// What `finish` hands the summary screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptOutcome {
    pub summary: ScoreSummary,
    pub retry_seed: RetrySeed,
}

//
// ─── ATTEMPT LOOP SERVICE ──────────────────────────────────────────────────────
//

/// Orchestrates attempt start, per-question synchronization, finish, and
/// retry.
///
/// Sync policy: visit and answer PUTs are optimistic. The local transition
/// is applied first; a failed PUT is logged and otherwise ignored, so
/// navigation never blocks on the network. A successful PUT's reconciled
/// entry list replaces the local classifications wholesale.
#[derive(Clone)]
pub struct AttemptLoopService {
    clock: Clock,
    attempts: Arc<dyn AttemptGateway>,
    catalog: Arc<dyn CatalogGateway>,
}

impl AttemptLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        attempts: Arc<dyn AttemptGateway>,
        catalog: Arc<dyn CatalogGateway>,
    ) -> Self {
        Self {
            clock,
            attempts,
            catalog,
        }
    }

    /// Start syllabus practice: one topic, one difficulty.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Empty` for an empty question set and
    /// `AttemptError::Api` when the question fetch or start POST fails —
    /// these are data-loading paths, so failures surface.
    pub async fn start_syllabus_practice(
        &self,
        user: UserId,
        exam: ExamId,
        section: SectionId,
        syllabus: SyllabusId,
        difficulty: Difficulty,
    ) -> Result<PracticeAttempt, AttemptError> {
        let seed = RetrySeed {
            user,
            exam,
            section,
            syllabus: Some(syllabus),
            difficulty: Some(difficulty),
        };
        self.start_from_seed(seed).await
    }

    /// Start section practice: every topic of one section, all difficulties.
    ///
    /// # Errors
    ///
    /// Same as [`start_syllabus_practice`](Self::start_syllabus_practice).
    pub async fn start_section_practice(
        &self,
        user: UserId,
        exam: ExamId,
        section: SectionId,
    ) -> Result<PracticeAttempt, AttemptError> {
        let seed = RetrySeed {
            user,
            exam,
            section,
            syllabus: None,
            difficulty: None,
        };
        self.start_from_seed(seed).await
    }

    /// Start an attempt for an arbitrary scope. Creates the server record,
    /// builds a fresh machine, and syncs the first question's visit.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` for fetch/start failures or an empty set.
    pub async fn start_from_seed(&self, seed: RetrySeed) -> Result<PracticeAttempt, AttemptError> {
        let questions = self.fetch_questions(&seed).await?;
        let mut machine = AttemptMachine::new(questions)?;
        let id = self.attempts.start_attempt(&seed).await?;

        // The first question is on screen as soon as the set loads, so its
        // visit is recorded right away.
        let first_visit = machine.visit_current();
        let mut attempt = PracticeAttempt {
            id,
            seed,
            machine,
            retry_seed: None,
        };
        if let Some(entry) = first_visit {
            self.sync_entry(&mut attempt, entry).await;
        }
        Ok(attempt)
    }

    /// Rebuild a live attempt around an id issued earlier, after a
    /// relaunch. Fetches the same question set but reuses the existing
    /// server record instead of creating one. The rebuilt machine starts
    /// blank; the next successful sync's reconciled list pulls the
    /// server-side answers back in.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` for fetch failures or an empty set.
    pub async fn resume_attempt(
        &self,
        id: AttemptId,
        seed: RetrySeed,
    ) -> Result<PracticeAttempt, AttemptError> {
        let questions = self.fetch_questions(&seed).await?;
        let mut machine = AttemptMachine::new(questions)?;
        // The server recorded the first question's visit when the attempt
        // originally started, so nothing is pushed here.
        machine.visit_current();
        Ok(PracticeAttempt {
            id,
            seed,
            machine,
            retry_seed: None,
        })
    }

    /// Move to a question by index, syncing a first visit.
    pub async fn go_to(&self, attempt: &mut PracticeAttempt, index: usize) {
        if let Some(entry) = attempt.machine.go_to(index) {
            self.sync_entry(attempt, entry).await;
        }
    }

    /// Move to the next question, syncing a first visit.
    pub async fn advance(&self, attempt: &mut PracticeAttempt) {
        if let Some(entry) = attempt.machine.advance() {
            self.sync_entry(attempt, entry).await;
        }
    }

    /// Submit the current question's tentative choice. Returns whether a
    /// submission actually happened (false is the silent no-op).
    pub async fn submit_current(&self, attempt: &mut PracticeAttempt) -> bool {
        let Some(entry) = attempt.machine.submit_current() else {
            return false;
        };
        self.sync_entry(attempt, entry).await;
        true
    }

    /// Finalize the attempt: freeze the machine, PUT the aggregate, and
    /// capture the retry seed (the server's echo when present, the local
    /// scope otherwise).
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Completed` if the attempt was already
    /// finished. A failed finish PUT follows the sync policy: logged,
    /// ignored, and the locally-known seed stands in.
    pub async fn finish(&self, attempt: &mut PracticeAttempt) -> Result<AttemptOutcome, AttemptError> {
        let now = self.clock.now();
        let summary = attempt.machine.finish(now)?;

        let retry_seed = match self
            .attempts
            .finish_attempt(attempt.id, &summary, now)
            .await
        {
            Ok(echoed) => echoed.unwrap_or(attempt.seed),
            Err(err) => {
                tracing::warn!(attempt = %attempt.id, error = %err, "finish sync failed");
                attempt.seed
            }
        };
        attempt.retry_seed = Some(retry_seed);
        Ok(AttemptOutcome {
            summary,
            retry_seed,
        })
    }

    /// Start a brand-new attempt with the same scope as a finished one.
    /// The old attempt id is never reused or reset.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` for fetch/start failures.
    pub async fn retry(&self, attempt: &PracticeAttempt) -> Result<PracticeAttempt, AttemptError> {
        let seed = attempt.retry_seed.unwrap_or(attempt.seed);
        self.start_from_seed(seed).await
    }

    async fn fetch_questions(
        &self,
        seed: &RetrySeed,
    ) -> Result<Vec<prep_core::model::Question>, AttemptError> {
        match (seed.syllabus, seed.difficulty) {
            (Some(syllabus), Some(difficulty)) => {
                Ok(self.catalog.syllabus_questions(syllabus, difficulty).await?)
            }
            _ => Ok(self.catalog.section_questions(seed.section).await?),
        }
    }

    async fn sync_entry(
        &self,
        attempt: &mut PracticeAttempt,
        entry: prep_core::model::AttemptEntry,
    ) {
        match self.attempts.push_entry(attempt.id, &entry).await {
            Ok(entries) => attempt.machine.reconcile(&entries),
            Err(err) => {
                // Optimistic local state stands; nothing is rolled back and
                // nothing is retried.
                tracing::warn!(
                    attempt = %attempt.id,
                    question = %entry.question_id(),
                    error = %err,
                    "attempt sync failed"
                );
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use api::InMemoryApi;
    use prep_core::model::{AnswerOption, AnswerStatus, OptionLetter, Question, QuestionId};
    use prep_core::time::{fixed_clock, fixed_now};

    fn build_question(id: u64, correct: OptionLetter) -> Question {
        let options = [
            AnswerOption::new("one", None).unwrap(),
            AnswerOption::new("two", None).unwrap(),
            AnswerOption::new("three", None).unwrap(),
            AnswerOption::new("four", None).unwrap(),
        ];
        let now = fixed_now();
        Question::new(
            QuestionId::new(id),
            SyllabusId::new(1),
            Difficulty::Easy,
            format!("Question {id}"),
            options,
            correct,
            "",
            true,
            now,
            now,
        )
        .unwrap()
    }

    fn build_service(api: &InMemoryApi) -> AttemptLoopService {
        let gateway: Arc<dyn AttemptGateway> = Arc::new(api.clone());
        let catalog: Arc<dyn CatalogGateway> = Arc::new(api.clone());
        AttemptLoopService::new(fixed_clock(), gateway, catalog)
    }

    fn seed_five_questions(api: &InMemoryApi) {
        api.add_questions((1..=5).map(|id| build_question(id, OptionLetter::A)));
    }

    async fn start(service: &AttemptLoopService) -> PracticeAttempt {
        service
            .start_syllabus_practice(
                UserId::new(1),
                ExamId::new(1),
                SectionId::new(1),
                SyllabusId::new(1),
                Difficulty::Easy,
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn start_syncs_the_first_visit() {
        let api = InMemoryApi::new();
        seed_five_questions(&api);
        let service = build_service(&api);

        let attempt = start(&service).await;

        let entries = api.entries(attempt.id()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status(), AnswerStatus::Visited);
        assert_eq!(
            attempt.machine().visited_unanswered_indices(),
            vec![0]
        );
    }

    #[tokio::test]
    async fn empty_scope_fails_before_creating_a_record() {
        let api = InMemoryApi::new();
        let service = build_service(&api);

        let err = service
            .start_syllabus_practice(
                UserId::new(1),
                ExamId::new(1),
                SectionId::new(1),
                SyllabusId::new(1),
                Difficulty::Hard,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AttemptError::Empty));
        assert_eq!(api.attempt_count(), 0);
    }

    #[tokio::test]
    async fn submit_pushes_a_graded_entry_and_reconciles() {
        let api = InMemoryApi::new();
        seed_five_questions(&api);
        let service = build_service(&api);
        let mut attempt = start(&service).await;

        attempt.machine_mut().select_option(0);
        assert!(service.submit_current(&mut attempt).await);

        let entries = api.entries(attempt.id()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_correct());
        assert_eq!(attempt.machine().submitted_indices(), vec![0]);
    }

    #[tokio::test]
    async fn submit_without_selection_pushes_nothing() {
        let api = InMemoryApi::new();
        seed_five_questions(&api);
        let service = build_service(&api);
        let mut attempt = start(&service).await;

        assert!(!service.submit_current(&mut attempt).await);
        assert_eq!(api.entries(attempt.id()).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn revisit_does_not_push_a_second_visit() {
        let api = InMemoryApi::new();
        seed_five_questions(&api);
        let service = build_service(&api);
        let mut attempt = start(&service).await;

        service.go_to(&mut attempt, 2).await;
        service.go_to(&mut attempt, 0).await;
        service.go_to(&mut attempt, 2).await;

        // Q1 and Q3 each synced exactly one visit entry.
        assert_eq!(api.entries(attempt.id()).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_answer_sync_keeps_optimistic_state() {
        // Scenario D: HTTP 500 on the answer PUT.
        let api = InMemoryApi::new();
        seed_five_questions(&api);
        let service = build_service(&api);
        let mut attempt = start(&service).await;

        attempt.machine_mut().select_option(0);
        api.fail_next_sync();
        assert!(service.submit_current(&mut attempt).await);

        // Locally submitted, server never saw the answer.
        assert_eq!(attempt.machine().submitted_indices(), vec![0]);
        let entries = api.entries(attempt.id()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status(), AnswerStatus::Visited);

        // Navigation proceeds unaffected.
        service.advance(&mut attempt).await;
        assert_eq!(attempt.machine().current_index(), 1);
    }

    #[tokio::test]
    async fn scenario_a_partial_run() {
        let api = InMemoryApi::new();
        seed_five_questions(&api);
        let service = build_service(&api);
        let mut attempt = start(&service).await;

        attempt.machine_mut().select_option(0);
        service.submit_current(&mut attempt).await;

        service.advance(&mut attempt).await;
        attempt.machine_mut().select_option(1);
        service.submit_current(&mut attempt).await;

        service.go_to(&mut attempt, 4).await;

        let outcome = service.finish(&mut attempt).await.unwrap();
        assert_eq!(outcome.summary.score(), 1);
        assert_eq!(outcome.summary.incorrect(), 1);
        assert_eq!(attempt.machine().not_visited_indices(), vec![2, 3]);
        assert_eq!(attempt.machine().visited_unanswered_indices(), vec![4]);

        let recorded = api.finished_summary(attempt.id()).unwrap();
        assert_eq!(recorded.score(), 1);
    }

    #[tokio::test]
    async fn finish_reports_timer_seconds() {
        let api = InMemoryApi::new();
        seed_five_questions(&api);
        let service = build_service(&api);
        let mut attempt = start(&service).await;

        for _ in 0..90 {
            attempt.machine_mut().tick();
        }
        let outcome = service.finish(&mut attempt).await.unwrap();
        assert_eq!(outcome.summary.elapsed_seconds(), 90);
    }

    #[tokio::test]
    async fn retry_yields_a_fresh_attempt() {
        // Scenario C.
        let api = InMemoryApi::new();
        seed_five_questions(&api);
        let service = build_service(&api);
        let mut attempt = start(&service).await;

        attempt.machine_mut().select_option(0);
        service.submit_current(&mut attempt).await;
        service.finish(&mut attempt).await.unwrap();

        let fresh = service.retry(&attempt).await.unwrap();
        assert_ne!(fresh.id(), attempt.id());
        assert!(fresh.machine().submitted_indices().is_empty());
        assert_eq!(fresh.machine().current_index(), 0);
        assert_eq!(fresh.machine().elapsed_seconds(), 0);
        assert_eq!(fresh.seed(), attempt.seed());
    }

    #[tokio::test]
    async fn resume_reuses_the_server_record() {
        let api = InMemoryApi::new();
        seed_five_questions(&api);
        let service = build_service(&api);
        let mut attempt = start(&service).await;

        attempt.machine_mut().select_option(0);
        service.submit_current(&mut attempt).await;

        let mut resumed = service
            .resume_attempt(attempt.id(), attempt.seed())
            .await
            .unwrap();
        assert_eq!(resumed.id(), attempt.id());
        assert_eq!(api.attempt_count(), 1);

        // The rebuilt machine starts blank; the next sync's reconciled
        // list restores the answer recorded before the relaunch.
        assert!(resumed.machine().submitted_indices().is_empty());
        service.go_to(&mut resumed, 1).await;
        assert_eq!(resumed.machine().submitted_indices(), vec![0]);
    }

    #[tokio::test]
    async fn finish_stamps_the_clock_time() {
        let api = InMemoryApi::new();
        seed_five_questions(&api);
        let mut clock = fixed_clock();
        clock.advance(chrono::Duration::seconds(90));
        let gateway: Arc<dyn AttemptGateway> = Arc::new(api.clone());
        let catalog: Arc<dyn CatalogGateway> = Arc::new(api.clone());
        let service = AttemptLoopService::new(clock, gateway, catalog);
        let mut attempt = start(&service).await;

        let outcome = service.finish(&mut attempt).await.unwrap();
        assert_eq!(
            outcome.summary.completed_at(),
            fixed_now() + chrono::Duration::seconds(90)
        );
    }

    #[tokio::test]
    async fn finish_twice_is_rejected() {
        let api = InMemoryApi::new();
        seed_five_questions(&api);
        let service = build_service(&api);
        let mut attempt = start(&service).await;

        service.finish(&mut attempt).await.unwrap();
        let err = service.finish(&mut attempt).await.unwrap_err();
        assert!(matches!(err, AttemptError::Completed));
    }
}
