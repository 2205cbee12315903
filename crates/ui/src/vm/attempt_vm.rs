use prep_core::model::{
    AttemptId, Difficulty, ExamId, OptionLetter, RetrySeed, SectionId, SyllabusId, UserId,
};
use services::{
    AttemptError, AttemptLoopService, AttemptOutcome, AuthService, PracticeAttempt,
    QuestionState, ResumePoint,
};

use crate::views::ViewError;
use crate::vm::time_fmt::format_elapsed;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptIntent {
    Select(usize),
    Submit,
    Next,
    Jump(usize),
    Finish,
    Retry,
}

/// One answer option as the question page renders it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub letter: &'static str,
    pub text: String,
    pub class: &'static str,
}

/// One cell of the question palette.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteCellVm {
    pub index: usize,
    pub label: String,
    pub class: String,
}

/// Wraps a live attempt for the question page and, once finished, the
/// summary screen.
pub struct AttemptVm {
    attempt: PracticeAttempt,
    outcome: Option<AttemptOutcome>,
}

impl AttemptVm {
    #[must_use]
    pub fn new(attempt: PracticeAttempt) -> Self {
        Self {
            attempt,
            outcome: None,
        }
    }

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt.id()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<AttemptOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        self.attempt.machine().current_question().prompt()
    }

    /// The explanation, shown only after the current question is graded.
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.attempt
            .machine()
            .current_result()
            .map(|_| self.attempt.machine().current_question().explanation())
    }

    /// Whether the current question's submission was correct, once graded.
    #[must_use]
    pub fn current_result(&self) -> Option<bool> {
        self.attempt.machine().current_result()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.attempt.machine().is_last_question()
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.attempt.machine().current_result().is_none()
            && self.attempt.machine().selected_option().is_some()
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        let machine = self.attempt.machine();
        format!(
            "Question {} of {}",
            machine.current_index() + 1,
            machine.question_count()
        )
    }

    #[must_use]
    pub fn elapsed_label(&self) -> String {
        format_elapsed(self.attempt.machine().elapsed_seconds())
    }

    /// Advance the count-up timer by one second.
    pub fn tick(&mut self) {
        self.attempt.machine_mut().tick();
    }

    #[must_use]
    pub fn options(&self) -> Vec<OptionVm> {
        let machine = self.attempt.machine();
        let question = machine.current_question();
        let selected = machine.selected_option();
        let submitted = machine.state(machine.current_index()).and_then(|state| {
            if let QuestionState::Submitted { choice, .. } = state {
                Some(choice)
            } else {
                None
            }
        });

        question
            .options()
            .iter()
            .enumerate()
            .map(|(index, option)| {
                // The unwrap can't fire: options() yields exactly four.
                let letter = OptionLetter::from_index(index).unwrap_or(OptionLetter::A);
                OptionVm {
                    index,
                    letter: letter.as_str(),
                    text: option.text().to_string(),
                    class: option_class(letter, selected, submitted, question.correct()),
                }
            })
            .collect()
    }

    #[must_use]
    pub fn palette(&self) -> Vec<PaletteCellVm> {
        let machine = self.attempt.machine();
        (0..machine.question_count())
            .map(|index| PaletteCellVm {
                index,
                label: (index + 1).to_string(),
                class: palette_class(machine.state(index), index == machine.current_index()),
            })
            .collect()
    }

    /// Drive one user intent through the service.
    ///
    /// `Next` on a graded last question finishes the attempt, matching the
    /// explicit Finish button. Finishing clears the persisted resume
    /// point; a retry replaces it with the fresh attempt.
    ///
    /// # Errors
    ///
    /// Returns `ViewError` only for the data-loading paths (`Finish` on an
    /// already-finished attempt, `Retry` fetch failures). Sync failures on
    /// navigation and submission never surface here.
    pub async fn apply(
        &mut self,
        service: &AttemptLoopService,
        auth: &AuthService,
        intent: AttemptIntent,
    ) -> Result<(), ViewError> {
        let machine = self.attempt.machine();
        let intent = if intent == AttemptIntent::Next
            && machine.is_last_question()
            && machine.current_result().is_some()
        {
            AttemptIntent::Finish
        } else {
            intent
        };
        match intent {
            AttemptIntent::Select(index) => {
                self.attempt.machine_mut().select_option(index);
            }
            AttemptIntent::Submit => {
                service.submit_current(&mut self.attempt).await;
            }
            AttemptIntent::Next => {
                service.advance(&mut self.attempt).await;
            }
            AttemptIntent::Jump(index) => {
                service.go_to(&mut self.attempt, index).await;
            }
            AttemptIntent::Finish => {
                let outcome = service
                    .finish(&mut self.attempt)
                    .await
                    .map_err(view_error)?;
                self.outcome = Some(outcome);
                // A session write failure never blocks practice.
                let _ = auth.set_resume_attempt(None);
            }
            AttemptIntent::Retry => {
                let fresh = service.retry(&self.attempt).await.map_err(view_error)?;
                let _ = auth.set_resume_attempt(Some(ResumePoint {
                    attempt: fresh.id(),
                    seed: fresh.seed(),
                }));
                self.attempt = fresh;
                self.outcome = None;
            }
        }
        Ok(())
    }
}

//
// ─── PURE HELPERS ──────────────────────────────────────────────────────────────
//

fn view_error(err: AttemptError) -> ViewError {
    match err {
        AttemptError::Empty => ViewError::EmptyQuestionSet,
        _ => ViewError::Unknown,
    }
}

#[must_use]
pub fn palette_class(state: Option<QuestionState>, is_current: bool) -> String {
    let base = match state {
        Some(QuestionState::Submitted { .. }) => "palette--answered",
        Some(QuestionState::Visited) => "palette--visited",
        Some(QuestionState::NotVisited) | None => "palette--not-visited",
    };
    if is_current {
        format!("{base} palette--current")
    } else {
        base.to_string()
    }
}

#[must_use]
pub fn option_class(
    letter: OptionLetter,
    selected: Option<OptionLetter>,
    submitted: Option<OptionLetter>,
    correct: OptionLetter,
) -> &'static str {
    if let Some(choice) = submitted {
        if letter == correct {
            return "option option--correct";
        }
        if letter == choice {
            return "option option--incorrect";
        }
        return "option";
    }
    if selected == Some(letter) {
        return "option option--selected";
    }
    "option"
}

#[must_use]
pub fn score_line(outcome: &AttemptOutcome) -> String {
    format!(
        "{} / {} ({}%)",
        outcome.summary.score(),
        outcome.summary.total_questions(),
        outcome.summary.percentage()
    )
}

#[must_use]
pub fn is_perfect(outcome: &AttemptOutcome) -> bool {
    outcome.summary.is_perfect()
}

//
// ─── STARTERS ──────────────────────────────────────────────────────────────────
//

/// # Errors
///
/// Returns `ViewError::EmptyQuestionSet` when the section has no
/// questions, `ViewError::Unknown` for other failures.
pub async fn start_section_attempt(
    service: &AttemptLoopService,
    auth: &AuthService,
    user: UserId,
    exam: ExamId,
    section: SectionId,
) -> Result<AttemptVm, ViewError> {
    let seed = RetrySeed {
        user,
        exam,
        section,
        syllabus: None,
        difficulty: None,
    };
    start_or_resume(service, auth, seed).await
}

/// # Errors
///
/// Same as [`start_section_attempt`].
pub async fn start_syllabus_attempt(
    service: &AttemptLoopService,
    auth: &AuthService,
    user: UserId,
    exam: ExamId,
    section: SectionId,
    syllabus: SyllabusId,
    difficulty: Difficulty,
) -> Result<AttemptVm, ViewError> {
    let seed = RetrySeed {
        user,
        exam,
        section,
        syllabus: Some(syllabus),
        difficulty: Some(difficulty),
    };
    start_or_resume(service, auth, seed).await
}

/// Picks up the persisted in-flight attempt when it matches this scope,
/// otherwise starts a fresh one, and records the result as the attempt to
/// resume after a relaunch.
async fn start_or_resume(
    service: &AttemptLoopService,
    auth: &AuthService,
    seed: RetrySeed,
) -> Result<AttemptVm, ViewError> {
    let stored = auth.resume_attempt().unwrap_or(None);
    let attempt = match stored {
        Some(point) if point.seed == seed => service
            .resume_attempt(point.attempt, point.seed)
            .await
            .map_err(view_error)?,
        _ => service.start_from_seed(seed).await.map_err(view_error)?,
    };
    // A session write failure never blocks practice.
    let _ = auth.set_resume_attempt(Some(ResumePoint {
        attempt: attempt.id(),
        seed,
    }));
    Ok(AttemptVm::new(attempt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use api::gateway::{AttemptGateway, CatalogGateway};
    use api::{InMemoryApi, InMemorySessionStore};
    use prep_core::model::{AnswerOption, Question, QuestionId, UserProfile};
    use prep_core::time::{fixed_clock, fixed_now};

    fn build_question(id: u64) -> Question {
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
            OptionLetter::A,
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

    async fn build_auth(api: &InMemoryApi) -> AuthService {
        let profile =
            UserProfile::new(UserId::new(1), "Ada", "ada@example.com", Some(8)).unwrap();
        api.add_user(profile, "pw");
        let auth = AuthService::new(
            Arc::new(api.clone()),
            Arc::new(InMemorySessionStore::new()),
        );
        auth.login("ada@example.com", "pw").await.unwrap();
        auth
    }

    async fn start_vm(service: &AttemptLoopService, auth: &AuthService) -> AttemptVm {
        start_syllabus_attempt(
            service,
            auth,
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
    async fn perfect_run_earns_the_flourish() {
        let api = InMemoryApi::new();
        api.add_questions((1..=3).map(build_question));
        let service = build_service(&api);
        let auth = build_auth(&api).await;

        let mut vm = start_vm(&service, &auth).await;

        for index in 0..3 {
            vm.apply(&service, &auth, AttemptIntent::Jump(index))
                .await
                .unwrap();
            vm.apply(&service, &auth, AttemptIntent::Select(0))
                .await
                .unwrap();
            vm.apply(&service, &auth, AttemptIntent::Submit)
                .await
                .unwrap();
        }
        vm.apply(&service, &auth, AttemptIntent::Finish).await.unwrap();

        assert!(vm.is_finished());
        let outcome = vm.outcome().unwrap();
        assert_eq!(score_line(&outcome), "3 / 3 (100%)");
        assert!(is_perfect(&outcome));
        // Nothing left to resume once the summary is up.
        assert_eq!(auth.resume_attempt().unwrap(), None);

        vm.apply(&service, &auth, AttemptIntent::Retry).await.unwrap();
        assert!(!vm.is_finished());
        assert_eq!(vm.progress_label(), "Question 1 of 3");
        assert_eq!(
            auth.resume_attempt().unwrap().map(|p| p.attempt),
            Some(vm.attempt_id())
        );
    }

    #[tokio::test]
    async fn next_on_the_graded_last_question_finishes() {
        let api = InMemoryApi::new();
        api.add_questions((1..=2).map(build_question));
        let service = build_service(&api);
        let auth = build_auth(&api).await;

        let mut vm = start_vm(&service, &auth).await;
        vm.apply(&service, &auth, AttemptIntent::Jump(1)).await.unwrap();
        vm.apply(&service, &auth, AttemptIntent::Select(0))
            .await
            .unwrap();

        // Ungraded last question: Next stays put.
        vm.apply(&service, &auth, AttemptIntent::Next).await.unwrap();
        assert!(!vm.is_finished());

        vm.apply(&service, &auth, AttemptIntent::Submit).await.unwrap();
        vm.apply(&service, &auth, AttemptIntent::Next).await.unwrap();
        assert!(vm.is_finished());
    }

    #[tokio::test]
    async fn relaunch_resumes_the_in_flight_attempt() {
        let api = InMemoryApi::new();
        api.add_questions((1..=3).map(build_question));
        let service = build_service(&api);
        let auth = build_auth(&api).await;

        let vm = start_vm(&service, &auth).await;
        let stored = auth.resume_attempt().unwrap().unwrap();
        assert_eq!(stored.attempt, vm.attempt_id());

        // Opening the same scope again picks the record back up instead of
        // creating a second one.
        let resumed = start_vm(&service, &auth).await;
        assert_eq!(resumed.attempt_id(), vm.attempt_id());
        assert_eq!(api.attempt_count(), 1);
    }

    #[test]
    fn palette_marks_current_on_top_of_status() {
        assert_eq!(palette_class(None, false), "palette--not-visited");
        assert_eq!(
            palette_class(Some(QuestionState::Visited), true),
            "palette--visited palette--current"
        );
        assert_eq!(
            palette_class(
                Some(QuestionState::Submitted {
                    choice: OptionLetter::A,
                    correct: true
                }),
                false
            ),
            "palette--answered"
        );
    }

    #[test]
    fn options_highlight_selection_before_submission() {
        let class = option_class(OptionLetter::B, Some(OptionLetter::B), None, OptionLetter::C);
        assert_eq!(class, "option option--selected");
        let class = option_class(OptionLetter::A, Some(OptionLetter::B), None, OptionLetter::C);
        assert_eq!(class, "option");
    }

    #[test]
    fn options_reveal_the_answer_after_submission() {
        // Wrong pick: the pick goes red, the right answer goes green.
        let picked = option_class(
            OptionLetter::B,
            None,
            Some(OptionLetter::B),
            OptionLetter::C,
        );
        assert_eq!(picked, "option option--incorrect");
        let right = option_class(
            OptionLetter::C,
            None,
            Some(OptionLetter::B),
            OptionLetter::C,
        );
        assert_eq!(right, "option option--correct");
        let other = option_class(
            OptionLetter::D,
            None,
            Some(OptionLetter::B),
            OptionLetter::C,
        );
        assert_eq!(other, "option");
    }
}
