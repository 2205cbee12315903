use chrono::{DateTime, Utc};
use std::fmt;

use prep_core::model::{
    AnswerStatus, AttemptEntry, OptionLetter, Question, QuestionId, ScoreSummary,
};

use super::progress::AttemptProgress;
use crate::error::AttemptError;

//
// ─── QUESTION STATE ────────────────────────────────────────────────────────────
//

/// Where one question stands within the attempt.
///
/// A question is `Submitted` the moment its answer is graded; "answered"
/// and "submitted" are the same classification by construction, so the two
/// sets the progress palette shows can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionState {
    NotVisited,
    Visited,
    Submitted { choice: OptionLetter, correct: bool },
}

impl QuestionState {
    #[must_use]
    pub fn is_visited(&self) -> bool {
        !matches!(self, QuestionState::NotVisited)
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        matches!(self, QuestionState::Submitted { .. })
    }
}

//
// ─── ATTEMPT MACHINE ───────────────────────────────────────────────────────────
//

/// In-memory state machine for one timed practice attempt.
///
/// Owns the question set read-only, tracks per-question progress, the
/// current pointer, tentative option choices, and the count-up timer.
/// Pure and synchronous; server synchronization lives in
/// `AttemptLoopService`, which feeds the entries this machine emits to the
/// remote record and feeds the reconciled list back via [`reconcile`].
///
/// [`reconcile`]: AttemptMachine::reconcile
pub struct AttemptMachine {
    questions: Vec<Question>,
    states: Vec<QuestionState>,
    pending: Vec<Option<OptionLetter>>,
    current: usize,
    elapsed_seconds: u32,
    completed_at: Option<DateTime<Utc>>,
}

impl AttemptMachine {
    /// Create a machine over a question set, everything seeded not-visited.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Empty` if no questions are provided.
    pub fn new(questions: Vec<Question>) -> Result<Self, AttemptError> {
        if questions.is_empty() {
            return Err(AttemptError::Empty);
        }
        let count = questions.len();
        Ok(Self {
            questions,
            states: vec![QuestionState::NotVisited; count],
            pending: vec![None; count],
            current: 0,
            elapsed_seconds: 0,
            completed_at: None,
        })
    }

    // ─── Accessors ─────────────────────────────────────────────────────────

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    #[must_use]
    pub fn state(&self, index: usize) -> Option<QuestionState> {
        self.states.get(index).copied()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// The choice shown for the current question: the submitted one if it
    /// exists, otherwise the tentative selection.
    #[must_use]
    pub fn selected_option(&self) -> Option<OptionLetter> {
        match self.states[self.current] {
            QuestionState::Submitted { choice, .. } => Some(choice),
            _ => self.pending[self.current],
        }
    }

    /// The recorded result for the current question, if submitted.
    #[must_use]
    pub fn current_result(&self) -> Option<bool> {
        match self.states[self.current] {
            QuestionState::Submitted { correct, .. } => Some(correct),
            _ => None,
        }
    }

    // ─── Classification sets ───────────────────────────────────────────────

    fn indices_where(&self, pred: impl Fn(&QuestionState) -> bool) -> Vec<usize> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, state)| pred(state))
            .map(|(index, _)| index)
            .collect()
    }

    #[must_use]
    pub fn not_visited_indices(&self) -> Vec<usize> {
        self.indices_where(|state| matches!(state, QuestionState::NotVisited))
    }

    #[must_use]
    pub fn visited_unanswered_indices(&self) -> Vec<usize> {
        self.indices_where(|state| matches!(state, QuestionState::Visited))
    }

    #[must_use]
    pub fn submitted_indices(&self) -> Vec<usize> {
        self.indices_where(QuestionState::is_submitted)
    }

    /// Indices with a recorded answer. Identical to [`submitted_indices`]
    /// by construction; kept as its own accessor because the progress
    /// palette names the two sets separately.
    ///
    /// [`submitted_indices`]: AttemptMachine::submitted_indices
    #[must_use]
    pub fn answered_indices(&self) -> Vec<usize> {
        self.submitted_indices()
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.states
            .iter()
            .filter(|state| matches!(state, QuestionState::Submitted { correct: true, .. }))
            .count() as u32
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.states
            .iter()
            .filter(|state| matches!(state, QuestionState::Submitted { correct: false, .. }))
            .count() as u32
    }

    /// Aggregate progress for the palette and header.
    #[must_use]
    pub fn progress(&self) -> AttemptProgress {
        AttemptProgress {
            total: self.questions.len(),
            submitted: self.submitted_indices().len(),
            not_visited: self.not_visited_indices().len(),
            visited_unanswered: self.visited_unanswered_indices().len(),
            is_complete: self.is_complete(),
        }
    }

    // ─── Transitions ───────────────────────────────────────────────────────

    /// Marks the current question visited if it never was. Returns the
    /// status-0 entry to sync on the first visit, nothing otherwise.
    pub fn visit_current(&mut self) -> Option<AttemptEntry> {
        if self.is_complete() {
            return None;
        }
        if self.states[self.current] == QuestionState::NotVisited {
            self.states[self.current] = QuestionState::Visited;
            return Some(AttemptEntry::visited(self.questions[self.current].id()));
        }
        None
    }

    /// Stores a tentative choice for the current question. Rejected once
    /// that question is submitted or the attempt is complete.
    pub fn select_option(&mut self, option_index: usize) -> bool {
        if self.is_complete() || self.states[self.current].is_submitted() {
            return false;
        }
        let Some(letter) = OptionLetter::from_index(option_index) else {
            return false;
        };
        self.pending[self.current] = Some(letter);
        true
    }

    /// Grades and locks in the current question's tentative choice.
    ///
    /// A silent no-op (`None`) without a tentative choice, after a prior
    /// submit, or once the attempt is complete. Otherwise returns the
    /// graded entry to sync.
    pub fn submit_current(&mut self) -> Option<AttemptEntry> {
        if self.is_complete() || self.states[self.current].is_submitted() {
            return None;
        }
        let choice = self.pending[self.current]?;
        let question = &self.questions[self.current];
        let entry = AttemptEntry::graded(question.id(), choice, question.correct());
        self.states[self.current] = QuestionState::Submitted {
            choice,
            correct: entry.is_correct(),
        };
        Some(entry)
    }

    /// Relocates the pointer. Returns the status-0 entry to sync when the
    /// target had never been visited; re-visits emit nothing.
    pub fn go_to(&mut self, index: usize) -> Option<AttemptEntry> {
        if self.is_complete() || index >= self.questions.len() {
            return None;
        }
        self.current = index;
        self.visit_current()
    }

    /// Moves to the next question, if there is one.
    pub fn advance(&mut self) -> Option<AttemptEntry> {
        if self.current + 1 >= self.questions.len() {
            return None;
        }
        self.go_to(self.current + 1)
    }

    /// Replaces every classification with the server's authoritative list.
    ///
    /// Full replace: ids present are marked from their entry, ids absent
    /// revert to not-visited. Tentative choices for unsubmitted questions
    /// survive, so an in-flight visit echo cannot wipe a selection the
    /// user is in the middle of making.
    pub fn reconcile(&mut self, entries: &[AttemptEntry]) {
        for (index, question) in self.questions.iter().enumerate() {
            let found = entries
                .iter()
                .find(|entry| entry.question_id() == question.id());
            self.states[index] = match found {
                None => QuestionState::NotVisited,
                Some(entry) => match (entry.status(), entry.selected()) {
                    (AnswerStatus::Visited, _) | (_, None) => QuestionState::Visited,
                    (status, Some(choice)) => {
                        self.pending[index] = Some(choice);
                        QuestionState::Submitted {
                            choice,
                            correct: status == AnswerStatus::Correct,
                        }
                    }
                },
            };
        }
    }

    /// Advances the count-up timer by one second. Ignored once complete.
    pub fn tick(&mut self) {
        if !self.is_complete() {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        }
    }

    /// Terminal transition: freezes the timer and computes the aggregate
    /// score. Unvisited questions simply don't count.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Completed` if already finished.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<ScoreSummary, AttemptError> {
        if self.is_complete() {
            return Err(AttemptError::Completed);
        }
        let summary = ScoreSummary::new(
            self.questions.len() as u32,
            self.correct_count(),
            self.incorrect_count(),
            self.elapsed_seconds,
            now,
        )?;
        self.completed_at = Some(now);
        Ok(summary)
    }

    /// Looks up a question's index by id, for reconciliation diagnostics.
    #[must_use]
    pub fn index_of(&self, id: QuestionId) -> Option<usize> {
        self.questions.iter().position(|question| question.id() == id)
    }
}

impl fmt::Debug for AttemptMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptMachine")
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("submitted", &self.submitted_indices().len())
            .field("elapsed_seconds", &self.elapsed_seconds)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::model::{AnswerOption, Difficulty, QuestionId, SyllabusId};
    use prep_core::time::fixed_now;

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

    fn build_machine(count: u64) -> AttemptMachine {
        let questions = (1..=count)
            .map(|id| build_question(id, OptionLetter::A))
            .collect();
        AttemptMachine::new(questions).unwrap()
    }

    fn assert_partition(machine: &AttemptMachine) {
        let mut all: Vec<usize> = machine.not_visited_indices();
        all.extend(machine.visited_unanswered_indices());
        all.extend(machine.submitted_indices());
        all.sort_unstable();
        let expected: Vec<usize> = (0..machine.question_count()).collect();
        assert_eq!(all, expected, "classifications must partition the range");
    }

    #[test]
    fn empty_question_set_is_rejected() {
        let err = AttemptMachine::new(Vec::new()).unwrap_err();
        assert!(matches!(err, AttemptError::Empty));
    }

    #[test]
    fn everything_starts_not_visited() {
        let machine = build_machine(5);
        assert_eq!(machine.not_visited_indices(), vec![0, 1, 2, 3, 4]);
        assert!(machine.submitted_indices().is_empty());
        assert_partition(&machine);
    }

    #[test]
    fn first_visit_emits_a_status_zero_entry() {
        let mut machine = build_machine(3);
        let entry = machine.visit_current().expect("first visit should emit");
        assert_eq!(entry.status(), AnswerStatus::Visited);
        assert_eq!(entry.selected(), None);
        assert_eq!(machine.visited_unanswered_indices(), vec![0]);
    }

    #[test]
    fn revisiting_is_idempotent() {
        let mut machine = build_machine(3);
        machine.visit_current();
        assert!(machine.visit_current().is_none());
        assert!(machine.go_to(0).is_none());

        machine.go_to(2).expect("new index should emit a visit");
        assert!(machine.go_to(2).is_none());
        assert!(machine.go_to(0).is_none());
        assert_partition(&machine);
    }

    #[test]
    fn submit_without_selection_is_a_silent_noop() {
        let mut machine = build_machine(2);
        machine.visit_current();
        assert!(machine.submit_current().is_none());
        assert!(machine.submitted_indices().is_empty());
    }

    #[test]
    fn submit_grades_against_the_correct_letter() {
        let mut machine = build_machine(2);
        machine.visit_current();

        assert!(machine.select_option(0));
        let entry = machine.submit_current().expect("submit should emit");
        assert_eq!(entry.status(), AnswerStatus::Correct);

        machine.advance();
        assert!(machine.select_option(2));
        let entry = machine.submit_current().expect("submit should emit");
        assert_eq!(entry.status(), AnswerStatus::Incorrect);
        assert_eq!(entry.selected(), Some(OptionLetter::C));
        assert_partition(&machine);
    }

    #[test]
    fn submitted_answers_cannot_be_changed() {
        let mut machine = build_machine(1);
        machine.visit_current();
        machine.select_option(0);
        machine.submit_current().unwrap();

        assert!(!machine.select_option(1));
        assert!(machine.submit_current().is_none());
        assert_eq!(machine.selected_option(), Some(OptionLetter::A));
        assert_eq!(machine.current_result(), Some(true));
    }

    #[test]
    fn select_rejects_out_of_range_option() {
        let mut machine = build_machine(1);
        assert!(!machine.select_option(4));
    }

    #[test]
    fn navigation_restores_prior_choice() {
        let mut machine = build_machine(3);
        machine.visit_current();
        machine.select_option(1);
        machine.submit_current().unwrap();

        machine.go_to(2);
        machine.go_to(0);
        assert_eq!(machine.selected_option(), Some(OptionLetter::B));
        assert_eq!(machine.current_result(), Some(false));
    }

    #[test]
    fn reconcile_fully_replaces_classifications() {
        let mut machine = build_machine(4);
        machine.visit_current();
        machine.go_to(1);
        machine.go_to(2);

        // Server only knows about Q1 (answered) and Q3 (visited).
        let entries = vec![
            AttemptEntry::graded(QuestionId::new(1), OptionLetter::A, OptionLetter::A),
            AttemptEntry::visited(QuestionId::new(3)),
        ];
        machine.reconcile(&entries);

        assert_eq!(machine.submitted_indices(), vec![0]);
        assert_eq!(machine.visited_unanswered_indices(), vec![2]);
        // Q2 was visited locally but missing from the echo: un-visited.
        assert_eq!(machine.not_visited_indices(), vec![1, 3]);
        assert_partition(&machine);
    }

    #[test]
    fn reconcile_preserves_a_tentative_choice() {
        let mut machine = build_machine(2);
        machine.visit_current();
        machine.select_option(3);

        machine.reconcile(&[AttemptEntry::visited(QuestionId::new(1))]);
        assert_eq!(machine.selected_option(), Some(OptionLetter::D));
        assert!(!machine.state(0).unwrap().is_submitted());
    }

    #[test]
    fn timer_counts_up_and_freezes_on_completion() {
        let mut machine = build_machine(1);
        machine.tick();
        machine.tick();
        assert_eq!(machine.elapsed_seconds(), 2);

        machine.finish(fixed_now()).unwrap();
        machine.tick();
        assert_eq!(machine.elapsed_seconds(), 2);
    }

    #[test]
    fn finish_scores_only_correct_submissions() {
        // Scenario A: answer Q1 correctly, Q2 incorrectly, skip to Q5, finish.
        let mut machine = build_machine(5);
        machine.visit_current();
        machine.select_option(0);
        machine.submit_current().unwrap();

        machine.advance();
        machine.select_option(1);
        machine.submit_current().unwrap();

        machine.go_to(4);

        let summary = machine.finish(fixed_now()).unwrap();
        assert_eq!(summary.score(), 1);
        assert_eq!(summary.incorrect(), 1);
        assert_eq!(machine.not_visited_indices(), vec![2, 3]);
        assert_eq!(machine.visited_unanswered_indices(), vec![4]);
    }

    #[test]
    fn perfect_run_scores_every_question() {
        // Scenario B: five questions, all answered correctly.
        let mut machine = build_machine(5);
        machine.visit_current();
        for index in 0..machine.question_count() {
            machine.go_to(index);
            machine.select_option(0);
            machine.submit_current().unwrap();
        }
        let summary = machine.finish(fixed_now()).unwrap();
        assert_eq!(summary.score(), 5);
        assert_eq!(summary.percentage(), 100);
        assert!(summary.is_perfect());
    }

    #[test]
    fn finish_twice_is_an_error() {
        let mut machine = build_machine(1);
        machine.finish(fixed_now()).unwrap();
        let err = machine.finish(fixed_now()).unwrap_err();
        assert!(matches!(err, AttemptError::Completed));
    }

    #[test]
    fn completed_machine_ignores_transitions() {
        let mut machine = build_machine(2);
        machine.finish(fixed_now()).unwrap();
        assert!(machine.visit_current().is_none());
        assert!(machine.go_to(1).is_none());
        assert!(!machine.select_option(0));
        assert!(machine.submit_current().is_none());
    }
}
