use std::sync::Arc;

use api::gateway::{AttemptGateway, CatalogGateway};
use api::InMemoryApi;
use prep_core::model::{
    AnswerOption, AnswerStatus, Difficulty, ExamId, OptionLetter, Question, QuestionId, SectionId,
    SyllabusId, UserId,
};
use prep_core::time::{fixed_clock, fixed_now};
use services::AttemptLoopService;

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
        Difficulty::Medium,
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

// A whole attempt against the fake server: start, answer everything,
// finish, then retry under a fresh id.
#[tokio::test]
async fn full_attempt_round_trip() {
    let api = InMemoryApi::new();
    api.add_questions((1..=3).map(|id| build_question(id, OptionLetter::B)));
    let service = build_service(&api);

    let mut attempt = service
        .start_syllabus_practice(
            UserId::new(1),
            ExamId::new(1),
            SectionId::new(1),
            SyllabusId::new(1),
            Difficulty::Medium,
        )
        .await
        .unwrap();

    // Answer Q1 and Q2 correctly, Q3 wrong.
    for (index, choice) in [(0, 1), (1, 1), (2, 0)] {
        service.go_to(&mut attempt, index).await;
        assert!(attempt.machine_mut().select_option(choice));
        assert!(service.submit_current(&mut attempt).await);
    }

    let entries = api.entries(attempt.id()).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(
        entries
            .iter()
            .filter(|entry| entry.status() == AnswerStatus::Correct)
            .count(),
        2
    );

    let outcome = service.finish(&mut attempt).await.unwrap();
    assert_eq!(outcome.summary.score(), 2);
    assert_eq!(outcome.summary.percentage(), 67);
    assert_eq!(
        api.finished_summary(attempt.id()).unwrap().score(),
        outcome.summary.score()
    );

    let fresh = service.retry(&attempt).await.unwrap();
    assert_ne!(fresh.id(), attempt.id());
    assert_eq!(fresh.machine().submitted_indices().len(), 0);
    assert_eq!(api.attempt_count(), 2);
}
