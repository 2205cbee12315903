use dioxus::prelude::*;
use dioxus_router::Link;

use prep_core::model::Exam;
use services::ResumePoint;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq)]
struct ExamCard {
    id: u64,
    name: String,
    description: String,
    grade: Option<u8>,
}

impl From<&Exam> for ExamCard {
    fn from(exam: &Exam) -> Self {
        Self {
            id: exam.id().value(),
            name: exam.name().to_string(),
            description: exam.description().to_string(),
            grade: exam.grade(),
        }
    }
}

/// The attempt route a stored in-flight attempt maps back onto.
fn resume_route(point: &ResumePoint) -> Route {
    let seed = point.seed;
    match (seed.syllabus, seed.difficulty) {
        (Some(syllabus), Some(difficulty)) => Route::SyllabusAttempt {
            exam_id: seed.exam.value(),
            section_id: seed.section.value(),
            syllabus_id: syllabus.value(),
            difficulty: difficulty.as_str().to_string(),
        },
        _ => Route::SectionAttempt {
            exam_id: seed.exam.value(),
            section_id: seed.section.value(),
        },
    }
}

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();
    let auth = ctx.auth();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        let auth = auth.clone();
        async move {
            let grade = auth
                .current_user()
                .map_err(|_| ViewError::NotSignedIn)?
                .ok_or(ViewError::NotSignedIn)?
                .grade();
            let exams = catalog
                .list_exams(grade)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(exams.iter().map(ExamCard::from).collect::<Vec<_>>())
        }
    });

    let state = view_state_from_resource(resource);
    let resume = ctx.auth().resume_attempt().ok().flatten();

    rsx! {
        div { class: "page",
            h2 { "Exams" }

            if let Some(point) = resume {
                div { class: "resume-banner",
                    p { "You have an unfinished attempt." }
                    Link { to: resume_route(&point), "Resume practice" }
                }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { "No exams available for your grade yet." }
                    } else {
                        for card in cards {
                            div { class: "catalog-card",
                                h3 {
                                    Link { to: Route::Sections { exam_id: card.id }, "{card.name}" }
                                }
                                if let Some(grade) = card.grade {
                                    p { "Grade {grade}" }
                                }
                                p { "{card.description}" }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}
