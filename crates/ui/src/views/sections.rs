use dioxus::prelude::*;
use dioxus_router::Link;

use prep_core::model::{ExamId, Section};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq)]
struct SectionCard {
    id: u64,
    name: String,
}

impl From<&Section> for SectionCard {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id().value(),
            name: section.name().to_string(),
        }
    }
}

#[component]
pub fn SectionsView(exam_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            let sections = catalog
                .list_sections(ExamId::new(exam_id))
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(sections.iter().map(SectionCard::from).collect::<Vec<_>>())
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "Sections" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { "This exam has no sections yet." }
                    } else {
                        for card in cards {
                            div { class: "catalog-card",
                                h3 { "{card.name}" }
                                p {
                                    Link {
                                        to: Route::Topics { exam_id, section_id: card.id },
                                        "Browse topics"
                                    }
                                    " · "
                                    Link {
                                        to: Route::SectionAttempt { exam_id, section_id: card.id },
                                        "Practice whole section"
                                    }
                                }
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
