use dioxus::prelude::*;
use dioxus_router::Link;

use prep_core::model::{Difficulty, SectionId, SyllabusTopic};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq)]
struct TopicCard {
    id: u64,
    name: String,
}

impl From<&SyllabusTopic> for TopicCard {
    fn from(topic: &SyllabusTopic) -> Self {
        Self {
            id: topic.id().value(),
            name: topic.name().to_string(),
        }
    }
}

#[component]
pub fn TopicsView(exam_id: u64, section_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            let topics = catalog
                .list_topics(SectionId::new(section_id))
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(topics.iter().map(TopicCard::from).collect::<Vec<_>>())
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "Topics" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { "This section has no topics yet." }
                    } else {
                        for card in cards {
                            div { class: "catalog-card",
                                h3 { "{card.name}" }
                                p {
                                    "Practice: "
                                    for difficulty in Difficulty::ALL {
                                        Link {
                                            to: Route::SyllabusAttempt {
                                                exam_id,
                                                section_id,
                                                syllabus_id: card.id,
                                                difficulty: difficulty.as_str().to_string(),
                                            },
                                            " {difficulty.as_str()} "
                                        }
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
