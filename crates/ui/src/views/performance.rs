use dioxus::prelude::*;

use prep_core::model::{Difficulty, Exam, ExamId};
use services::HistoryFilter;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{HistoryRowVm, map_history_rows, stats_line};

#[derive(Clone, Debug, PartialEq)]
struct PerformanceData {
    rows: Vec<HistoryRowVm>,
    stats: String,
    may_have_more: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct ExamChoice {
    id: u64,
    name: String,
}

#[component]
pub fn PerformanceView() -> Element {
    let ctx = use_context::<AppContext>();
    let performance = ctx.performance();
    let auth = ctx.auth();

    let mut page = use_signal(|| 1u32);
    let mut exam_filter = use_signal(|| None::<u64>);
    let mut difficulty_filter = use_signal(|| None::<Difficulty>);

    let exams_resource = {
        let catalog = ctx.catalog();
        use_resource(move || {
            let catalog = catalog.clone();
            async move {
                let exams = catalog
                    .list_exams(None)
                    .await
                    .map_err(|_| ViewError::Unknown)?;
                Ok::<_, ViewError>(
                    exams
                        .iter()
                        .map(|exam: &Exam| ExamChoice {
                            id: exam.id().value(),
                            name: exam.name().to_string(),
                        })
                        .collect::<Vec<_>>(),
                )
            }
        })
    };

    let resource = use_resource(move || {
        let performance = performance.clone();
        let auth = auth.clone();
        // Reading the signals here re-runs the fetch when they change.
        let page = page();
        let filter = HistoryFilter {
            exam: exam_filter().map(ExamId::new),
            difficulty: difficulty_filter(),
        };
        async move {
            let user = auth
                .current_user()
                .map_err(|_| ViewError::NotSignedIn)?
                .ok_or(ViewError::NotSignedIn)?
                .id();
            let history = performance
                .history_page(user, page, filter)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(PerformanceData {
                rows: map_history_rows(&history.records),
                stats: stats_line(&history.stats),
                may_have_more: history.may_have_more,
            })
        }
    });

    let state = view_state_from_resource(resource);
    let exam_choices = exams_resource
        .value()
        .read()
        .as_ref()
        .and_then(|value| value.as_ref().ok())
        .cloned()
        .unwrap_or_default();

    rsx! {
        div { class: "page",
            h2 { "Performance" }

            div { class: "history-filters",
                label { "Exam: " }
                select {
                    onchange: move |evt| {
                        page.set(1);
                        exam_filter.set(evt.value().parse::<u64>().ok());
                    },
                    option { value: "all", "All" }
                    for choice in exam_choices {
                        option { value: "{choice.id}", "{choice.name}" }
                    }
                }
                label { " Difficulty: " }
                select {
                    onchange: move |evt| {
                        page.set(1);
                        difficulty_filter.set(evt.value().parse::<Difficulty>().ok());
                    },
                    option { value: "all", "All" }
                    for difficulty in Difficulty::ALL {
                        option { value: "{difficulty.as_str()}", "{difficulty.as_str()}" }
                    }
                }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    p { "{data.stats}" }
                    if data.rows.is_empty() {
                        p { "Nothing on this page." }
                    } else {
                        table { class: "history-table",
                            thead {
                                tr {
                                    th { "Started" }
                                    th { "Scope" }
                                    th { "Score" }
                                    th { "Percent" }
                                    th { "Time" }
                                }
                            }
                            tbody {
                                for row in data.rows {
                                    tr {
                                        td { "{row.started_at_str}" }
                                        td { "{row.scope}" }
                                        td { "{row.score}" }
                                        td { "{row.percentage}%" }
                                        td { "{row.duration}" }
                                    }
                                }
                            }
                        }
                    }
                    div { class: "attempt-actions",
                        button {
                            r#type: "button",
                            disabled: page() == 1,
                            onclick: move |_| {
                                let current = page();
                                page.set(current.saturating_sub(1).max(1));
                            },
                            "Previous"
                        }
                        button {
                            r#type: "button",
                            disabled: !data.may_have_more,
                            onclick: move |_| {
                                let current = page();
                                page.set(current + 1);
                            },
                            "Next"
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
