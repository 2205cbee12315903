use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::use_navigator;

use prep_core::model::{Difficulty, ExamId, SectionId, SyllabusId};
use services::AttemptLoopService;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    AttemptIntent, AttemptVm, OptionVm, PaletteCellVm, is_perfect, score_line,
    start_section_attempt, start_syllabus_attempt,
};

/// Which question set the attempt covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttemptScope {
    Section {
        exam: ExamId,
        section: SectionId,
    },
    Syllabus {
        exam: ExamId,
        section: SectionId,
        syllabus: SyllabusId,
        difficulty: Difficulty,
    },
}

#[component]
pub fn SectionAttemptView(exam_id: u64, section_id: u64) -> Element {
    rsx! {
        AttemptScreen {
            scope: AttemptScope::Section {
                exam: ExamId::new(exam_id),
                section: SectionId::new(section_id),
            },
        }
    }
}

#[component]
pub fn SyllabusAttemptView(
    exam_id: u64,
    section_id: u64,
    syllabus_id: u64,
    difficulty: String,
) -> Element {
    let Ok(difficulty) = difficulty.parse::<Difficulty>() else {
        return rsx! {
            div { class: "page",
                p { "Unknown difficulty." }
            }
        };
    };
    rsx! {
        AttemptScreen {
            scope: AttemptScope::Syllabus {
                exam: ExamId::new(exam_id),
                section: SectionId::new(section_id),
                syllabus: SyllabusId::new(syllabus_id),
                difficulty,
            },
        }
    }
}

async fn start_attempt(
    service: &AttemptLoopService,
    ctx: &AppContext,
    scope: AttemptScope,
) -> Result<AttemptVm, ViewError> {
    let auth = ctx.auth();
    let user = auth
        .current_user()
        .map_err(|_| ViewError::NotSignedIn)?
        .ok_or(ViewError::NotSignedIn)?
        .id();
    match scope {
        AttemptScope::Section { exam, section } => {
            start_section_attempt(service, &auth, user, exam, section).await
        }
        AttemptScope::Syllabus {
            exam,
            section,
            syllabus,
            difficulty,
        } => {
            start_syllabus_attempt(service, &auth, user, exam, section, syllabus, difficulty).await
        }
    }
}

#[component]
fn AttemptScreen(scope: AttemptScope) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let attempt_loop = ctx.attempt_loop();

    let error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<AttemptVm>);

    let resource = {
        let attempt_loop = attempt_loop.clone();
        let ctx = ctx.clone();
        use_resource(move || {
            let attempt_loop = attempt_loop.clone();
            let ctx = ctx.clone();
            let mut vm = vm;
            async move {
                let started = start_attempt(&attempt_loop, &ctx, scope).await?;
                vm.set(Some(started));
                Ok::<_, ViewError>(())
            }
        })
    };
    let state = view_state_from_resource(resource);

    // Count-up timer. The machine freezes its own clock at finish, so the
    // loop only stops re-rendering once the summary is up.
    use_future(move || {
        let mut vm = vm;
        async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                let mut guard = vm.write();
                match guard.as_mut() {
                    Some(value) if !value.is_finished() => value.tick(),
                    _ => {}
                }
            }
        }
    });

    let dispatch = {
        let attempt_loop = attempt_loop.clone();
        let auth = ctx.auth();
        use_callback(move |intent: AttemptIntent| {
            let attempt_loop = Arc::clone(&attempt_loop);
            let auth = Arc::clone(&auth);
            let mut error = error;
            let mut vm = vm;
            spawn(async move {
                let taken = vm.write().take();
                let Some(mut value) = taken else {
                    error.set(Some(ViewError::Unknown));
                    return;
                };
                let result = value.apply(&attempt_loop, &auth, intent).await;
                *vm.write() = Some(value);
                error.set(result.err());
            });
        })
    };

    let vm_guard = vm.read();
    rsx! {
        div { class: "page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading questions..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        r#type: "button",
                        onclick: move |_| {
                            navigator.push(Route::Home {});
                        },
                        "Back to exams"
                    }
                },
                ViewState::Ready(()) => rsx! {
                    if let Some(err) = error() {
                        p { class: "form-error", "{err.message()}" }
                    }
                    if let Some(value) = vm_guard.as_ref() {
                        if value.is_finished() {
                            SummaryCard { vm, on_intent: dispatch }
                        } else {
                            QuestionPage { vm, on_intent: dispatch }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn QuestionPage(vm: Signal<Option<AttemptVm>>, on_intent: Callback<AttemptIntent>) -> Element {
    let guard = vm.read();
    let Some(value) = guard.as_ref() else {
        return rsx! {};
    };

    let progress = value.progress_label();
    let elapsed = value.elapsed_label();
    let prompt = value.prompt().to_string();
    let options = value.options();
    let palette = value.palette();
    let can_submit = value.can_submit();
    let graded = value.current_result();
    let explanation = value.explanation().map(ToString::to_string);
    let is_last = value.is_last_question();

    rsx! {
        div { class: "attempt-layout",
            div { class: "attempt-main",
                header {
                    span { "{progress}" }
                    span { class: "attempt-timer", " Time: {elapsed}" }
                }
                p { class: "attempt-prompt", "{prompt}" }
                for option in options {
                    OptionButton { option, on_intent }
                }
                if let Some(correct) = graded {
                    p {
                        if correct {
                            span { class: "option--correct", "Correct!" }
                        } else {
                            span { class: "option--incorrect", "Incorrect." }
                        }
                    }
                }
                if let Some(explanation) = explanation {
                    if !explanation.is_empty() {
                        p { class: "attempt-explanation", "{explanation}" }
                    }
                }
                div { class: "attempt-actions",
                    button {
                        r#type: "button",
                        disabled: !can_submit,
                        onclick: move |_| on_intent.call(AttemptIntent::Submit),
                        "Submit"
                    }
                    // On a graded last question Next wraps up the attempt.
                    if !is_last || graded.is_some() {
                        button {
                            r#type: "button",
                            onclick: move |_| on_intent.call(AttemptIntent::Next),
                            "Next"
                        }
                    }
                    button {
                        r#type: "button",
                        onclick: move |_| on_intent.call(AttemptIntent::Finish),
                        "Finish"
                    }
                }
            }
            aside {
                h3 { "Questions" }
                div { class: "palette",
                    for cell in palette {
                        PaletteButton { cell, on_intent }
                    }
                }
            }
        }
    }
}

#[component]
fn OptionButton(option: OptionVm, on_intent: Callback<AttemptIntent>) -> Element {
    let index = option.index;
    rsx! {
        button {
            class: "{option.class}",
            r#type: "button",
            onclick: move |_| on_intent.call(AttemptIntent::Select(index)),
            "{option.letter}. {option.text}"
        }
    }
}

#[component]
fn PaletteButton(cell: PaletteCellVm, on_intent: Callback<AttemptIntent>) -> Element {
    let index = cell.index;
    rsx! {
        button {
            class: "{cell.class}",
            r#type: "button",
            onclick: move |_| on_intent.call(AttemptIntent::Jump(index)),
            "{cell.label}"
        }
    }
}

#[component]
fn SummaryCard(vm: Signal<Option<AttemptVm>>, on_intent: Callback<AttemptIntent>) -> Element {
    let navigator = use_navigator();
    let guard = vm.read();
    let Some(outcome) = guard.as_ref().and_then(AttemptVm::outcome) else {
        return rsx! {};
    };

    let score = score_line(&outcome);
    let perfect = is_perfect(&outcome);
    let elapsed = crate::vm::format_elapsed(outcome.summary.elapsed_seconds());
    let unanswered = outcome.summary.unanswered();

    rsx! {
        div { class: "summary-card",
            h2 { "Attempt complete" }
            if perfect {
                p { class: "summary-flourish", "🎉 Full marks!" }
            }
            p { "Score: {score}" }
            p { "Unanswered: {unanswered}" }
            p { "Time: {elapsed}" }
            div { class: "attempt-actions",
                button {
                    r#type: "button",
                    onclick: move |_| on_intent.call(AttemptIntent::Retry),
                    "Try again"
                }
                button {
                    r#type: "button",
                    onclick: move |_| {
                        navigator.push(Route::Performance {});
                    },
                    "View performance"
                }
                button {
                    r#type: "button",
                    onclick: move |_| {
                        navigator.push(Route::Home {});
                    },
                    "Back to exams"
                }
            }
        }
    }
}
