use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use prep_core::model::NewUser;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let on_submit = {
        let auth = ctx.auth();
        use_callback(move |evt: FormEvent| {
            evt.prevent_default();
            let auth = auth.clone();
            let mut error = error;
            spawn(async move {
                match auth.login(&email(), &password()).await {
                    Ok(_) => {
                        error.set(None);
                        navigator.push(Route::Home {});
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
            });
        })
    };

    rsx! {
        div { class: "page auth-page",
            h2 { "Sign in" }
            form { onsubmit: on_submit,
                label { "Email" }
                input {
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { "Password" }
                input {
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                button { r#type: "submit", "Sign in" }
            }
            p {
                "New here? "
                Link { to: Route::Signup {}, "Create an account" }
            }
        }
    }
}

#[component]
pub fn SignupView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut grade = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let on_submit = {
        let auth = ctx.auth();
        use_callback(move |evt: FormEvent| {
            evt.prevent_default();
            let auth = auth.clone();
            let mut error = error;

            let parsed_grade = {
                let raw = grade();
                if raw.trim().is_empty() {
                    Ok(None)
                } else {
                    raw.trim().parse::<u8>().map(Some)
                }
            };
            let Ok(parsed_grade) = parsed_grade else {
                error.set(Some("Grade must be a number.".to_string()));
                return;
            };

            let new_user = NewUser {
                name: name(),
                email: email(),
                password: password(),
                grade: parsed_grade,
            };
            spawn(async move {
                match auth.signup(new_user).await {
                    Ok(_) => {
                        error.set(None);
                        navigator.push(Route::Home {});
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
            });
        })
    };

    rsx! {
        div { class: "page auth-page",
            h2 { "Create an account" }
            form { onsubmit: on_submit,
                label { "Name" }
                input {
                    value: "{name}",
                    oninput: move |evt| name.set(evt.value()),
                }
                label { "Email" }
                input {
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { "Password" }
                input {
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                label { "Grade (optional)" }
                input {
                    value: "{grade}",
                    oninput: move |evt| grade.set(evt.value()),
                }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                button { r#type: "submit", "Sign up" }
            }
            p {
                "Already registered? "
                Link { to: Route::Login {}, "Sign in" }
            }
        }
    }
}
