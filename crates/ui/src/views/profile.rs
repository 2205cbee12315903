use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn ProfileView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let user = ctx.auth().current_user().ok().flatten();

    let on_logout = {
        let auth = ctx.auth();
        use_callback(move |()| {
            if auth.logout().is_ok() {
                navigator.push(Route::Login {});
            }
        })
    };

    rsx! {
        div { class: "page",
            h2 { "Profile" }
            if let Some(user) = user {
                p { "Name: {user.name()}" }
                p { "Email: {user.email()}" }
                if let Some(grade) = user.grade() {
                    p { "Grade: {grade}" }
                }
                button {
                    r#type: "button",
                    onclick: move |_| on_logout.call(()),
                    "Sign out"
                }
            } else {
                p { "Not signed in." }
            }
        }
    }
}
