use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use crate::context::AppContext;
use crate::views::{
    HomeView, LoginView, PerformanceView, ProfileView, SectionAttemptView, SectionsView,
    SignupView, SyllabusAttemptView, TopicsView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login", LoginView)] Login {},
    #[route("/signup", SignupView)] Signup {},
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/exams/:exam_id", SectionsView)] Sections { exam_id: u64 },
        #[route("/exams/:exam_id/sections/:section_id", TopicsView)] Topics { exam_id: u64, section_id: u64 },
        #[route("/attempt/section/:exam_id/:section_id", SectionAttemptView)] SectionAttempt { exam_id: u64, section_id: u64 },
        #[route("/attempt/topic/:exam_id/:section_id/:syllabus_id/:difficulty", SyllabusAttemptView)]
        SyllabusAttempt { exam_id: u64, section_id: u64, syllabus_id: u64, difficulty: String },
        #[route("/performance", PerformanceView)] Performance {},
        #[route("/profile", ProfileView)] Profile {},
}

/// Shell for the signed-in routes. Without a stored session every child
/// route bounces to the login screen.
#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let signed_in = ctx.auth().current_user().ok().flatten().is_some();
    use_effect(move || {
        if !signed_in {
            navigator.push(Route::Login {});
        }
    });
    if !signed_in {
        return rsx! {
            p { "Redirecting to sign in..." }
        };
    }

    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Olympiad Prep" }
            ul {
                li { Link { to: Route::Home {}, "Exams" } }
                li { Link { to: Route::Performance {}, "Performance" } }
                li { Link { to: Route::Profile {}, "Profile" } }
            }
        }
    }
}
