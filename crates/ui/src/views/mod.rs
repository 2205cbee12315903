mod attempt;
mod auth;
mod home;
mod performance;
mod profile;
mod sections;
mod state;
mod topics;

pub use attempt::{SectionAttemptView, SyllabusAttemptView};
pub use auth::{LoginView, SignupView};
pub use home::HomeView;
pub use performance::PerformanceView;
pub use profile::ProfileView;
pub use sections::SectionsView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use topics::TopicsView;
