#![forbid(unsafe_code)]

pub mod attempts;
pub mod auth_service;
pub mod catalog_service;
pub mod error;
pub mod performance_service;

pub use api::ResumePoint;
pub use prep_core::Clock;

pub use error::{AttemptError, AuthError, CatalogError, PerformanceError};

pub use attempts::{
    AttemptLoopService, AttemptMachine, AttemptOutcome, AttemptProgress, PracticeAttempt,
    QuestionState,
};
pub use auth_service::AuthService;
pub use catalog_service::CatalogService;
pub use performance_service::{HistoryFilter, HistoryPage, PerformanceService, PerformanceStats};
