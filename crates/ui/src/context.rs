use std::sync::Arc;

use services::{AttemptLoopService, AuthService, CatalogService, PerformanceService};

/// What the composition root must provide before the UI can launch.
pub trait UiApp: Send + Sync {
    fn attempt_loop(&self) -> Arc<AttemptLoopService>;
    fn catalog(&self) -> Arc<CatalogService>;
    fn performance(&self) -> Arc<PerformanceService>;
    fn auth(&self) -> Arc<AuthService>;
}

#[derive(Clone)]
pub struct AppContext {
    attempt_loop: Arc<AttemptLoopService>,
    catalog: Arc<CatalogService>,
    performance: Arc<PerformanceService>,
    auth: Arc<AuthService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            attempt_loop: app.attempt_loop(),
            catalog: app.catalog(),
            performance: app.performance(),
            auth: app.auth(),
        }
    }

    #[must_use]
    pub fn attempt_loop(&self) -> Arc<AttemptLoopService> {
        Arc::clone(&self.attempt_loop)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn performance(&self) -> Arc<PerformanceService> {
        Arc::clone(&self.performance)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
