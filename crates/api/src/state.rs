use std::sync::Arc;

use roster_config::Settings;
use roster_services::{AssignmentService, ReviewStore};

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub assignments: Arc<AssignmentService>,
}

impl AppState {
    pub fn new(store: Arc<dyn ReviewStore>, settings: Settings) -> Self {
        let assignments = Arc::new(AssignmentService::from_settings(store, &settings.assignment));
        Self::with_service(assignments, settings)
    }

    /// Uses a prebuilt service, e.g. one with a fixed clock or generator.
    pub fn with_service(assignments: Arc<AssignmentService>, settings: Settings) -> Self {
        Self {
            settings,
            assignments,
        }
    }
}
