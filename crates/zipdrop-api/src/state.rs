//! Application state shared by every handler.

use std::sync::Arc;
use zipdrop_services::ArchiveWorkflow;

#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<ArchiveWorkflow>,
}

impl AppState {
    pub fn new(workflow: ArchiveWorkflow) -> Self {
        Self {
            workflow: Arc::new(workflow),
        }
    }
}
