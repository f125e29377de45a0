use crate::orchestrator::controller::PortalController;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<PortalController>,
}

// Response structure for rejected selections
#[derive(Serialize, Debug, Deserialize, Clone)]
pub struct SelectResponse {
    pub success: bool,
    pub message: String,
}
