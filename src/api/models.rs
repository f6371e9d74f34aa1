//! API request and response models

use crate::models::ModelSource;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Outcome of deleting a model group
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Query for `DELETE /models`
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub id: String,
    /// Required when the id exists in both caches
    pub source: Option<ModelSource>,
}
