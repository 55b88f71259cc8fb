//! Error handling for the dashboard core
//!
//! `DashboardError` is `Clone` so that one failed fetch can be delivered to
//! every caller waiting on the same de-duplicated request.

use std::sync::Arc;

use kyc_client::ApiError;
use thiserror::Error;

use crate::query::QueryKey;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug, Clone)]
pub enum DashboardError {
    #[error("API error: {0}")]
    Api(Arc<ApiError>),

    #[error("Cached value for '{key}' has an unexpected type")]
    TypeMismatch { key: QueryKey },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Job {job_id} polling stopped: {reason}")]
    JobPoll { job_id: String, reason: String },

    #[error("Export failed: {0}")]
    Export(String),
}

impl From<ApiError> for DashboardError {
    fn from(error: ApiError) -> Self {
        Self::Api(Arc::new(error))
    }
}

impl DashboardError {
    /// Underlying API error, if this failure came from the backend.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Api(_) => "API",
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
            Self::Config(_) => "CONFIG",
            Self::JobPoll { .. } => "JOB_POLL",
            Self::Export(_) => "EXPORT",
        }
    }
}
