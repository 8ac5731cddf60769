//! Application response DTOs

use serde::Serialize;

use crate::models::{Application, ApplicationStatus};

/// Applications accepted by a batch approval
#[derive(Debug, Serialize)]
pub struct ApprovedResponse {
    pub accepted: Vec<Application>,
}

/// Applications of one status
#[derive(Debug, Serialize)]
pub struct ApplicationsListResponse {
    pub status: Option<ApplicationStatus>,
    pub applications: Vec<Application>,
}
