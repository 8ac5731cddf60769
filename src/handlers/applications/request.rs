//! Application request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{MAX_ANNOTATION_LENGTH, MAX_BATCH_ITEMS, MAX_SHORT_TEXT_LENGTH},
    models::ApplicationStatus,
};

/// Submit an application
#[derive(Debug, Deserialize, Validate)]
pub struct CreateApplicationRequest {
    #[validate(length(min = 1, max = MAX_SHORT_TEXT_LENGTH))]
    pub name: String,

    #[validate(length(min = 1, max = MAX_ANNOTATION_LENGTH))]
    pub annotation: String,

    /// Location of the uploaded work in object storage
    #[validate(length(max = MAX_SHORT_TEXT_LENGTH))]
    pub link_to_work: Option<String>,

    pub nomination_id: Uuid,
}

/// Author edit of a pending application
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateApplicationRequest {
    #[validate(length(min = 1, max = MAX_SHORT_TEXT_LENGTH))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = MAX_ANNOTATION_LENGTH))]
    pub annotation: Option<String>,

    #[validate(length(max = MAX_SHORT_TEXT_LENGTH))]
    pub link_to_work: Option<String>,
}

/// Accept a batch of applications
#[derive(Debug, Deserialize, Validate)]
pub struct ApproveApplicationsRequest {
    #[validate(length(min = 1, max = MAX_BATCH_ITEMS))]
    pub application_ids: Vec<Uuid>,
}

/// Reject one application
#[derive(Debug, Deserialize, Validate)]
pub struct RejectApplicationRequest {
    #[validate(length(min = 1, max = MAX_ANNOTATION_LENGTH))]
    pub reason: String,
}

/// Listing filter
#[derive(Debug, Deserialize)]
pub struct ListApplicationsQuery {
    pub status: Option<ApplicationStatus>,
}
