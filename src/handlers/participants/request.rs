//! Participant request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{constants::MAX_BATCH_ITEMS, models::ParticipantRole};

/// Full replacement roster for one role
#[derive(Debug, Deserialize, Validate)]
pub struct SetRosterRequest {
    #[validate(length(max = MAX_BATCH_ITEMS))]
    pub user_ids: Vec<Uuid>,
}

/// Explicit role change of an existing participant
#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub user_id: Uuid,
    pub role: ParticipantRole,
}

/// Filter for the participant listing
#[derive(Debug, Deserialize)]
pub struct ListParticipantsQuery {
    pub role: Option<ParticipantRole>,
}
