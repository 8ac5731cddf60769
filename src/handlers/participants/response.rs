//! Participant response DTOs

use serde::Serialize;
use uuid::Uuid;

use crate::models::Participant;

/// Users added to and removed from a role roster
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct RosterResponse {
    pub added: Vec<Uuid>,
    pub removed: Vec<Uuid>,
}

/// Participants of a contest
#[derive(Debug, Serialize)]
pub struct ParticipantsResponse {
    pub participants: Vec<Participant>,
}
