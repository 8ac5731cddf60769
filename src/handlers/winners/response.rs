//! Winner response DTOs

use serde::Serialize;

use crate::models::WinnerStanding;

/// Counts of winner rows touched by a recomputation
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RecomputeResponse {
    pub created: u64,
    pub updated: u64,
    pub removed: u64,
}

/// Ranked standings of a contest
#[derive(Debug, Serialize)]
pub struct WinnersResponse {
    pub winners: Vec<WinnerStanding>,
}
