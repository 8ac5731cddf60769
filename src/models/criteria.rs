//! Per-contest criteria and nominations

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Criterion configured for a contest, joined with the criteria dictionary
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContestCriterion {
    pub criteria_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub min_points: i32,
    pub max_points: i32,
}

impl ContestCriterion {
    /// Inclusive on both ends
    pub fn accepts(&self, rate: i32) -> bool {
        self.min_points <= rate && rate <= self.max_points
    }
}

/// Nomination configured for a contest, joined with the nomination dictionary
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContestNomination {
    pub nomination_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}
