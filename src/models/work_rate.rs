//! Work rate (jury score) models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One jury member's score of one application on one criterion
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkRate {
    pub id: Uuid,
    pub criteria_id: Uuid,
    pub application_id: Uuid,
    /// Participant row of the jury member
    pub jury_id: Uuid,
    pub rate: i32,
}

/// Whether a jury member has rated every configured criterion of an application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Completeness {
    pub complete: bool,
    pub missing_criteria: Vec<Uuid>,
}

impl Completeness {
    /// Compare the configured criteria against the ones already rated
    pub fn from_rated(configured: &[Uuid], rated: &[Uuid]) -> Self {
        let missing_criteria: Vec<Uuid> = configured
            .iter()
            .filter(|id| !rated.contains(id))
            .copied()
            .collect();

        Self {
            complete: missing_criteria.is_empty(),
            missing_criteria,
        }
    }
}

/// Sum of all rates an application received
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationTotal {
    pub application_id: Uuid,
    pub name: String,
    pub nomination_id: Uuid,
    pub age_category: String,
    pub sum_rate: i64,
}
