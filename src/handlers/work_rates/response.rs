//! Work rate response DTOs

use serde::Serialize;

use crate::models::{ApplicationTotal, Completeness, WorkRate};

/// Rows written plus how much of the contest criteria this jury member has covered
#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    pub rates: Vec<WorkRate>,
    pub completeness: Completeness,
}

#[derive(Debug, Serialize)]
pub struct JuryRatesResponse {
    pub rates: Vec<WorkRate>,
}

/// Score totals of accepted applications
#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub totals: Vec<ApplicationTotal>,
}
