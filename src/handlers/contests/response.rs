//! Contest response DTOs

use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    AgeCategory, Contest, ContestCriterion, ContestNomination, CurrentStage, FileConstraint, StageWindow,
};

/// Contest with its configuration
#[derive(Debug, Serialize)]
pub struct ContestDetailResponse {
    #[serde(flatten)]
    pub contest: Contest,
    pub age_categories: Vec<AgeCategory>,
    pub nominations: Vec<ContestNomination>,
    pub criteria: Vec<ContestCriterion>,
    pub file_constraints: Vec<FileConstraint>,
    pub stages: Vec<StageWindow>,
    pub current_stage: CurrentStage,
}

/// Contest list response
#[derive(Debug, Serialize)]
pub struct ContestsListResponse {
    pub contests: Vec<Contest>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Names touched by a configuration replacement
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct ReconcileResponse {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub updated: Vec<String>,
}

/// Stage windows after replacement
#[derive(Debug, Serialize)]
pub struct StagesResponse {
    pub stages: Vec<StageWindow>,
}

/// File constraints attached and detached by a replacement
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct FileConstraintsResponse {
    pub added: Vec<Uuid>,
    pub removed: Vec<Uuid>,
}
