//! Contest request DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{
        MAX_BATCH_ITEMS, MAX_CONTEST_DESCRIPTION_LENGTH, MAX_CONTEST_TITLE_LENGTH, MAX_FILE_CONSTRAINTS,
        MAX_SHORT_TEXT_LENGTH,
    },
    models::StageKind,
};

/// Create contest request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContestRequest {
    #[validate(length(min = 1, max = MAX_CONTEST_TITLE_LENGTH))]
    pub title: String,

    #[validate(length(max = MAX_CONTEST_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    #[validate(length(max = MAX_SHORT_TEXT_LENGTH))]
    pub avatar: Option<String>,

    #[validate(length(max = MAX_SHORT_TEXT_LENGTH))]
    pub link_to_rules: Option<String>,

    #[validate(length(min = 1, max = MAX_SHORT_TEXT_LENGTH))]
    pub organizer: String,

    #[validate(length(max = MAX_CONTEST_DESCRIPTION_LENGTH))]
    pub prizes: Option<String>,

    #[validate(length(max = MAX_CONTEST_DESCRIPTION_LENGTH))]
    pub contacts_for_participants: Option<String>,

    /// Category name, created on first use
    #[validate(length(min = 1, max = MAX_SHORT_TEXT_LENGTH))]
    pub category: Option<String>,

    /// Region name; `online` or absent admits every region
    #[validate(length(min = 1, max = MAX_SHORT_TEXT_LENGTH))]
    pub region: Option<String>,

    #[validate(length(min = 1, max = MAX_BATCH_ITEMS))]
    pub age_category_ids: Vec<Uuid>,
}

/// Update contest request; absent fields keep their value
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContestRequest {
    #[validate(length(min = 1, max = MAX_CONTEST_TITLE_LENGTH))]
    pub title: Option<String>,

    #[validate(length(max = MAX_CONTEST_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    #[validate(length(max = MAX_SHORT_TEXT_LENGTH))]
    pub avatar: Option<String>,

    #[validate(length(max = MAX_SHORT_TEXT_LENGTH))]
    pub link_to_rules: Option<String>,

    #[validate(length(min = 1, max = MAX_SHORT_TEXT_LENGTH))]
    pub organizer: Option<String>,

    #[validate(length(max = MAX_CONTEST_DESCRIPTION_LENGTH))]
    pub prizes: Option<String>,

    #[validate(length(max = MAX_CONTEST_DESCRIPTION_LENGTH))]
    pub contacts_for_participants: Option<String>,

    #[validate(length(min = 1, max = MAX_SHORT_TEXT_LENGTH))]
    pub category: Option<String>,

    #[validate(length(min = 1, max = MAX_SHORT_TEXT_LENGTH))]
    pub region: Option<String>,

    pub is_draft: Option<bool>,

    /// Full replacement set of age categories
    #[validate(length(min = 1, max = MAX_BATCH_ITEMS))]
    pub age_category_ids: Option<Vec<Uuid>>,
}

/// List contests query parameters
#[derive(Debug, Deserialize)]
pub struct ListContestsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// One criterion in a replacement set
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CriterionInput {
    #[validate(length(min = 1, max = MAX_SHORT_TEXT_LENGTH))]
    pub name: String,

    #[validate(length(max = MAX_CONTEST_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    pub min_points: i32,
    pub max_points: i32,
}

/// Replace the criteria of a contest
#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceCriteriaRequest {
    #[validate(length(max = MAX_BATCH_ITEMS), nested)]
    pub criteria: Vec<CriterionInput>,
}

/// One nomination in a replacement set
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NominationInput {
    #[validate(length(min = 1, max = MAX_SHORT_TEXT_LENGTH))]
    pub name: String,

    #[validate(length(max = MAX_CONTEST_DESCRIPTION_LENGTH))]
    pub description: Option<String>,
}

/// Replace the nominations of a contest
#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceNominationsRequest {
    #[validate(length(max = MAX_BATCH_ITEMS), nested)]
    pub nominations: Vec<NominationInput>,
}

/// One dated stage window
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StageWindowInput {
    pub stage: StageKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Replace the stage windows of a contest
#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceStagesRequest {
    #[validate(length(max = 3))]
    pub stages: Vec<StageWindowInput>,
}

/// Replace the file constraints of a contest
#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceFileConstraintsRequest {
    #[validate(length(min = 1, max = MAX_FILE_CONSTRAINTS))]
    pub file_constraint_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(name: &str) -> CriterionInput {
        CriterionInput {
            name: name.to_string(),
            description: None,
            min_points: 0,
            max_points: 10,
        }
    }

    #[test]
    fn test_oversized_criteria_batch_rejected() {
        let request = ReplaceCriteriaRequest {
            criteria: vec![criterion("Idea"); MAX_BATCH_ITEMS as usize + 1],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_nested_items_are_validated() {
        let request = ReplaceCriteriaRequest {
            criteria: vec![criterion("Idea"), criterion("")],
        };
        assert!(request.validate().is_err());

        let request = ReplaceNominationsRequest {
            nominations: vec![NominationInput {
                name: "Painting".to_string(),
                description: None,
            }],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_stage_list_is_capped() {
        let day = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let window = StageWindowInput {
            stage: StageKind::Collection,
            start_date: day,
            end_date: day,
        };
        let request = ReplaceStagesRequest {
            stages: vec![window; 4],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_file_constraint_count_bounds() {
        let empty = ReplaceFileConstraintsRequest {
            file_constraint_ids: vec![],
        };
        assert!(empty.validate().is_err());

        let too_many = ReplaceFileConstraintsRequest {
            file_constraint_ids: (0..4).map(|_| Uuid::new_v4()).collect(),
        };
        assert!(too_many.validate().is_err());

        let three = ReplaceFileConstraintsRequest {
            file_constraint_ids: (0..3).map(|_| Uuid::new_v4()).collect(),
        };
        assert!(three.validate().is_ok());
    }
}
