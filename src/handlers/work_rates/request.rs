//! Work rate request DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::MAX_BATCH_ITEMS;

/// Score for one criterion
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateInput {
    pub criteria_id: Uuid,
    pub rate: i32,
}

/// Scores of one jury member for one application
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitScoresRequest {
    #[validate(length(max = MAX_BATCH_ITEMS))]
    pub rates: Vec<RateInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_batch_size_is_capped() {
        let rate = RateInput {
            criteria_id: Uuid::new_v4(),
            rate: 5,
        };

        let request = SubmitScoresRequest { rates: vec![rate; 3] };
        assert!(request.validate().is_ok());

        let request = SubmitScoresRequest {
            rates: vec![rate; MAX_BATCH_ITEMS as usize + 1],
        };
        assert!(request.validate().is_err());
    }
}
