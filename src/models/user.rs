//! User projection and blocking models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The parts of a user account the contest engine needs
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub birth_date: NaiveDate,
    pub region: Option<String>,
}

/// Block placed on a user account
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserBlock {
    pub id: Uuid,
    pub user_id: Uuid,
    pub blocked_by: Uuid,
    pub blocked_until: DateTime<Utc>,
    pub unblocked_at: Option<DateTime<Utc>>,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

impl UserBlock {
    /// Check if the block is in force at `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_blocked || self.unblocked_at.is_some() {
            return false;
        }

        now < self.blocked_until
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn block(until: DateTime<Utc>) -> UserBlock {
        UserBlock {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            blocked_by: Uuid::new_v4(),
            blocked_until: until,
            unblocked_at: None,
            is_blocked: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_block_expires() {
        let now = Utc::now();
        assert!(block(now + Duration::days(1)).is_active_at(now));
        assert!(!block(now - Duration::seconds(1)).is_active_at(now));
    }

    #[test]
    fn test_lifted_block_is_inactive() {
        let now = Utc::now();
        let mut lifted = block(now + Duration::days(1));
        lifted.unblocked_at = Some(now);
        assert!(!lifted.is_active_at(now));

        let mut cleared = block(now + Duration::days(1));
        cleared.is_blocked = false;
        assert!(!cleared.is_active_at(now));
    }
}
