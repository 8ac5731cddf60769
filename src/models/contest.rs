//! Contest model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::ONLINE_REGION;

/// Contest database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Contest {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub avatar: Option<String>,
    pub link_to_rules: Option<String>,
    pub organizer: String,
    pub prizes: Option<String>,
    pub contacts_for_participants: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub is_draft: bool,
    pub is_deleted: bool,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contest {
    /// Check whether a user from `user_region` may apply to this contest.
    ///
    /// Contests without a region, and online contests, accept everyone.
    pub fn accepts_region(&self, user_region: Option<&str>) -> bool {
        match self.region.as_deref() {
            None => true,
            Some(region) if region.eq_ignore_ascii_case(ONLINE_REGION) => true,
            Some(region) => user_region.is_some_and(|r| r.eq_ignore_ascii_case(region)),
        }
    }

    /// Visible to the public catalogue
    pub fn is_visible(&self) -> bool {
        self.is_published && !self.is_deleted
    }
}

/// Age category attached to contests
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgeCategory {
    pub id: Uuid,
    pub name: String,
    pub start_age: i32,
    pub end_age: i32,
}

impl AgeCategory {
    /// Inclusive on both ends
    pub fn contains(&self, age: i32) -> bool {
        self.start_age <= age && age <= self.end_age
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contest_in(region: Option<&str>) -> Contest {
        Contest {
            id: Uuid::new_v4(),
            title: "Spring".to_string(),
            description: String::new(),
            avatar: None,
            link_to_rules: None,
            organizer: "Org".to_string(),
            prizes: None,
            contacts_for_participants: None,
            category: None,
            region: region.map(str::to_string),
            is_draft: true,
            is_deleted: false,
            is_published: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_region_eligibility() {
        assert!(contest_in(None).accepts_region(None));
        assert!(contest_in(Some("Online")).accepts_region(Some("Tver")));
        assert!(contest_in(Some("Tver")).accepts_region(Some("tver")));
        assert!(!contest_in(Some("Tver")).accepts_region(Some("Omsk")));
        assert!(!contest_in(Some("Tver")).accepts_region(None));
    }

    #[test]
    fn test_age_category_bounds_are_inclusive() {
        let teen = AgeCategory {
            id: Uuid::new_v4(),
            name: "Teen".to_string(),
            start_age: 13,
            end_age: 19,
        };
        assert!(teen.contains(13));
        assert!(teen.contains(19));
        assert!(!teen.contains(12));
        assert!(!teen.contains(20));
    }
}
