//! Contest participant model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::UnknownVariant;

/// Role a user holds within one contest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    /// Created the contest and configures it
    Owner,
    /// Moderates applications
    OrgCommittee,
    /// Scores accepted applications
    Jury,
    /// Submits applications
    Member,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::OrgCommittee => "org_committee",
            Self::Jury => "jury",
            Self::Member => "member",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(Self::Owner),
            "org_committee" => Some(Self::OrgCommittee),
            "jury" => Some(Self::Jury),
            "member" => Some(Self::Member),
            _ => None,
        }
    }

    /// Staff roles may not submit applications to the same contest
    pub fn is_staff(&self) -> bool {
        !matches!(self, Self::Member)
    }
}

impl std::fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for ParticipantRole {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).ok_or(UnknownVariant {
            kind: "participant role",
            value,
        })
    }
}

/// Participant database model: one row per (user, contest)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub contest_id: Uuid,
    #[sqlx(try_from = "String")]
    pub role: ParticipantRole,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_members_are_not_staff() {
        assert!(!ParticipantRole::Member.is_staff());
        assert!(ParticipantRole::Jury.is_staff());
        assert!(ParticipantRole::OrgCommittee.is_staff());
        assert!(ParticipantRole::Owner.is_staff());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(
            ParticipantRole::from_str("org_committee"),
            Some(ParticipantRole::OrgCommittee)
        );
        assert_eq!(ParticipantRole::from_str("admin"), None);
    }
}
