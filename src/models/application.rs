//! Application (contest entry) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::UnknownVariant;

/// Moderation status of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).ok_or(UnknownVariant {
            kind: "application status",
            value,
        })
    }
}

/// Application database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub name: String,
    pub annotation: String,
    pub link_to_work: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    pub rejection_reason: Option<String>,
    /// Name of the age category matched at submission time
    pub age_category: String,
    pub nomination_id: Uuid,
    pub contest_id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Only pending applications can be edited by their author
    pub fn is_editable(&self) -> bool {
        self.status == ApplicationStatus::Pending
    }

    /// Check whether a moderation transition to `target` is allowed.
    ///
    /// Approval and rejection are each refused when the application is
    /// already in that status; pending is never a target.
    pub fn can_transition_to(&self, target: ApplicationStatus) -> bool {
        match target {
            ApplicationStatus::Pending => false,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected => self.status != target,
        }
    }
}
