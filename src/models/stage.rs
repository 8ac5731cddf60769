//! Contest stage models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::UnknownVariant;

/// Fixed set of contest phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Applications are collected and moderated
    Collection,
    /// Jury score accepted applications
    Evaluation,
    /// Results are finalized and winners ranked
    Results,
}

impl StageKind {
    pub const ALL: [StageKind; 3] = [Self::Collection, Self::Evaluation, Self::Results];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Evaluation => "evaluation",
            Self::Results => "results",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "collection" => Some(Self::Collection),
            "evaluation" => Some(Self::Evaluation),
            "results" => Some(Self::Results),
            _ => None,
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for StageKind {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).ok_or(UnknownVariant {
            kind: "stage",
            value,
        })
    }
}

/// Dated window of one stage within one contest
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageWindow {
    pub contest_id: Uuid,
    #[sqlx(try_from = "String")]
    pub stage: StageKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl StageWindow {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

/// Outcome of resolving a contest's stage for a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CurrentStage {
    /// A window covers the day
    Active {
        stage: StageKind,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    /// Between windows (or before the first), with at least one window still ahead
    Planned,
    /// No window covers the day and none starts later
    Finished,
}

impl CurrentStage {
    /// Pick the window covering `today`.
    ///
    /// Windows never overlap, so at most one can match.
    pub fn resolve(windows: &[StageWindow], today: NaiveDate) -> Self {
        if let Some(window) = windows.iter().find(|w| w.contains(today)) {
            return Self::Active {
                stage: window.stage,
                start_date: window.start_date,
                end_date: window.end_date,
            };
        }

        if windows.iter().any(|w| w.start_date > today) {
            Self::Planned
        } else {
            Self::Finished
        }
    }

    /// The active stage, if any
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            Self::Active { stage, .. } => Some(*stage),
            Self::Planned | Self::Finished => None,
        }
    }

    pub fn is(&self, stage: StageKind) -> bool {
        self.stage() == Some(stage)
    }
}

impl std::fmt::Display for CurrentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active { stage, .. } => write!(f, "{}", stage),
            Self::Planned => write!(f, "planned"),
            Self::Finished => write!(f, "finished"),
        }
    }
}
