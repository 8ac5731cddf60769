//! Upload restrictions a contest can require of submitted works

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Entry of the file constraint dictionary
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileConstraint {
    pub id: Uuid,
    pub name: String,
    /// Comma separated extensions, without dots
    pub file_formats: String,
}

impl FileConstraint {
    /// Allowed extensions, lowercased
    pub fn formats(&self) -> Vec<String> {
        self.file_formats
            .split(',')
            .map(|f| f.trim().trim_start_matches('.').to_lowercase())
            .filter(|f| !f.is_empty())
            .collect()
    }

    /// Whether a file name ends in one of the allowed extensions
    pub fn allows(&self, file_name: &str) -> bool {
        let Some((_, extension)) = file_name.rsplit_once('.') else {
            return false;
        };
        let extension = extension.to_lowercase();
        self.formats().iter().any(|f| *f == extension)
    }
}
