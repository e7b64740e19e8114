use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum CandidateStatus {
    Pending,
    Rejected,
    Accepted,
    Failed,
    Onboarded,
}

impl CandidateStatus {
    /// Terminal statuses permit no further pipeline transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CandidateStatus::Rejected | CandidateStatus::Failed | CandidateStatus::Onboarded
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    /// Resume score from the upstream intake, 0-100. Opaque here.
    pub score: i32,
    pub status: CandidateStatus,
    pub position_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
