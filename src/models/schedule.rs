use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Scheduled,
    Completed,
    Canceled,
}

/// One interview-round instance. Interviewers live in the
/// `schedule_interviewers` join table and are loaded alongside.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Schedule {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub stage_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
}

/// Schedule joined with its stage ordinal, as returned by history queries.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduleWithStage {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub stage_id: Uuid,
    pub stage_order: i32,
    pub stage_name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
}
