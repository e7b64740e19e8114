use crate::models::schedule::{Schedule, ScheduleWithStage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSchedulePayload {
    pub candidate_id: Uuid,
    pub stage_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[validate(length(min = 1))]
    pub interviewer_ids: Vec<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub interviewer_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleHistoryItem {
    #[serde(flatten)]
    pub schedule: ScheduleWithStage,
    pub interviewer_ids: Vec<Uuid>,
}
