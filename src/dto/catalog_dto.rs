use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePositionPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub department: String,
    #[validate(range(min = 1))]
    pub total_slots: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStagePayload {
    #[validate(length(min = 1))]
    pub name: String,
    /// Must be the next ordinal in the position's process (contiguous
    /// from 1).
    #[validate(range(min = 1))]
    pub stage_order: i32,
    #[validate(range(min = 5, max = 480))]
    pub duration_minutes: i32,
    #[validate(length(min = 1))]
    pub interviewer_pool: Vec<Uuid>,
}
