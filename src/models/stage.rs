use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One ordered step of a position's interview process. `stage_order` is
/// strictly increasing from 1 within a position and immutable once any
/// schedule references the stage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Stage {
    pub id: Uuid,
    pub position_id: Uuid,
    pub name: String,
    pub stage_order: i32,
    pub duration_minutes: i32,
}

/// A stage together with the interviewer pool eligible to run it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageWithPool {
    #[serde(flatten)]
    pub stage: Stage,
    pub interviewer_pool: Vec<Uuid>,
}
