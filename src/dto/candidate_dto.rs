use crate::models::candidate::Candidate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Payload from the resume-intake collaborator. The score is an opaque
/// upstream number, only range-checked here.
#[derive(Debug, Deserialize, Validate)]
pub struct IntakeCandidatePayload {
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(range(min = 0, max = 100))]
    pub score: i32,
    pub position_id: Uuid,
}

/// Candidate annotated with its current pipeline stage: the highest
/// stage ordinal among completed/scheduled rounds, or 1 if none.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateWithStage {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub current_stage_order: i32,
    pub current_stage_name: Option<String>,
}
