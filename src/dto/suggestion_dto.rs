use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SuggestSlotsPayload {
    /// Candidate interview days chosen by the recruiter.
    /// Order-insensitive; duplicates are ignored.
    #[validate(length(min = 1))]
    pub days: Vec<NaiveDate>,
    /// Working set of picks already confirmed earlier in this suggestion
    /// run. Slots clashing with these are withheld; their candidates are
    /// skipped. Replaces any client-held pending state.
    #[serde(default)]
    pub confirmed: Vec<ConfirmedPick>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConfirmedPick {
    pub candidate_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub interviewer_ids: Vec<Uuid>,
}

/// Advisory only. Nothing is persisted until the recruiter confirms a
/// proposal through schedule creation, which re-validates conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotProposal {
    pub date: NaiveDate,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub interviewer_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateSuggestions {
    pub candidate_id: Uuid,
    pub full_name: String,
    /// Stage ordinal the candidate is transitioning from; None for a
    /// first round.
    pub from_stage_order: Option<i32>,
    pub target_stage_id: Uuid,
    pub target_stage_order: i32,
    pub target_stage_name: String,
    /// Empty when no slot fits on the supplied days; the caller should
    /// offer more days.
    pub proposals: Vec<SlotProposal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionResponse {
    pub position_id: Uuid,
    pub candidates: Vec<CandidateSuggestions>,
}
