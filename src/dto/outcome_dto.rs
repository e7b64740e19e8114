use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitFeedbackPayload {
    #[validate(length(min = 1))]
    pub feedback: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditFeedbackPayload {
    #[validate(length(min = 1))]
    pub feedback: String,
}

/// Only the two terminal decisions are accepted on the wire; Pending is
/// the initial state, never a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalDecision {
    Pass,
    Fail,
}

#[derive(Debug, Deserialize)]
pub struct SetDecisionPayload {
    pub decision: FinalDecision,
}
