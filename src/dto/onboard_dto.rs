use crate::models::onboard::{OnboardHistoryEntry, OnboardRequest, OnboardStatus, SalaryType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOnboardPayload {
    pub candidate_id: Uuid,
    #[validate(range(min = 0))]
    pub salary: i64,
    pub salary_type: SalaryType,
    pub start_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOfferPayload {
    #[validate(range(min = 0))]
    pub salary: i64,
    pub salary_type: SalaryType,
    pub start_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ChangeOnboardStatusPayload {
    pub status: OnboardStatus,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OnboardResponse {
    #[serde(flatten)]
    pub request: OnboardRequest,
    pub history: Vec<OnboardHistoryEntry>,
}
