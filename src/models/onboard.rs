use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum SalaryType {
    Hourly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum OnboardStatus {
    Pending,
    Approved,
    Rejected,
}

impl OnboardStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OnboardStatus::Approved | OnboardStatus::Rejected)
    }
}

/// Offer/approval record created after a candidate clears the final
/// stage. Salary is stored in minor units.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OnboardRequest {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub salary: i64,
    pub salary_type: SalaryType,
    pub start_date: NaiveDate,
    pub status: OnboardStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Append-only audit trail of status transitions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OnboardHistoryEntry {
    pub id: i64,
    pub request_id: Uuid,
    pub prev_status: OnboardStatus,
    pub new_status: OnboardStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
