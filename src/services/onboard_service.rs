use crate::dto::onboard_dto::{
    ChangeOnboardStatusPayload, CreateOnboardPayload, OnboardResponse, UpdateOfferPayload,
};
use crate::error::{Error, Result};
use crate::models::onboard::{OnboardHistoryEntry, OnboardRequest, OnboardStatus};
use crate::services::candidate_service::{fetch_candidate, mark_onboarded};
use crate::services::notification_service::NotificationService;
use crate::services::schedule_service::highest_passed_order;
use crate::utils::time;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Offer/approval workflow: Pending -> Approved | Rejected, terminal
/// either way, with an append-only history of transitions.
#[derive(Clone)]
pub struct OnboardService {
    pool: SqlitePool,
    notifier: NotificationService,
}

impl OnboardService {
    pub fn new(pool: SqlitePool, notifier: NotificationService) -> Self {
        Self { pool, notifier }
    }

    /// HR opens an offer once the candidate has passed the final stage.
    /// Both gates are re-checked against persisted state.
    pub async fn create_request(&self, payload: CreateOnboardPayload) -> Result<OnboardResponse> {
        let mut tx = self.pool.begin().await?;

        let candidate = fetch_candidate(&mut tx, payload.candidate_id).await?;
        if candidate.status.is_terminal() {
            return Err(Error::PreconditionFailed(format!(
                "Candidate {} is in terminal status",
                candidate.id
            )));
        }

        let final_order: Option<i32> =
            sqlx::query_scalar("SELECT MAX(stage_order) FROM stages WHERE position_id = ?")
                .bind(candidate.position_id)
                .fetch_one(&mut *tx)
                .await?;
        let Some(final_order) = final_order else {
            return Err(Error::PreconditionFailed(
                "Position has no interview stages configured".to_string(),
            ));
        };
        let passed = highest_passed_order(&mut tx, candidate.id).await?;
        if passed < final_order {
            return Err(Error::PreconditionFailed(format!(
                "Candidate {} has not passed the final stage",
                candidate.id
            )));
        }

        let pending: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM onboard_requests WHERE candidate_id = ? AND status = 'pending'",
        )
        .bind(candidate.id)
        .fetch_optional(&mut *tx)
        .await?;
        if pending.is_some() {
            return Err(Error::PreconditionFailed(format!(
                "Candidate {} already has a pending onboard request",
                candidate.id
            )));
        }

        let request = OnboardRequest {
            id: Uuid::new_v4(),
            candidate_id: candidate.id,
            salary: payload.salary,
            salary_type: payload.salary_type,
            start_date: payload.start_date,
            status: OnboardStatus::Pending,
            created_at: time::now(),
            updated_at: None,
        };
        sqlx::query(
            "INSERT INTO onboard_requests \
             (id, candidate_id, salary, salary_type, start_date, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.id)
        .bind(request.candidate_id)
        .bind(request.salary)
        .bind(request.salary_type)
        .bind(request.start_date)
        .bind(request.status)
        .bind(request.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(OnboardResponse {
            request,
            history: Vec::new(),
        })
    }

    /// Salary and start date may be renegotiated only while the request
    /// is Pending; terminal requests are immutable.
    pub async fn update_offer(&self, id: Uuid, payload: UpdateOfferPayload) -> Result<OnboardRequest> {
        let mut tx = self.pool.begin().await?;
        let request = fetch_request(&mut tx, id).await?;
        if request.status.is_terminal() {
            return Err(Error::InvalidStateTransition(format!(
                "Onboard request {} is terminal and cannot be updated",
                id
            )));
        }
        sqlx::query(
            "UPDATE onboard_requests \
             SET salary = ?, salary_type = ?, start_date = ?, updated_at = ? WHERE id = ?",
        )
        .bind(payload.salary)
        .bind(payload.salary_type)
        .bind(payload.start_date)
        .bind(time::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;
        let request = fetch_request(&mut tx, id).await?;
        tx.commit().await?;
        Ok(request)
    }

    /// Pending -> Approved | Rejected, compare-and-swapped on the stored
    /// status. The history append and, for Approved, the candidate
    /// transition to Onboarded commit atomically with it.
    pub async fn change_status(
        &self,
        id: Uuid,
        payload: ChangeOnboardStatusPayload,
    ) -> Result<OnboardResponse> {
        if payload.status == OnboardStatus::Pending {
            return Err(Error::BadRequest(
                "Target status must be approved or rejected".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let request = fetch_request(&mut tx, id).await?;

        let updated = sqlx::query(
            "UPDATE onboard_requests SET status = ?, updated_at = ? \
             WHERE id = ? AND status = 'pending'",
        )
        .bind(payload.status)
        .bind(time::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::InvalidStateTransition(format!(
                "Onboard request {} is already {:?}",
                id, request.status
            )));
        }

        sqlx::query(
            "INSERT INTO onboard_history (request_id, prev_status, new_status, note, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(OnboardStatus::Pending)
        .bind(payload.status)
        .bind(&payload.note)
        .bind(time::now())
        .execute(&mut *tx)
        .await?;

        if payload.status == OnboardStatus::Approved {
            mark_onboarded(&mut tx, request.candidate_id).await?;
        }

        let request = fetch_request(&mut tx, id).await?;
        let history = fetch_history(&mut tx, id).await?;
        tx.commit().await?;

        if request.status == OnboardStatus::Approved {
            self.notifier
                .candidate_onboarded(request.candidate_id, request.id);
        }

        Ok(OnboardResponse { request, history })
    }

    pub async fn get_request(&self, id: Uuid) -> Result<OnboardResponse> {
        let mut conn = self.pool.acquire().await?;
        let request = fetch_request(&mut conn, id).await?;
        let history = fetch_history(&mut conn, id).await?;
        Ok(OnboardResponse { request, history })
    }
}

async fn fetch_request(conn: &mut SqliteConnection, id: Uuid) -> Result<OnboardRequest> {
    sqlx::query_as::<_, OnboardRequest>(
        "SELECT id, candidate_id, salary, salary_type, start_date, status, created_at, updated_at \
         FROM onboard_requests WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Onboard request {} not found", id)))
}

async fn fetch_history(
    conn: &mut SqliteConnection,
    request_id: Uuid,
) -> Result<Vec<OnboardHistoryEntry>> {
    let history = sqlx::query_as::<_, OnboardHistoryEntry>(
        "SELECT id, request_id, prev_status, new_status, note, created_at \
         FROM onboard_history WHERE request_id = ? ORDER BY id",
    )
    .bind(request_id)
    .fetch_all(conn)
    .await?;
    Ok(history)
}
