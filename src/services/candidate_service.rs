use crate::dto::candidate_dto::{CandidateWithStage, IntakeCandidatePayload};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::services::catalog_service::ensure_position_exists;
use crate::utils::time;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

#[derive(Clone)]
pub struct CandidateService {
    pool: SqlitePool,
}

impl CandidateService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Entry point for the resume-intake collaborator: a scored
    /// application to one open position. Candidates start Pending.
    pub async fn intake_candidate(&self, payload: IntakeCandidatePayload) -> Result<Candidate> {
        let mut tx = self.pool.begin().await?;
        ensure_position_exists(&mut tx, payload.position_id).await?;

        let candidate = Candidate {
            id: Uuid::new_v4(),
            full_name: payload.full_name,
            email: payload.email,
            score: payload.score,
            status: CandidateStatus::Pending,
            position_id: payload.position_id,
            created_at: time::now(),
            updated_at: None,
        };
        sqlx::query(
            "INSERT INTO candidates (id, full_name, email, score, status, position_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(candidate.id)
        .bind(&candidate.full_name)
        .bind(&candidate.email)
        .bind(candidate.score)
        .bind(candidate.status)
        .bind(candidate.position_id)
        .bind(candidate.created_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(candidate)
    }

    pub async fn get_candidate(&self, id: Uuid) -> Result<Candidate> {
        let mut conn = self.pool.acquire().await?;
        fetch_candidate(&mut conn, id).await
    }

    /// All candidates attached to a position, each annotated with the
    /// current stage: highest stage ordinal among completed/scheduled
    /// rounds, or stage 1 when nothing has been booked yet.
    pub async fn candidates_for_position(
        &self,
        position_id: Uuid,
    ) -> Result<Vec<CandidateWithStage>> {
        let mut conn = self.pool.acquire().await?;
        ensure_position_exists(&mut conn, position_id).await?;

        let candidates = sqlx::query_as::<_, Candidate>(
            "SELECT id, full_name, email, score, status, position_id, created_at, updated_at \
             FROM candidates WHERE position_id = ? ORDER BY created_at, id",
        )
        .bind(position_id)
        .fetch_all(&mut *conn)
        .await?;

        let mut annotated = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let current: Option<i32> = sqlx::query_scalar(
                "SELECT MAX(st.stage_order) FROM schedules s \
                 JOIN stages st ON st.id = s.stage_id \
                 WHERE s.candidate_id = ? AND s.status IN ('scheduled', 'completed')",
            )
            .bind(candidate.id)
            .fetch_one(&mut *conn)
            .await?;
            let current_stage_order = current.unwrap_or(1);

            let current_stage_name: Option<String> = sqlx::query_scalar(
                "SELECT name FROM stages WHERE position_id = ? AND stage_order = ?",
            )
            .bind(position_id)
            .bind(current_stage_order)
            .fetch_optional(&mut *conn)
            .await?;

            annotated.push(CandidateWithStage {
                candidate,
                current_stage_order,
                current_stage_name,
            });
        }
        Ok(annotated)
    }

    /// Explicit HR rejection. Terminal, audit-retained; the row is never
    /// deleted.
    pub async fn reject_candidate(&self, id: Uuid) -> Result<Candidate> {
        let mut tx = self.pool.begin().await?;
        let candidate = fetch_candidate(&mut tx, id).await?;
        if candidate.status.is_terminal() {
            return Err(Error::InvalidStateTransition(format!(
                "Candidate {} is already in terminal status",
                id
            )));
        }
        sqlx::query("UPDATE candidates SET status = ?, updated_at = ? WHERE id = ?")
            .bind(CandidateStatus::Rejected)
            .bind(time::now())
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        self.get_candidate(id).await
    }
}

pub(crate) async fn fetch_candidate(conn: &mut SqliteConnection, id: Uuid) -> Result<Candidate> {
    sqlx::query_as::<_, Candidate>(
        "SELECT id, full_name, email, score, status, position_id, created_at, updated_at \
         FROM candidates WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))
}

/// Stage-outcome side effect for a Pass decision, run inside the
/// outcome transaction. The status itself stays Pending (onboarding, not
/// a pass, moves it further); terminal candidates reject the retry.
pub(crate) async fn advance_on_pass(conn: &mut SqliteConnection, candidate_id: Uuid) -> Result<()> {
    let candidate = fetch_candidate(&mut *conn, candidate_id).await?;
    if candidate.status.is_terminal() {
        return Err(Error::InvalidStateTransition(format!(
            "Candidate {} is in terminal status and cannot advance",
            candidate_id
        )));
    }
    sqlx::query("UPDATE candidates SET updated_at = ? WHERE id = ?")
        .bind(time::now())
        .bind(candidate_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Stage-outcome side effect for a Fail decision, run inside the
/// outcome transaction.
pub(crate) async fn mark_failed(conn: &mut SqliteConnection, candidate_id: Uuid) -> Result<()> {
    let candidate = fetch_candidate(&mut *conn, candidate_id).await?;
    if candidate.status.is_terminal() {
        return Err(Error::InvalidStateTransition(format!(
            "Candidate {} is in terminal status and cannot be failed",
            candidate_id
        )));
    }
    sqlx::query("UPDATE candidates SET status = ?, updated_at = ? WHERE id = ?")
        .bind(CandidateStatus::Failed)
        .bind(time::now())
        .bind(candidate_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Onboard-approval side effect: Pending -> Onboarded.
pub(crate) async fn mark_onboarded(conn: &mut SqliteConnection, candidate_id: Uuid) -> Result<()> {
    let candidate = fetch_candidate(&mut *conn, candidate_id).await?;
    if candidate.status.is_terminal() {
        return Err(Error::InvalidStateTransition(format!(
            "Candidate {} is in terminal status and cannot be onboarded",
            candidate_id
        )));
    }
    sqlx::query("UPDATE candidates SET status = ?, updated_at = ? WHERE id = ?")
        .bind(CandidateStatus::Onboarded)
        .bind(time::now())
        .bind(candidate_id)
        .execute(conn)
        .await?;
    Ok(())
}
