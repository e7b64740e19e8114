use crate::dto::outcome_dto::{EditFeedbackPayload, FinalDecision, SubmitFeedbackPayload};
use crate::error::{Error, Result};
use crate::models::outcome::{Decision, Outcome};
use crate::models::schedule::ScheduleStatus;
use crate::services::candidate_service::{advance_on_pass, mark_failed};
use crate::services::schedule_service::{complete_schedule_on, fetch_schedule};
use crate::utils::time;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

#[derive(Clone)]
pub struct OutcomeService {
    pool: SqlitePool,
}

impl OutcomeService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// One feedback record per schedule, submitted exactly once; later
    /// text changes go through `edit_feedback`. Completes the schedule
    /// in the same transaction.
    pub async fn submit_feedback(
        &self,
        schedule_id: Uuid,
        payload: SubmitFeedbackPayload,
    ) -> Result<Outcome> {
        let mut tx = self.pool.begin().await?;

        let schedule = fetch_schedule(&mut tx, schedule_id).await?;
        if schedule.status == ScheduleStatus::Canceled {
            return Err(Error::InvalidStateTransition(format!(
                "Schedule {} is canceled and cannot receive feedback",
                schedule_id
            )));
        }

        let existing: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM outcomes WHERE schedule_id = ?")
                .bind(schedule_id)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_some() {
            return Err(Error::Conflict(format!(
                "Feedback already exists for schedule {}; edit it instead",
                schedule_id
            )));
        }

        complete_schedule_on(&mut tx, schedule_id).await?;

        let outcome = Outcome {
            id: Uuid::new_v4(),
            schedule_id,
            feedback: payload.feedback,
            decision: Decision::Pending,
            created_at: time::now(),
            edited_at: None,
        };
        sqlx::query(
            "INSERT INTO outcomes (id, schedule_id, feedback, decision, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(outcome.id)
        .bind(outcome.schedule_id)
        .bind(&outcome.feedback)
        .bind(outcome.decision)
        .bind(outcome.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(outcome)
    }

    pub async fn get_outcome(&self, id: Uuid) -> Result<Outcome> {
        let mut conn = self.pool.acquire().await?;
        fetch_outcome(&mut conn, id).await
    }

    /// Feedback text may be revised at any time; the decision is not
    /// touched.
    pub async fn edit_feedback(&self, id: Uuid, payload: EditFeedbackPayload) -> Result<Outcome> {
        let mut tx = self.pool.begin().await?;
        fetch_outcome(&mut tx, id).await?;
        sqlx::query("UPDATE outcomes SET feedback = ?, edited_at = ? WHERE id = ?")
            .bind(&payload.feedback)
            .bind(time::now())
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let outcome = fetch_outcome(&mut tx, id).await?;
        tx.commit().await?;
        Ok(outcome)
    }

    /// One-way Pending -> Pass/Fail, compare-and-swapped on the stored
    /// decision so racing reviewers cannot both win. The candidate-side
    /// effect commits in the same transaction.
    pub async fn set_decision(&self, id: Uuid, decision: FinalDecision) -> Result<Outcome> {
        let mut tx = self.pool.begin().await?;

        let outcome = fetch_outcome(&mut tx, id).await?;
        let target = match decision {
            FinalDecision::Pass => Decision::Pass,
            FinalDecision::Fail => Decision::Fail,
        };

        let updated = sqlx::query(
            "UPDATE outcomes SET decision = ? WHERE id = ? AND decision = 'pending'",
        )
        .bind(target)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::InvalidStateTransition(format!(
                "Decision for outcome {} is already set",
                id
            )));
        }

        let schedule = fetch_schedule(&mut tx, outcome.schedule_id).await?;
        match decision {
            FinalDecision::Pass => advance_on_pass(&mut tx, schedule.candidate_id).await?,
            FinalDecision::Fail => mark_failed(&mut tx, schedule.candidate_id).await?,
        }

        let outcome = fetch_outcome(&mut tx, id).await?;
        tx.commit().await?;
        Ok(outcome)
    }
}

pub(crate) async fn fetch_outcome(conn: &mut SqliteConnection, id: Uuid) -> Result<Outcome> {
    sqlx::query_as::<_, Outcome>(
        "SELECT id, schedule_id, feedback, decision, created_at, edited_at \
         FROM outcomes WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Outcome {} not found", id)))
}
