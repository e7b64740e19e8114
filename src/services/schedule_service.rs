use crate::dto::schedule_dto::{CreateSchedulePayload, ScheduleHistoryItem, ScheduleResponse};
use crate::error::{Error, Result};
use crate::models::schedule::{Schedule, ScheduleStatus, ScheduleWithStage};
use crate::models::stage::Stage;
use crate::services::candidate_service::fetch_candidate;
use crate::services::notification_service::NotificationService;
use crate::utils::time;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

#[derive(Clone)]
pub struct ScheduleService {
    pool: SqlitePool,
    notifier: NotificationService,
}

impl ScheduleService {
    pub fn new(pool: SqlitePool, notifier: NotificationService) -> Self {
        Self { pool, notifier }
    }

    /// Confirms one interview round. The suggestion engine is advisory;
    /// this is the authoritative path, so every gate is re-checked here
    /// against current state inside a single transaction:
    /// stage progression, duplicate live round, interviewer overlap.
    pub async fn create_schedule(&self, payload: CreateSchedulePayload) -> Result<ScheduleResponse> {
        if payload.end_at <= payload.start_at {
            return Err(Error::BadRequest(
                "Schedule end must be after its start".to_string(),
            ));
        }
        let mut interviewer_ids = payload.interviewer_ids.clone();
        interviewer_ids.sort();
        interviewer_ids.dedup();
        if interviewer_ids.is_empty() {
            return Err(Error::BadRequest(
                "At least one interviewer is required".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let candidate = fetch_candidate(&mut tx, payload.candidate_id).await?;
        if candidate.status.is_terminal() {
            return Err(Error::PreconditionFailed(format!(
                "Candidate {} is in terminal status and cannot be scheduled",
                candidate.id
            )));
        }

        let stage = fetch_stage(&mut tx, payload.stage_id).await?;
        if stage.position_id != candidate.position_id {
            return Err(Error::BadRequest(
                "Stage belongs to a different position than the candidate".to_string(),
            ));
        }

        let pool_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT interviewer_id FROM stage_interviewers WHERE stage_id = ?")
                .bind(stage.id)
                .fetch_all(&mut *tx)
                .await?;
        for interviewer_id in &interviewer_ids {
            if !pool_ids.contains(interviewer_id) {
                return Err(Error::BadRequest(format!(
                    "Interviewer {} is not in the stage's interviewer pool",
                    interviewer_id
                )));
            }
        }

        // Stage progression is re-derived from persisted history, never
        // taken from the client.
        let passed = highest_passed_order(&mut tx, candidate.id).await?;
        if stage.stage_order != passed + 1 {
            return Err(Error::PreconditionFailed(format!(
                "Stage {} cannot be scheduled: candidate has passed through stage {}",
                stage.stage_order, passed
            )));
        }

        let live: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM schedules WHERE candidate_id = ? AND stage_id = ? AND status = 'scheduled'",
        )
        .bind(candidate.id)
        .bind(stage.id)
        .fetch_optional(&mut *tx)
        .await?;
        if live.is_some() {
            return Err(Error::Conflict(format!(
                "Candidate {} already has a live schedule for stage {}",
                candidate.id, stage.stage_order
            )));
        }

        for interviewer_id in &interviewer_ids {
            let busy: Vec<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
                "SELECT s.start_at, s.end_at FROM schedules s \
                 JOIN schedule_interviewers si ON si.schedule_id = s.id \
                 WHERE si.interviewer_id = ? AND s.status = 'scheduled'",
            )
            .bind(interviewer_id)
            .fetch_all(&mut *tx)
            .await?;
            if busy
                .iter()
                .any(|(b_start, b_end)| {
                    time::overlaps(payload.start_at, payload.end_at, *b_start, *b_end)
                })
            {
                return Err(Error::Conflict(format!(
                    "Interviewer {} has an overlapping schedule",
                    interviewer_id
                )));
            }
        }

        let schedule = Schedule {
            id: Uuid::new_v4(),
            candidate_id: candidate.id,
            stage_id: stage.id,
            start_at: payload.start_at,
            end_at: payload.end_at,
            notes: payload.notes,
            status: ScheduleStatus::Scheduled,
            created_at: time::now(),
        };
        sqlx::query(
            "INSERT INTO schedules (id, candidate_id, stage_id, start_at, end_at, notes, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(schedule.id)
        .bind(schedule.candidate_id)
        .bind(schedule.stage_id)
        .bind(schedule.start_at)
        .bind(schedule.end_at)
        .bind(&schedule.notes)
        .bind(schedule.status)
        .bind(schedule.created_at)
        .execute(&mut *tx)
        .await?;
        for interviewer_id in &interviewer_ids {
            sqlx::query(
                "INSERT INTO schedule_interviewers (schedule_id, interviewer_id) VALUES (?, ?)",
            )
            .bind(schedule.id)
            .bind(interviewer_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.notifier.schedule_created(&schedule, &interviewer_ids);

        Ok(ScheduleResponse {
            schedule,
            interviewer_ids,
        })
    }

    /// Scheduled -> Canceled. Terminal; no further stage advancement
    /// happens through a canceled round.
    pub async fn cancel_schedule(&self, id: Uuid) -> Result<Schedule> {
        let mut tx = self.pool.begin().await?;
        let schedule = fetch_schedule(&mut tx, id).await?;
        let updated = match schedule.status {
            ScheduleStatus::Canceled => schedule,
            ScheduleStatus::Completed => {
                return Err(Error::InvalidStateTransition(format!(
                    "Schedule {} is completed and cannot be canceled",
                    id
                )))
            }
            ScheduleStatus::Scheduled => {
                sqlx::query("UPDATE schedules SET status = ? WHERE id = ?")
                    .bind(ScheduleStatus::Canceled)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                Schedule {
                    status: ScheduleStatus::Canceled,
                    ..schedule
                }
            }
        };
        tx.commit().await?;
        Ok(updated)
    }

    /// Full round history for a candidate, ordered by stage ordinal then
    /// start time.
    pub async fn schedule_history(&self, candidate_id: Uuid) -> Result<Vec<ScheduleHistoryItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_candidate(&mut conn, candidate_id).await?;

        let rows = sqlx::query_as::<_, ScheduleWithStage>(
            "SELECT s.id, s.candidate_id, s.stage_id, st.stage_order, st.name AS stage_name, \
                    s.start_at, s.end_at, s.notes, s.status, s.created_at \
             FROM schedules s JOIN stages st ON st.id = s.stage_id \
             WHERE s.candidate_id = ? \
             ORDER BY st.stage_order ASC, s.start_at ASC",
        )
        .bind(candidate_id)
        .fetch_all(&mut *conn)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for schedule in rows {
            let mut interviewer_ids: Vec<Uuid> = sqlx::query_scalar(
                "SELECT interviewer_id FROM schedule_interviewers WHERE schedule_id = ?",
            )
            .bind(schedule.id)
            .fetch_all(&mut *conn)
            .await?;
            interviewer_ids.sort();
            items.push(ScheduleHistoryItem {
                schedule,
                interviewer_ids,
            });
        }
        Ok(items)
    }
}

pub(crate) async fn fetch_schedule(conn: &mut SqliteConnection, id: Uuid) -> Result<Schedule> {
    sqlx::query_as::<_, Schedule>(
        "SELECT id, candidate_id, stage_id, start_at, end_at, notes, status, created_at \
         FROM schedules WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Schedule {} not found", id)))
}

pub(crate) async fn fetch_stage(conn: &mut SqliteConnection, id: Uuid) -> Result<Stage> {
    sqlx::query_as::<_, Stage>(
        "SELECT id, position_id, name, stage_order, duration_minutes FROM stages WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Stage {} not found", id)))
}

/// Highest stage ordinal the candidate has cleared: a completed round
/// with a Pass outcome. Zero when nothing is passed yet.
pub(crate) async fn highest_passed_order(
    conn: &mut SqliteConnection,
    candidate_id: Uuid,
) -> Result<i32> {
    let passed: Option<i32> = sqlx::query_scalar(
        "SELECT MAX(st.stage_order) FROM schedules s \
         JOIN stages st ON st.id = s.stage_id \
         JOIN outcomes o ON o.schedule_id = s.id \
         WHERE s.candidate_id = ? AND s.status = 'completed' AND o.decision = 'pass'",
    )
    .bind(candidate_id)
    .fetch_one(conn)
    .await?;
    Ok(passed.unwrap_or(0))
}

/// Shared with the outcome path so feedback submission and completion
/// commit atomically.
pub(crate) async fn complete_schedule_on(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Schedule> {
    let schedule = fetch_schedule(&mut *conn, id).await?;
    match schedule.status {
        ScheduleStatus::Completed => Ok(schedule),
        ScheduleStatus::Canceled => Err(Error::InvalidStateTransition(format!(
            "Schedule {} is canceled and cannot be completed",
            id
        ))),
        ScheduleStatus::Scheduled => {
            sqlx::query("UPDATE schedules SET status = ? WHERE id = ?")
                .bind(ScheduleStatus::Completed)
                .bind(id)
                .execute(conn)
                .await?;
            Ok(Schedule {
                status: ScheduleStatus::Completed,
                ..schedule
            })
        }
    }
}
