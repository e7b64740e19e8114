use crate::dto::catalog_dto::{CreatePositionPayload, CreateStagePayload};
use crate::error::{Error, Result};
use crate::models::position::Position;
use crate::models::stage::{Stage, StageWithPool};
use crate::utils::time;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

/// Positions, stage processes and interviewer pools. Reference data from
/// the scheduling core's point of view: written when a process is set
/// up, read-only at scheduling time.
#[derive(Clone)]
pub struct CatalogService {
    pool: SqlitePool,
}

impl CatalogService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_position(&self, payload: CreatePositionPayload) -> Result<Position> {
        let position = Position {
            id: Uuid::new_v4(),
            title: payload.title,
            department: payload.department,
            total_slots: payload.total_slots.unwrap_or(1),
            created_at: time::now(),
        };
        sqlx::query(
            "INSERT INTO positions (id, title, department, total_slots, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(position.id)
        .bind(&position.title)
        .bind(&position.department)
        .bind(position.total_slots)
        .bind(position.created_at)
        .execute(&self.pool)
        .await?;
        Ok(position)
    }

    pub async fn get_position(&self, id: Uuid) -> Result<Position> {
        sqlx::query_as::<_, Position>(
            "SELECT id, title, department, total_slots, created_at FROM positions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Position {} not found", id)))
    }

    pub async fn list_positions(&self) -> Result<Vec<Position>> {
        let positions = sqlx::query_as::<_, Position>(
            "SELECT id, title, department, total_slots, created_at \
             FROM positions ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(positions)
    }

    /// Appends a stage to a position's process. Orders are contiguous
    /// from 1, so the payload's ordinal must be exactly one past the
    /// current highest. Existing stages are never reordered.
    pub async fn add_stage(
        &self,
        position_id: Uuid,
        payload: CreateStagePayload,
    ) -> Result<StageWithPool> {
        let mut tx = self.pool.begin().await?;

        ensure_position_exists(&mut tx, position_id).await?;

        let max_order: Option<i32> =
            sqlx::query_scalar("SELECT MAX(stage_order) FROM stages WHERE position_id = ?")
                .bind(position_id)
                .fetch_one(&mut *tx)
                .await?;
        let expected = max_order.unwrap_or(0) + 1;
        if payload.stage_order != expected {
            return Err(Error::BadRequest(format!(
                "Stage order must be {} for this position",
                expected
            )));
        }

        let stage = Stage {
            id: Uuid::new_v4(),
            position_id,
            name: payload.name,
            stage_order: payload.stage_order,
            duration_minutes: payload.duration_minutes,
        };
        sqlx::query(
            "INSERT INTO stages (id, position_id, name, stage_order, duration_minutes) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(stage.id)
        .bind(stage.position_id)
        .bind(&stage.name)
        .bind(stage.stage_order)
        .bind(stage.duration_minutes)
        .execute(&mut *tx)
        .await?;

        let mut interviewer_pool = payload.interviewer_pool;
        interviewer_pool.sort();
        interviewer_pool.dedup();
        for interviewer_id in &interviewer_pool {
            sqlx::query(
                "INSERT INTO stage_interviewers (stage_id, interviewer_id) VALUES (?, ?)",
            )
            .bind(stage.id)
            .bind(interviewer_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(StageWithPool {
            stage,
            interviewer_pool,
        })
    }

    pub async fn stages_for_position(&self, position_id: Uuid) -> Result<Vec<StageWithPool>> {
        let mut conn = self.pool.acquire().await?;
        ensure_position_exists(&mut conn, position_id).await?;
        stages_with_pools(&mut conn, position_id).await
    }
}

pub(crate) async fn ensure_position_exists(
    conn: &mut SqliteConnection,
    position_id: Uuid,
) -> Result<()> {
    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM positions WHERE id = ?")
        .bind(position_id)
        .fetch_optional(conn)
        .await?;
    if exists.is_none() {
        return Err(Error::NotFound(format!(
            "Position {} not found",
            position_id
        )));
    }
    Ok(())
}

pub(crate) async fn stages_with_pools(
    conn: &mut SqliteConnection,
    position_id: Uuid,
) -> Result<Vec<StageWithPool>> {
    let stages = sqlx::query_as::<_, Stage>(
        "SELECT id, position_id, name, stage_order, duration_minutes \
         FROM stages WHERE position_id = ? ORDER BY stage_order",
    )
    .bind(position_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut result = Vec::with_capacity(stages.len());
    for stage in stages {
        let mut interviewer_pool: Vec<Uuid> =
            sqlx::query_scalar("SELECT interviewer_id FROM stage_interviewers WHERE stage_id = ?")
                .bind(stage.id)
                .fetch_all(&mut *conn)
                .await?;
        interviewer_pool.sort();
        result.push(StageWithPool {
            stage,
            interviewer_pool,
        });
    }
    Ok(result)
}
