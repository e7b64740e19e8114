use crate::dto::suggestion_dto::{
    CandidateSuggestions, ConfirmedPick, SlotProposal, SuggestSlotsPayload, SuggestionResponse,
};
use crate::error::Result;
use crate::models::candidate::Candidate;
use crate::models::stage::Stage;
use crate::services::catalog_service::{ensure_position_exists, stages_with_pools};
use crate::services::schedule_service::highest_passed_order;
use crate::utils::time;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Working-hours window slots are carved from, applied to every
/// candidate day. Interpreted in UTC.
#[derive(Debug, Clone, Copy)]
pub struct DayWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// One candidate needing a slot for their next stage.
#[derive(Debug, Clone)]
pub struct CandidateSlotRequest {
    pub candidate_id: Uuid,
    pub full_name: String,
    pub from_stage_order: Option<i32>,
    pub target_stage: Stage,
    /// Interviewer pool of the target stage, sorted for determinism.
    pub pool: Vec<Uuid>,
}

/// An interviewer's committed window from a live schedule.
#[derive(Debug, Clone, FromRow)]
pub struct BusyWindow {
    pub interviewer_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

/// Consistent read of everything the planner needs, taken once at the
/// start of a run. Results may go stale against concurrent writes;
/// schedule confirmation re-validates, so that is acceptable.
#[derive(Debug, Clone, Default)]
pub struct SuggestionSnapshot {
    pub requests: Vec<CandidateSlotRequest>,
    pub busy: Vec<BusyWindow>,
}

/// Pure slot planner. Never touches storage and is deterministic over
/// its inputs: identical snapshot and days yield identical proposals.
///
/// Per candidate, each supplied day's window is partitioned into
/// back-to-back slots of the target stage's duration; a slot is proposed
/// with whichever pool members are free during it, both against the
/// snapshot's live schedules and against the run's confirmed picks.
/// Proposals are ordered earliest first, ties broken by smaller
/// interviewer set.
pub fn plan_suggestions(
    snapshot: &SuggestionSnapshot,
    days: &[NaiveDate],
    window: DayWindow,
    confirmed: &[ConfirmedPick],
) -> Vec<CandidateSuggestions> {
    let days: BTreeSet<NaiveDate> = days.iter().copied().collect();

    let mut result = Vec::with_capacity(snapshot.requests.len());
    for request in &snapshot.requests {
        // A confirmed pick stages the candidate; no further proposals.
        if confirmed
            .iter()
            .any(|pick| pick.candidate_id == request.candidate_id)
        {
            continue;
        }

        let duration = Duration::minutes(request.target_stage.duration_minutes as i64);
        let mut proposals = Vec::new();
        for day in &days {
            let day_start = day.and_time(window.start).and_utc();
            let day_end = day.and_time(window.end).and_utc();

            let mut slot_start = day_start;
            while slot_start + duration <= day_end {
                let slot_end = slot_start + duration;
                let free: Vec<Uuid> = request
                    .pool
                    .iter()
                    .copied()
                    .filter(|interviewer_id| {
                        interviewer_free(snapshot, confirmed, *interviewer_id, slot_start, slot_end)
                    })
                    .collect();
                if !free.is_empty() {
                    proposals.push(SlotProposal {
                        date: *day,
                        start_at: slot_start,
                        end_at: slot_end,
                        interviewer_ids: free,
                    });
                }
                slot_start = slot_end;
            }
        }
        proposals.sort_by_key(|p| (p.start_at, p.interviewer_ids.len()));

        result.push(CandidateSuggestions {
            candidate_id: request.candidate_id,
            full_name: request.full_name.clone(),
            from_stage_order: request.from_stage_order,
            target_stage_id: request.target_stage.id,
            target_stage_order: request.target_stage.stage_order,
            target_stage_name: request.target_stage.name.clone(),
            proposals,
        });
    }
    result
}

fn interviewer_free(
    snapshot: &SuggestionSnapshot,
    confirmed: &[ConfirmedPick],
    interviewer_id: Uuid,
    slot_start: DateTime<Utc>,
    slot_end: DateTime<Utc>,
) -> bool {
    let busy = snapshot.busy.iter().any(|w| {
        w.interviewer_id == interviewer_id
            && time::overlaps(slot_start, slot_end, w.start_at, w.end_at)
    });
    if busy {
        return false;
    }
    !confirmed.iter().any(|pick| {
        pick.interviewer_ids.contains(&interviewer_id)
            && time::overlaps(slot_start, slot_end, pick.start_at, pick.end_at)
    })
}

#[derive(Clone)]
pub struct SuggestionService {
    pool: SqlitePool,
    window: DayWindow,
}

impl SuggestionService {
    pub fn new(pool: SqlitePool, window: DayWindow) -> Self {
        Self { pool, window }
    }

    /// Advisory proposals for every non-terminal candidate at a position
    /// whose next stage is not yet booked. Writes nothing; a human picks
    /// a proposal and confirms it through schedule creation.
    pub async fn suggest_slots(
        &self,
        position_id: Uuid,
        payload: SuggestSlotsPayload,
    ) -> Result<SuggestionResponse> {
        let mut conn = self.pool.acquire().await?;
        ensure_position_exists(&mut conn, position_id).await?;
        let stages = stages_with_pools(&mut conn, position_id).await?;

        let candidates = sqlx::query_as::<_, Candidate>(
            "SELECT id, full_name, email, score, status, position_id, created_at, updated_at \
             FROM candidates WHERE position_id = ? AND status IN ('pending', 'accepted') \
             ORDER BY created_at, id",
        )
        .bind(position_id)
        .fetch_all(&mut *conn)
        .await?;

        let mut requests = Vec::new();
        for candidate in candidates {
            let passed = highest_passed_order(&mut conn, candidate.id).await?;
            let Some(target) = stages
                .iter()
                .find(|s| s.stage.stage_order == passed + 1)
            else {
                // Final stage already passed; onboarding takes over.
                continue;
            };

            let live: Option<i32> = sqlx::query_scalar(
                "SELECT 1 FROM schedules \
                 WHERE candidate_id = ? AND stage_id = ? AND status = 'scheduled'",
            )
            .bind(candidate.id)
            .bind(target.stage.id)
            .fetch_optional(&mut *conn)
            .await?;
            if live.is_some() {
                continue;
            }

            requests.push(CandidateSlotRequest {
                candidate_id: candidate.id,
                full_name: candidate.full_name,
                from_stage_order: (passed > 0).then_some(passed),
                target_stage: target.stage.clone(),
                pool: target.interviewer_pool.clone(),
            });
        }

        let busy = sqlx::query_as::<_, BusyWindow>(
            "SELECT si.interviewer_id, s.start_at, s.end_at \
             FROM schedules s JOIN schedule_interviewers si ON si.schedule_id = s.id \
             WHERE s.status = 'scheduled'",
        )
        .fetch_all(&mut *conn)
        .await?;

        let snapshot = SuggestionSnapshot { requests, busy };
        let candidates = plan_suggestions(&snapshot, &payload.days, self.window, &payload.confirmed);
        Ok(SuggestionResponse {
            position_id,
            candidates,
        })
    }
}
