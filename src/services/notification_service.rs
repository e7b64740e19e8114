use crate::models::schedule::Schedule;
use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

/// Best-effort webhook sender. Delivery happens off the request path and
/// failures are logged, never surfaced: a lost notification must not
/// roll back the transaction that triggered it.
#[derive(Clone)]
pub struct NotificationService {
    client: Client,
    target_url: Option<String>,
}

impl NotificationService {
    pub fn new(target_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            target_url,
        }
    }

    fn send(&self, event_type: &'static str, payload: JsonValue) {
        let Some(url) = self.target_url.clone() else {
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            let body = json!({ "event": event_type, "payload": payload });
            match client.post(&url).json(&body).send().await {
                Ok(resp) if resp.status().is_success() => {}
                Ok(resp) => {
                    tracing::warn!(event = event_type, status = %resp.status(), "notification rejected by receiver")
                }
                Err(err) => {
                    tracing::warn!(event = event_type, error = %err, "notification delivery failed")
                }
            }
        });
    }

    pub fn schedule_created(&self, schedule: &Schedule, interviewer_ids: &[Uuid]) {
        self.send(
            "schedule.created",
            json!({
                "schedule_id": schedule.id,
                "candidate_id": schedule.candidate_id,
                "stage_id": schedule.stage_id,
                "start_at": schedule.start_at,
                "end_at": schedule.end_at,
                "interviewer_ids": interviewer_ids,
            }),
        );
    }

    pub fn candidate_onboarded(&self, candidate_id: Uuid, request_id: Uuid) {
        self.send(
            "onboard.approved",
            json!({
                "candidate_id": candidate_id,
                "request_id": request_id,
            }),
        );
    }
}
