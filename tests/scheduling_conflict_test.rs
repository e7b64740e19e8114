use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveTime;
use pipeline_backend::services::suggestion_service::DayWindow;
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

async fn test_app() -> Router {
    let pool = pipeline_backend::database::pool::connect("sqlite::memory:")
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    let state = pipeline_backend::AppState::new(
        pool,
        DayWindow {
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        },
        None,
    );
    pipeline_backend::routes::router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

struct Setup {
    position_id: String,
    stage1_id: String,
    stage2_id: String,
    candidate_a: String,
    candidate_b: String,
}

/// One position, two stages sharing a sole interviewer, two candidates.
async fn seed(app: &Router, interviewer: Uuid) -> Setup {
    let (status, position) = send(
        app,
        "POST",
        "/api/catalog/positions",
        Some(json!({ "title": "Data Analyst", "department": "Analytics" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let position_id = position["id"].as_str().unwrap().to_string();

    let (status, stage1) = send(
        app,
        "POST",
        &format!("/api/catalog/positions/{}/stages", position_id),
        Some(json!({
            "name": "Screening",
            "stage_order": 1,
            "duration_minutes": 30,
            "interviewer_pool": [interviewer],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, stage2) = send(
        app,
        "POST",
        &format!("/api/catalog/positions/{}/stages", position_id),
        Some(json!({
            "name": "Final",
            "stage_order": 2,
            "duration_minutes": 30,
            "interviewer_pool": [interviewer],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let mut candidates = Vec::new();
    for (name, email) in [("Avery Cole", "avery@example.com"), ("Blair Munn", "blair@example.com")] {
        let (status, candidate) = send(
            app,
            "POST",
            "/api/candidates",
            Some(json!({
                "full_name": name,
                "email": email,
                "score": 70,
                "position_id": position_id,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        candidates.push(candidate["id"].as_str().unwrap().to_string());
    }

    Setup {
        position_id,
        stage1_id: stage1["id"].as_str().unwrap().to_string(),
        stage2_id: stage2["id"].as_str().unwrap().to_string(),
        candidate_a: candidates.remove(0),
        candidate_b: candidates.remove(0),
    }
}

#[tokio::test]
async fn contested_slot_goes_to_whoever_confirms_first() {
    let app = test_app().await;
    let interviewer = Uuid::new_v4();
    let setup = seed(&app, interviewer).await;

    // Both candidates are shown the same contested slots: the engine is
    // advisory and does not arbitrate.
    let (status, suggestions) = send(
        &app,
        "POST",
        &format!("/api/positions/{}/suggestions", setup.position_id),
        Some(json!({ "days": ["2026-03-02"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let candidates = suggestions["candidates"].as_array().unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(
        candidates[0]["proposals"][0]["start_at"],
        candidates[1]["proposals"][0]["start_at"]
    );

    // Confirmation arbitrates: first commit wins, second collides.
    let slot = json!({
        "start_at": "2026-03-02T08:00:00Z",
        "end_at": "2026-03-02T08:30:00Z",
    });
    let (status, _) = send(
        &app,
        "POST",
        "/api/schedules",
        Some(json!({
            "candidate_id": setup.candidate_a,
            "stage_id": setup.stage1_id,
            "start_at": slot["start_at"],
            "end_at": slot["end_at"],
            "interviewer_ids": [interviewer],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/schedules",
        Some(json!({
            "candidate_id": setup.candidate_b,
            "stage_id": setup.stage1_id,
            "start_at": slot["start_at"],
            "end_at": slot["end_at"],
            "interviewer_ids": [interviewer],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("overlapping"));

    // Half-open windows: back-to-back booking is fine.
    let (status, _) = send(
        &app,
        "POST",
        "/api/schedules",
        Some(json!({
            "candidate_id": setup.candidate_b,
            "stage_id": setup.stage1_id,
            "start_at": "2026-03-02T08:30:00Z",
            "end_at": "2026-03-02T09:00:00Z",
            "interviewer_ids": [interviewer],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // A fresh suggestion run sees both live windows as busy and both
    // candidates as already staged for stage 1.
    let (status, suggestions) = send(
        &app,
        "POST",
        &format!("/api/positions/{}/suggestions", setup.position_id),
        Some(json!({ "days": ["2026-03-02"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(suggestions["candidates"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn failed_candidate_is_shut_out_of_later_stages() {
    let app = test_app().await;
    let interviewer = Uuid::new_v4();
    let setup = seed(&app, interviewer).await;

    let (status, schedule) = send(
        &app,
        "POST",
        "/api/schedules",
        Some(json!({
            "candidate_id": setup.candidate_a,
            "stage_id": setup.stage1_id,
            "start_at": "2026-03-02T08:00:00Z",
            "end_at": "2026-03-02T08:30:00Z",
            "interviewer_ids": [interviewer],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let schedule_id = schedule["id"].as_str().unwrap().to_string();

    let (status, outcome) = send(
        &app,
        "POST",
        &format!("/api/schedules/{}/feedback", schedule_id),
        Some(json!({ "feedback": "Not a fit for the role" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let outcome_id = outcome["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/outcomes/{}/decision", outcome_id),
        Some(json!({ "decision": "fail" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, candidate) = send(
        &app,
        "GET",
        &format!("/api/candidates/{}", setup.candidate_a),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(candidate["status"], "failed");

    // No stage 2 for a failed candidate.
    let (status, _) = send(
        &app,
        "POST",
        "/api/schedules",
        Some(json!({
            "candidate_id": setup.candidate_a,
            "stage_id": setup.stage2_id,
            "start_at": "2026-03-03T08:00:00Z",
            "end_at": "2026-03-03T08:30:00Z",
            "interviewer_ids": [interviewer],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);

    // And the suggestion engine no longer considers them.
    let (status, suggestions) = send(
        &app,
        "POST",
        &format!("/api/positions/{}/suggestions", setup.position_id),
        Some(json!({ "days": ["2026-03-03"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = suggestions["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["candidate_id"].as_str().unwrap())
        .collect();
    assert!(!ids.contains(&setup.candidate_a.as_str()));
}

#[tokio::test]
async fn lifecycle_guards_reject_invalid_transitions() {
    let app = test_app().await;
    let interviewer = Uuid::new_v4();
    let setup = seed(&app, interviewer).await;

    // Malformed windows and empty interviewer sets never reach storage.
    let (status, _) = send(
        &app,
        "POST",
        "/api/schedules",
        Some(json!({
            "candidate_id": setup.candidate_a,
            "stage_id": setup.stage1_id,
            "start_at": "2026-03-02T09:00:00Z",
            "end_at": "2026-03-02T08:30:00Z",
            "interviewer_ids": [interviewer],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/schedules",
        Some(json!({
            "candidate_id": setup.candidate_a,
            "stage_id": setup.stage1_id,
            "start_at": "2026-03-02T08:00:00Z",
            "end_at": "2026-03-02T08:30:00Z",
            "interviewer_ids": [],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/candidates/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, schedule) = send(
        &app,
        "POST",
        "/api/schedules",
        Some(json!({
            "candidate_id": setup.candidate_a,
            "stage_id": setup.stage1_id,
            "start_at": "2026-03-02T08:00:00Z",
            "end_at": "2026-03-02T08:30:00Z",
            "interviewer_ids": [interviewer],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let schedule_id = schedule["id"].as_str().unwrap().to_string();

    // Cancel is terminal but idempotent; a canceled round takes no
    // feedback.
    let (status, canceled) = send(
        &app,
        "POST",
        &format!("/api/schedules/{}/cancel", schedule_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(canceled["status"], "canceled");
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/schedules/{}/cancel", schedule_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/schedules/{}/feedback", schedule_id),
        Some(json!({ "feedback": "after cancel" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Canceling frees the round; a rebooking lands after the canceled
    // one in history, same stage ordered by start time.
    let (status, _) = send(
        &app,
        "POST",
        "/api/schedules",
        Some(json!({
            "candidate_id": setup.candidate_a,
            "stage_id": setup.stage1_id,
            "start_at": "2026-03-02T10:00:00Z",
            "end_at": "2026-03-02T10:30:00Z",
            "interviewer_ids": [interviewer],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, history) = send(
        &app,
        "GET",
        &format!("/api/candidates/{}/schedules", setup.candidate_a),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rounds = history.as_array().unwrap();
    assert_eq!(rounds.len(), 2);
    assert_eq!(rounds[0]["start_at"], "2026-03-02T08:00:00Z");
    assert_eq!(rounds[0]["status"], "canceled");
    assert_eq!(rounds[1]["start_at"], "2026-03-02T10:00:00Z");
    assert_eq!(rounds[1]["status"], "scheduled");

    // A completed round cannot be canceled.
    let (status, schedule) = send(
        &app,
        "POST",
        "/api/schedules",
        Some(json!({
            "candidate_id": setup.candidate_b,
            "stage_id": setup.stage1_id,
            "start_at": "2026-03-02T09:00:00Z",
            "end_at": "2026-03-02T09:30:00Z",
            "interviewer_ids": [interviewer],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let schedule_id = schedule["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/schedules/{}/feedback", schedule_id),
        Some(json!({ "feedback": "went well" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/schedules/{}/cancel", schedule_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Explicit HR rejection is terminal and not repeatable.
    let (status, rejected) = send(
        &app,
        "POST",
        &format!("/api/candidates/{}/reject", setup.candidate_a),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], "rejected");
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/candidates/{}/reject", setup.candidate_a),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
