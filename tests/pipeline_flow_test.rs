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

#[tokio::test]
async fn candidate_flows_from_intake_to_onboarded() {
    let app = test_app().await;

    let interviewer_a = Uuid::new_v4();
    let interviewer_b = Uuid::new_v4();

    let (status, position) = send(
        &app,
        "POST",
        "/api/catalog/positions",
        Some(json!({ "title": "Backend Engineer", "department": "Engineering" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let position_id = position["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/catalog/positions/{}/stages", position_id),
        Some(json!({
            "name": "Screening",
            "stage_order": 1,
            "duration_minutes": 30,
            "interviewer_pool": [interviewer_a],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/catalog/positions/{}/stages", position_id),
        Some(json!({
            "name": "Technical",
            "stage_order": 2,
            "duration_minutes": 60,
            "interviewer_pool": [interviewer_a, interviewer_b],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, candidate) = send(
        &app,
        "POST",
        "/api/candidates",
        Some(json!({
            "full_name": "Dana Reyes",
            "email": "dana@example.com",
            "score": 87,
            "position_id": position_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(candidate["status"], "pending");
    let candidate_id = candidate["id"].as_str().unwrap().to_string();

    // Listing annotates the current stage; nothing booked means stage 1.
    let (status, listed) = send(
        &app,
        "GET",
        &format!("/api/positions/{}/candidates", position_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["current_stage_order"], 1);
    assert_eq!(listed[0]["current_stage_name"], "Screening");

    // Advisory proposals for the first stage.
    let (status, suggestions) = send(
        &app,
        "POST",
        &format!("/api/positions/{}/suggestions", position_id),
        Some(json!({ "days": ["2026-03-02"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entry = &suggestions["candidates"][0];
    assert_eq!(entry["target_stage_order"], 1);
    assert!(entry["from_stage_order"].is_null());
    let proposal = &entry["proposals"][0];
    assert_eq!(proposal["start_at"], "2026-03-02T08:00:00Z");
    let stage1_id = entry["target_stage_id"].as_str().unwrap().to_string();

    // Booking the later stage before stage 1 is passed is gated.
    let (status, stages) = send(
        &app,
        "GET",
        &format!("/api/catalog/positions/{}/stages", position_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stage2_id = stages[1]["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        "POST",
        "/api/schedules",
        Some(json!({
            "candidate_id": candidate_id,
            "stage_id": stage2_id,
            "start_at": "2026-03-02T10:00:00Z",
            "end_at": "2026-03-02T11:00:00Z",
            "interviewer_ids": [interviewer_a],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);

    // Confirm the proposed stage-1 slot.
    let (status, schedule) = send(
        &app,
        "POST",
        "/api/schedules",
        Some(json!({
            "candidate_id": candidate_id,
            "stage_id": stage1_id,
            "start_at": proposal["start_at"],
            "end_at": proposal["end_at"],
            "interviewer_ids": proposal["interviewer_ids"],
            "notes": "initial screen",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(schedule["status"], "scheduled");
    let schedule_id = schedule["id"].as_str().unwrap().to_string();

    // A second live round for the same stage is refused.
    let (status, _) = send(
        &app,
        "POST",
        "/api/schedules",
        Some(json!({
            "candidate_id": candidate_id,
            "stage_id": stage1_id,
            "start_at": "2026-03-02T09:00:00Z",
            "end_at": "2026-03-02T09:30:00Z",
            "interviewer_ids": [interviewer_a],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Feedback completes the round; the decision starts pending.
    let (status, outcome) = send(
        &app,
        "POST",
        &format!("/api/schedules/{}/feedback", schedule_id),
        Some(json!({ "feedback": "Strong fundamentals" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(outcome["decision"], "pending");
    let outcome_id = outcome["id"].as_str().unwrap().to_string();

    let (status, history) = send(
        &app,
        "GET",
        &format!("/api/candidates/{}/schedules", candidate_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["status"], "completed");

    // Exactly one feedback record per schedule.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/schedules/{}/feedback", schedule_id),
        Some(json!({ "feedback": "duplicate" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, outcome) = send(
        &app,
        "POST",
        &format!("/api/outcomes/{}/decision", outcome_id),
        Some(json!({ "decision": "pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["decision"], "pass");

    // The decision is one-way.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/outcomes/{}/decision", outcome_id),
        Some(json!({ "decision": "fail" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Feedback text stays editable after the decision.
    let (status, outcome) = send(
        &app,
        "PATCH",
        &format!("/api/outcomes/{}/feedback", outcome_id),
        Some(json!({ "feedback": "Strong fundamentals, quick communicator" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["feedback"], "Strong fundamentals, quick communicator");
    assert!(!outcome["edited_at"].is_null());

    // No offer before the final stage is passed.
    let (status, _) = send(
        &app,
        "POST",
        "/api/onboard-requests",
        Some(json!({
            "candidate_id": candidate_id,
            "salary": 9500000,
            "salary_type": "yearly",
            "start_date": "2026-04-01",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);

    // Next suggestion run targets stage 2.
    let (status, suggestions) = send(
        &app,
        "POST",
        &format!("/api/positions/{}/suggestions", position_id),
        Some(json!({ "days": ["2026-03-03"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entry = &suggestions["candidates"][0];
    assert_eq!(entry["target_stage_order"], 2);
    assert_eq!(entry["from_stage_order"], 1);
    let proposal = entry["proposals"][0].clone();

    let (status, schedule) = send(
        &app,
        "POST",
        "/api/schedules",
        Some(json!({
            "candidate_id": candidate_id,
            "stage_id": entry["target_stage_id"],
            "start_at": proposal["start_at"],
            "end_at": proposal["end_at"],
            "interviewer_ids": proposal["interviewer_ids"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let schedule_id = schedule["id"].as_str().unwrap().to_string();

    // History now holds both rounds, ordered by stage ordinal.
    let (status, history) = send(
        &app,
        "GET",
        &format!("/api/candidates/{}/schedules", candidate_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rounds = history.as_array().unwrap();
    assert_eq!(rounds.len(), 2);
    assert_eq!(rounds[0]["stage_order"], 1);
    assert_eq!(rounds[0]["status"], "completed");
    assert_eq!(rounds[1]["stage_order"], 2);
    assert_eq!(rounds[1]["status"], "scheduled");
    assert_eq!(rounds[1]["id"], schedule_id.as_str());

    let (status, outcome) = send(
        &app,
        "POST",
        &format!("/api/schedules/{}/feedback", schedule_id),
        Some(json!({ "feedback": "Great system design round" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let outcome_id = outcome["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/outcomes/{}/decision", outcome_id),
        Some(json!({ "decision": "pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Final stage passed: the offer can open now.
    let (status, onboard) = send(
        &app,
        "POST",
        "/api/onboard-requests",
        Some(json!({
            "candidate_id": candidate_id,
            "salary": 9500000,
            "salary_type": "yearly",
            "start_date": "2026-04-01",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(onboard["status"], "pending");
    let request_id = onboard["id"].as_str().unwrap().to_string();

    // Only one pending offer per candidate.
    let (status, _) = send(
        &app,
        "POST",
        "/api/onboard-requests",
        Some(json!({
            "candidate_id": candidate_id,
            "salary": 9000000,
            "salary_type": "yearly",
            "start_date": "2026-04-15",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);

    // Renegotiation is allowed while pending.
    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/api/onboard-requests/{}", request_id),
        Some(json!({
            "salary": 9800000,
            "salary_type": "yearly",
            "start_date": "2026-04-15",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["salary"], 9800000);

    let (status, approved) = send(
        &app,
        "POST",
        &format!("/api/onboard-requests/{}/status", request_id),
        Some(json!({ "status": "approved", "note": "Offer signed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["history"][0]["prev_status"], "pending");
    assert_eq!(approved["history"][0]["new_status"], "approved");
    assert_eq!(approved["history"][0]["note"], "Offer signed");

    let (status, candidate) = send(
        &app,
        "GET",
        &format!("/api/candidates/{}", candidate_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(candidate["status"], "onboarded");

    // Terminal request: offer fields frozen, no second transition.
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/onboard-requests/{}", request_id),
        Some(json!({
            "salary": 1,
            "salary_type": "hourly",
            "start_date": "2026-05-01",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/onboard-requests/{}/status", request_id),
        Some(json!({ "status": "rejected" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
