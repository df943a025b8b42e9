//! In-process stand-in for the job server, used by the client tests

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use jobdeck_core::domain::schedule::{Schedule, ScheduleId};
use jobdeck_core::dto::schedule::{ErrorBody, ScheduleRequest};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub(crate) struct StubState {
    running: Mutex<bool>,
    last_error: Mutex<Option<String>>,
    schedules: Mutex<Vec<Schedule>>,
    next_id: AtomicU64,
}

type Shared = State<Arc<StubState>>;

/// Starts the stub on an ephemeral port and returns its base URL
pub(crate) async fn spawn_stub() -> (String, Arc<StubState>) {
    let state = Arc::new(StubState::default());

    let router = Router::new()
        .route("/api/jobstatus", get(job_status))
        .route("/api/jobresult", get(job_result))
        .route("/api/runjob", post(run_job))
        .route("/api/stopjob", post(stop_job))
        .route("/api/version", get(version))
        .route("/api/schedules", get(list_schedules).post(create_schedule))
        .route("/api/schedules/{id}", put(update_schedule).delete(delete_schedule))
        .route("/api/schedules/{id}/result", get(schedule_report))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });

    (format!("http://{}", addr), state)
}

fn reject(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn parse_future(raw: &str) -> Result<DateTime<Utc>, Response> {
    let time = DateTime::parse_from_rfc3339(raw)
        .map_err(|_| reject(StatusCode::BAD_REQUEST, "invalid time"))?
        .with_timezone(&Utc);

    if time <= Utc::now() {
        return Err(reject(StatusCode::BAD_REQUEST, "time must be in the future"));
    }

    Ok(time)
}

async fn job_status(State(state): Shared) -> Json<serde_json::Value> {
    let running = *state.running.lock().unwrap();
    let activity = if running { "Running step 1" } else { "Idle" };

    Json(json!({ "running": running, "activity": activity, "step": 0 }))
}

async fn job_result(State(state): Shared) -> Json<serde_json::Value> {
    let running = *state.running.lock().unwrap();
    let error = state.last_error.lock().unwrap().clone().unwrap_or_default();

    Json(json!({ "Running": running, "output": "", "RunType": "manual", "Error": error }))
}

async fn run_job(State(state): Shared) -> Response {
    let mut running = state.running.lock().unwrap();
    let accepted = !*running;
    *running = true;
    *state.last_error.lock().unwrap() = None;

    (StatusCode::ACCEPTED, Json(json!({ "Running": accepted, "RunType": "manual" }))).into_response()
}

async fn stop_job(State(state): Shared) -> Response {
    let mut running = state.running.lock().unwrap();

    if !*running {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "stopped": false, "error": "no job running" })),
        )
            .into_response();
    }

    *running = false;
    *state.last_error.lock().unwrap() = Some("context canceled".to_string());

    (StatusCode::ACCEPTED, Json(json!({ "stopped": true }))).into_response()
}

async fn version() -> Json<serde_json::Value> {
    Json(json!({ "version": "1.4.0" }))
}

async fn list_schedules(State(state): Shared) -> Json<serde_json::Value> {
    let schedules = state.schedules.lock().unwrap().clone();
    Json(json!({ "schedules": schedules }))
}

async fn create_schedule(State(state): Shared, Json(req): Json<ScheduleRequest>) -> Response {
    let time = match parse_future(&req.time) {
        Ok(time) => time,
        Err(rejection) => return rejection,
    };

    let n = state.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let schedule = Schedule {
        id: ScheduleId::new(format!("sched-{}", n)),
        time,
        is_running: false,
        is_past: false,
        has_error: false,
    };
    state.schedules.lock().unwrap().push(schedule.clone());

    (StatusCode::CREATED, Json(schedule)).into_response()
}

async fn update_schedule(
    State(state): Shared,
    Path(id): Path<String>,
    Json(req): Json<ScheduleRequest>,
) -> Response {
    let time = match parse_future(&req.time) {
        Ok(time) => time,
        Err(rejection) => return rejection,
    };

    let mut schedules = state.schedules.lock().unwrap();
    match schedules.iter_mut().find(|s| s.id.as_str() == id) {
        Some(schedule) => {
            schedule.time = time;
            (StatusCode::CREATED, Json(schedule.clone())).into_response()
        }
        None => (StatusCode::NOT_FOUND, "not found\n").into_response(),
    }
}

async fn delete_schedule(State(state): Shared, Path(id): Path<String>) -> StatusCode {
    state.schedules.lock().unwrap().retain(|s| s.id.as_str() != id);
    StatusCode::NO_CONTENT
}

async fn schedule_report(Path(_id): Path<String>) -> Json<serde_json::Value> {
    Json(json!({ "output": "", "RunType": "manual" }))
}
