//! In-process stand-in for the preflight API, just enough to exercise the clients.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use preflight_client::{ApiClient, ClientConfig};
use serde_json::{Value, json};

pub const TOKEN: &str = "test-token";

#[derive(Debug, Default)]
pub struct StubState {
    pub forms: HashMap<String, Value>,
    pub runs: HashMap<String, Run>,
    pub sessions: HashMap<String, Session>,
    /// Returned once by the next request instead of the normal response.
    pub next_error: Option<(StatusCode, Value, Option<&'static str>)>,
    pub seen_auth: Vec<Option<String>>,
    next_id: u64,
}

#[derive(Debug)]
pub struct Run {
    pub form_version: String,
    pub status: &'static str,
    pub last_page: Option<String>,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub answers: Vec<Value>,
}

#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub status: &'static str,
    pub current_round: u32,
    pub max_rounds: u32,
    pub started_at: String,
    pub turns: Vec<Value>,
}

impl StubState {
    fn new_id(&mut self) -> String {
        self.next_id += 1;
        format!("00000000-0000-4000-8000-{:012}", self.next_id)
    }
}

pub type Shared = Arc<Mutex<StubState>>;

pub fn readiness_form() -> Value {
    json!({
        "id": "ai-readiness",
        "title": "AI Readiness",
        "pages": [
            {"id": "intro", "title": "Intro", "blocks": [
                {"type": "text", "name": "role", "required": true},
                {"type": "select", "name": "size", "options": ["small", 50]}
            ]},
            {"id": "tools", "title": "Tools", "blocks": [
                {"type": "checkbox", "name": "used", "options": ["git", 3]}
            ]}
        ],
        "navigation": {"style": "pager", "autosave": true},
        "meta": {"version": "1.0.0"}
    })
}

/// Start the stub on an ephemeral port and return a client pointed at it.
pub async fn spawn() -> (ApiClient, Shared) {
    let state: Shared = Arc::default();
    state
        .lock()
        .unwrap()
        .forms
        .insert("ai-readiness".into(), readiness_form());

    let app = Router::new()
        .route("/forms/:form_name", get(get_form))
        .route("/runs", post(create_run))
        .route("/runs/:run_id", get(get_run))
        .route("/runs/:run_id/answers", patch(save_answers))
        .route("/runs/:run_id/complete", post(complete_run))
        .route("/runs/:run_id/coach/start", post(coach_start))
        .route("/runs/:run_id/coach/message", post(coach_message))
        .route("/runs/:run_id/coach/history", get(coach_history))
        .route("/runs/:run_id/coach/end", post(coach_end))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig::new(&format!("http://{addr}"))
        .unwrap()
        .with_token(TOKEN);
    (ApiClient::new(config).unwrap(), state)
}

fn error(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn not_found(what: &str) -> Response {
    error(
        StatusCode::NOT_FOUND,
        json!({"detail": {
            "type": "https://preflight.example/errors/not-found",
            "title": "Not Found",
            "status": 404,
            "detail": what
        }}),
    )
}

/// Record the auth header and hand out a queued error, if any.
fn intercept(state: &mut StubState, headers: &HeaderMap) -> Option<Response> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.seen_auth.push(auth);

    let (status, body, retry_after) = state.next_error.take()?;
    let mut response = error(status, body);
    if let Some(retry_after) = retry_after {
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from_static(retry_after));
    }
    Some(response)
}

async fn get_form(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(form_name): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(response) = intercept(&mut state, &headers) {
        return response;
    }

    match state.forms.get(&form_name) {
        Some(form) if query.get("version").is_none_or(|v| *v == form["meta"]["version"]) => {
            Json(form.clone()).into_response()
        }
        _ => not_found(&format!("Form '{form_name}' not found")),
    }
}

async fn create_run(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(response) = intercept(&mut state, &headers) {
        return response;
    }

    let form_name = body["form_name"].as_str().unwrap_or_default();
    let Some(form) = state.forms.get(form_name) else {
        return not_found(&format!("Form '{form_name}' not found"));
    };
    let form_version = form["meta"]["version"].as_str().unwrap_or_default().to_string();

    let run_id = state.new_id();
    let started_at = Utc::now().to_rfc3339();
    state.runs.insert(
        run_id.clone(),
        Run {
            form_version: form_version.clone(),
            status: "in_progress",
            last_page: None,
            started_at: started_at.clone(),
            completed_at: None,
            answers: Vec::new(),
        },
    );

    (
        StatusCode::CREATED,
        Json(json!({"run_id": run_id, "form_version": form_version, "started_at": started_at})),
    )
        .into_response()
}

async fn get_run(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(run_id): Path<String>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(response) = intercept(&mut state, &headers) {
        return response;
    }

    let Some(run) = state.runs.get(&run_id) else {
        return not_found(&format!("Run '{run_id}' not found"));
    };
    Json(json!({
        "run_id": run_id,
        "status": run.status,
        "last_page": run.last_page,
        "started_at": run.started_at,
        "completed_at": run.completed_at,
        "answers": run.answers,
    }))
    .into_response()
}

async fn save_answers(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(run_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(response) = intercept(&mut state, &headers) {
        return response;
    }

    let Some(run) = state.runs.get_mut(&run_id) else {
        return not_found(&format!("Run '{run_id}' not found"));
    };
    if run.status == "completed" {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"detail": "Cannot save answers to a completed run"}),
        );
    }

    let page_id = body["page_id"].as_str().unwrap_or_default().to_string();
    let saved_at = Utc::now().to_rfc3339();
    if let Some(answers) = body["answers"].as_object() {
        for (field_name, value) in answers {
            run.answers
                .retain(|a| !(a["page_id"] == page_id.as_str() && a["field_name"] == field_name.as_str()));
            run.answers.push(json!({
                "page_id": page_id,
                "field_name": field_name,
                "value": value,
                "saved_at": saved_at,
            }));
        }
    }
    run.last_page = Some(page_id);

    Json(json!({"saved_at": saved_at})).into_response()
}

async fn complete_run(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(run_id): Path<String>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(response) = intercept(&mut state, &headers) {
        return response;
    }

    let Some(run) = state.runs.get_mut(&run_id) else {
        return not_found(&format!("Run '{run_id}' not found"));
    };
    if run.status == "completed" {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({"detail": "Run has already been completed"}),
        );
    }
    let completed_at = Utc::now().to_rfc3339();
    run.status = "completed";
    run.completed_at = Some(completed_at.clone());

    Json(json!({"status": "completed", "completed_at": completed_at})).into_response()
}

fn session_json(run_id: &str, session: &Session) -> Value {
    json!({
        "id": session.id,
        "run_id": run_id,
        "pipeline_id": "00000000-0000-4000-8000-ffffffffffff",
        "status": session.status,
        "current_round": session.current_round,
        "max_rounds": session.max_rounds,
        "started_at": session.started_at,
        "completed_at": null,
        "last_activity_at": Utc::now().to_rfc3339(),
    })
}

fn turn(state: &mut StubState, session_id: &str, number: usize, role: &str, content: &str) -> Value {
    let model_used = (role == "assistant").then_some("stub-model");
    json!({
        "id": state.new_id(),
        "session_id": session_id,
        "turn_number": number,
        "role": role,
        "content": content,
        "model_used": model_used,
        "created_at": Utc::now().to_rfc3339(),
    })
}

async fn coach_start(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(run_id): Path<String>,
    Json(_body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(response) = intercept(&mut state, &headers) {
        return response;
    }
    if !state.runs.contains_key(&run_id) {
        return error(StatusCode::NOT_FOUND, json!({"detail": format!("Run {run_id} not found")}));
    }
    if state.sessions.contains_key(&run_id) {
        return error(
            StatusCode::CONFLICT,
            json!({"detail": "Coaching session already exists for this run"}),
        );
    }

    let session_id = state.new_id();
    let greeting = turn(&mut state, &session_id, 1, "assistant", "What would you like to improve first?");
    let session = Session {
        id: session_id,
        status: "active",
        current_round: 0,
        max_rounds: 2,
        started_at: Utc::now().to_rfc3339(),
        turns: vec![greeting.clone()],
    };
    let body = json!({"session": session_json(&run_id, &session), "initial_message": greeting});
    state.sessions.insert(run_id, session);

    (StatusCode::CREATED, Json(body)).into_response()
}

async fn coach_message(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(run_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut guard = state.lock().unwrap();
    let state = &mut *guard;
    if let Some(response) = intercept(state, &headers) {
        return response;
    }

    let Some(session) = state.sessions.get(&run_id) else {
        return error(
            StatusCode::NOT_FOUND,
            json!({"detail": format!("No coaching session found for run {run_id}")}),
        );
    };
    if session.status != "active" {
        return error(
            StatusCode::BAD_REQUEST,
            json!({"detail": format!("Coaching session is {}", session.status)}),
        );
    }
    if session.current_round >= session.max_rounds {
        return error(
            StatusCode::BAD_REQUEST,
            json!({"detail": format!("Maximum rounds ({}) reached", session.max_rounds)}),
        );
    }

    let session_id = session.id.clone();
    let next = session.turns.len() + 1;
    let message = body["message"].as_str().unwrap_or_default().to_string();
    let user_turn = turn(state, &session_id, next, "user", &message);
    let assistant_turn = turn(state, &session_id, next + 1, "assistant", &format!("You said: {message}"));

    let Some(session) = state.sessions.get_mut(&run_id) else {
        return not_found("session vanished");
    };
    session.current_round += 1;
    session.turns.push(user_turn.clone());
    session.turns.push(assistant_turn.clone());
    if session.current_round >= session.max_rounds {
        session.status = "completed";
    }

    Json(json!({
        "user_turn": user_turn,
        "assistant_turn": assistant_turn,
        "session_status": session.status,
        "current_round": session.current_round,
        "max_rounds": session.max_rounds,
        "remaining_rounds": session.max_rounds - session.current_round,
    }))
    .into_response()
}

async fn coach_history(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(run_id): Path<String>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(response) = intercept(&mut state, &headers) {
        return response;
    }

    match state.sessions.get(&run_id) {
        Some(session) => Json(json!({
            "session": session_json(&run_id, session),
            "turns": session.turns,
        }))
        .into_response(),
        None => error(
            StatusCode::NOT_FOUND,
            json!({"detail": format!("No coaching session found for run {run_id}")}),
        ),
    }
}

async fn coach_end(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(run_id): Path<String>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(response) = intercept(&mut state, &headers) {
        return response;
    }

    match state.sessions.get_mut(&run_id) {
        Some(session) if session.status == "completed" => {
            error(StatusCode::BAD_REQUEST, json!({"detail": "Session already completed"}))
        }
        Some(session) => {
            session.status = "completed";
            Json(json!({"status": "completed", "message": "Coaching session ended"})).into_response()
        }
        None => error(
            StatusCode::NOT_FOUND,
            json!({"detail": format!("No coaching session found for run {run_id}")}),
        ),
    }
}
