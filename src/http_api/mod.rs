use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use tracing::{error, info};

use crate::overlap::conflicting_pairs;
use crate::persistence::{PersistenceError, ScheduleStore, save_schedule};
use crate::{
    Category, ClockTime, DayStats, STATUS_IN_PROGRESS, Schedule, ScheduleError, Task, TaskId,
};

pub type SharedStore = Arc<dyn ScheduleStore + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    schedule: Arc<RwLock<Schedule>>,
    store: Option<SharedStore>,
}

impl AppState {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule: Arc::new(RwLock::new(schedule)),
            store: None,
        }
    }

    /// Every successful mutation is written through to `store`.
    pub fn with_store(schedule: Schedule, store: SharedStore) -> Self {
        Self {
            schedule: Arc::new(RwLock::new(schedule)),
            store: Some(store),
        }
    }

    fn schedule(&self) -> Arc<RwLock<Schedule>> {
        self.schedule.clone()
    }

    fn persist(&self, schedule: &Schedule) -> Result<(), ApiError> {
        if let Some(store) = &self.store {
            save_schedule(store.as_ref(), schedule)?;
        }
        Ok(())
    }

    /// Applies `edit` to a copy and swaps it in only once the store accepted
    /// it, so a failed write leaves the served schedule unchanged.
    fn commit<T>(
        &self,
        edit: impl FnOnce(&mut Schedule) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut guard = self.schedule.write();
        let mut next = guard.clone();
        let out = edit(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        match value {
            ScheduleError::TaskNotFound(_) => ApiError::NotFound(value.to_string()),
            ScheduleError::DuplicateTask(_) => ApiError::Conflict(value.to_string()),
            ScheduleError::Invalid(_) | ScheduleError::Repaired(_) => {
                ApiError::Invalid(value.to_string())
            }
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        error!(error = %value, "failed to persist schedule");
        ApiError::Internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

/// A task as sent by a client; the server owns ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub name: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub category_name: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl TaskPayload {
    fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            name: self.name.trim().to_string(),
            start_time: self.start_time,
            end_time: self.end_time,
            category_name: self.category_name.trim().to_string(),
            status: self
                .status
                .as_deref()
                .map(str::trim)
                .filter(|status| !status.is_empty())
                .unwrap_or(STATUS_IN_PROGRESS)
                .to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleView {
    tasks: Vec<Task>,
    categories: Vec<Category>,
    overlapping_ids: HashSet<TaskId>,
    conflict_count: usize,
}

impl ScheduleView {
    fn of(schedule: &Schedule) -> Self {
        let overlaps = schedule.overlaps();
        Self {
            tasks: schedule.tasks().to_vec(),
            categories: schedule.categories().to_vec(),
            overlapping_ids: overlaps.overlapping_ids,
            conflict_count: overlaps.conflict_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OverlapsView {
    overlapping_ids: HashSet<TaskId>,
    conflict_count: usize,
    pairs: Vec<[TaskId; 2]>,
}

#[derive(Debug, Default, Deserialize)]
struct ImportParams {
    #[serde(default)]
    strict: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schedule", get(get_schedule))
        .route("/markdown", get(get_markdown).put(put_markdown))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/categories", get(list_categories).put(replace_categories))
        .route("/overlaps", get(get_overlaps))
        .route("/stats", get(get_stats))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "daily-schedule HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_schedule(State(state): State<AppState>) -> Json<ScheduleView> {
    let schedule = state.schedule();
    let view = ScheduleView::of(&schedule.read());
    Json(view)
}

async fn get_markdown(State(state): State<AppState>) -> impl IntoResponse {
    let schedule = state.schedule();
    let markdown = schedule.read().markdown().to_string();
    (
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        markdown,
    )
}

async fn put_markdown(
    State(state): State<AppState>,
    Query(params): Query<ImportParams>,
    body: String,
) -> Result<Json<ScheduleView>, ApiError> {
    let view = state.commit(|schedule| {
        if params.strict {
            schedule.try_import_markdown(&body)?;
        } else {
            schedule.import_markdown(&body);
        }
        Ok(ScheduleView::of(schedule))
    })?;
    Ok(Json(view))
}

async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    let schedule = state.schedule();
    let tasks = schedule.read().tasks().to_vec();
    Json(tasks)
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let schedule = state.schedule();
    let found = schedule.read().find_task(&TaskId::new(&task_id)).cloned();
    found
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("task {task_id} not found")))
}

async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskPayload>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = payload.into_task(TaskId::generate());
    state.commit(|schedule| Ok(schedule.add_task(task.clone())?))?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<Task>, ApiError> {
    let task = payload.into_task(TaskId::new(task_id));
    state.commit(|schedule| Ok(schedule.update_task(task.clone())?))?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.commit(|schedule| {
        if schedule.delete_task(&TaskId::new(&task_id)) {
            Ok(())
        } else {
            Err(ApiError::not_found(format!("task {task_id} not found")))
        }
    })?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    let schedule = state.schedule();
    let categories = schedule.read().categories().to_vec();
    Json(categories)
}

async fn replace_categories(
    State(state): State<AppState>,
    Json(categories): Json<Vec<Category>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let saved = state.commit(|schedule| {
        schedule.set_categories(categories)?;
        Ok(schedule.categories().to_vec())
    })?;
    Ok(Json(saved))
}

async fn get_overlaps(State(state): State<AppState>) -> Json<OverlapsView> {
    let schedule = state.schedule();
    let guard = schedule.read();
    let stats = guard.overlaps();
    let pairs = conflicting_pairs(guard.tasks())
        .into_iter()
        .map(|(a, b)| [a.id.clone(), b.id.clone()])
        .collect();
    Json(OverlapsView {
        overlapping_ids: stats.overlapping_ids,
        conflict_count: stats.conflict_count,
        pairs,
    })
}

async fn get_stats(State(state): State<AppState>) -> Json<DayStats> {
    let schedule = state.schedule();
    let stats = schedule.read().day_stats();
    Json(stats)
}
