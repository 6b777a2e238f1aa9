use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use http::StatusCode;
use tracing::{debug, warn};

use crate::{
    application::{show_service::ShowService, todo_service::TodoService},
    domain::todo::{Todo, TodoId, TodoPayload},
    http::types::ApiError,
};

#[derive(Clone)]
pub struct AppState<S: TodoService> {
    pub service: S,
    pub show: Arc<dyn ShowService>,
}

pub fn router<S: TodoService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todos", get(list_todos::<S>).post(create_todo::<S>))
        .route("/todos/:id", get(get_todo::<S>).patch(update_todo::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

/// JSON body that may be absent, `null`, or malformed. Anything but a
/// decodable object is a bad request.
type Body = Result<Json<Option<TodoPayload>>, JsonRejection>;

async fn list_todos<S: TodoService>(State(state): State<AppState<S>>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.service.list().await?))
}

async fn get_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let todo = state.service.get(id).await?;
    debug!(todo = %state.show.show(&todo), "fetched");
    Ok(Json(todo))
}

async fn create_todo<S: TodoService>(State(state): State<AppState<S>>, body: Body) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let payload = require_body(body)?;
    let todo = state.service.create(payload).await?;
    debug!(todo = %state.show.show(&todo), "created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>, body: Body) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let payload = require_body(body)?;
    let todo = state.service.update(id, payload).await?;
    debug!(todo = %state.show.show(&todo), "updated");
    Ok(Json(todo))
}

async fn delete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete(id).await?;
    Ok(StatusCode::OK)
}

fn require_body(body: Body) -> Result<TodoPayload, ApiError> {
    match body {
        Ok(Json(Some(payload))) => Ok(payload),
        Ok(Json(None)) => {
            warn!("rejected null body");
            Err(ApiError::BadRequest("request body must not be null".into()))
        }
        Err(rejection) => {
            warn!(%rejection, "rejected body");
            Err(ApiError::BadRequest(rejection.body_text()))
        }
    }
}

fn parse_id(s: &str) -> Result<TodoId, ApiError> { s.parse::<i64>().map(TodoId).map_err(|_| ApiError::BadRequest("invalid id".into())) }
