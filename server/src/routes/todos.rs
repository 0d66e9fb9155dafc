//! Todo collection routes.

use axum::{
    extract::{ws::WebSocketUpgrade, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use todo_engine::{AddTodoArgs, AddTodoResponse, ClearAllResponse, Todo, UpdateTodoArgs};

use crate::error::Result;
use crate::handlers::{
    handle_add, handle_clear, handle_delete, handle_list, handle_live_connection, handle_toggle,
    handle_update,
};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/todos",
            get(list_handler).post(add_handler).delete(clear_handler),
        )
        .route("/todos/live", get(live_handler))
        .route("/todos/{id}", patch(update_handler).delete(delete_handler))
        .route("/todos/{id}/toggle", post(toggle_handler))
}

/// GET /todos - The whole collection, newest first.
async fn list_handler(State(state): State<AppState>) -> Result<Json<Vec<Todo>>> {
    Ok(Json(handle_list(&state).await?))
}

/// POST /todos - Add a todo.
async fn add_handler(
    State(state): State<AppState>,
    Json(args): Json<AddTodoArgs>,
) -> Result<(StatusCode, Json<AddTodoResponse>)> {
    let response = handle_add(&state, args).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// DELETE /todos - Remove every todo.
async fn clear_handler(State(state): State<AppState>) -> Result<Json<ClearAllResponse>> {
    Ok(Json(handle_clear(&state).await?))
}

/// POST /todos/{id}/toggle
async fn toggle_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    handle_toggle(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /todos/{id} - Replace the text.
async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(args): Json<UpdateTodoArgs>,
) -> Result<StatusCode> {
    handle_update(&state, &id, args).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /todos/{id}
async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    handle_delete(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /todos/live - Upgrade to a live query.
async fn live_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_live_connection(socket, state))
}
