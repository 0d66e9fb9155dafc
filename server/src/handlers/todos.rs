//! Queries and mutations of the todo collection.
//!
//! Every successful mutation is followed by a [`publish`], so open live
//! queries always end on the committed collection.

use todo_engine::{
    clean_text, AddTodoArgs, AddTodoResponse, ClearAllResponse, ServerMessage, Todo,
    UpdateTodoArgs,
};

use crate::error::{AppError, Result};
use crate::AppState;

/// Fetch the whole collection, newest first.
pub async fn handle_list(state: &AppState) -> Result<Vec<Todo>> {
    state.repo.list().await
}

/// Insert a todo with the trimmed text.
pub async fn handle_add(state: &AppState, args: AddTodoArgs) -> Result<AddTodoResponse> {
    let text = require_text(&args.text)?;
    let id = state.repo.insert(text).await?;
    tracing::info!(todo_id = %id, "Todo added");

    publish(state).await;
    Ok(AddTodoResponse { id })
}

pub async fn handle_toggle(state: &AppState, id: &str) -> Result<()> {
    if !state.repo.toggle(id).await? {
        return Err(AppError::todo_not_found(id));
    }
    tracing::debug!(todo_id = %id, "Todo toggled");

    publish(state).await;
    Ok(())
}

pub async fn handle_update(state: &AppState, id: &str, args: UpdateTodoArgs) -> Result<()> {
    let text = require_text(&args.text)?;
    if !state.repo.update_text(id, text).await? {
        return Err(AppError::todo_not_found(id));
    }
    tracing::debug!(todo_id = %id, "Todo updated");

    publish(state).await;
    Ok(())
}

pub async fn handle_delete(state: &AppState, id: &str) -> Result<()> {
    if !state.repo.delete(id).await? {
        return Err(AppError::todo_not_found(id));
    }
    tracing::debug!(todo_id = %id, "Todo deleted");

    publish(state).await;
    Ok(())
}

pub async fn handle_clear(state: &AppState) -> Result<ClearAllResponse> {
    let deleted_count = state.repo.clear().await?;
    tracing::info!(deleted = deleted_count, "Todos cleared");

    publish(state).await;
    Ok(ClearAllResponse { deleted_count })
}

/// Push the current collection to every live query.
///
/// The mutation is already committed, so a failed read is only logged.
pub async fn publish(state: &AppState) {
    let _guard = state.publish_lock.lock().await;

    match state.repo.list().await {
        Ok(todos) => {
            let sent = state
                .subscriptions
                .broadcast(&ServerMessage::Todos { todos });
            tracing::debug!(sent_to = sent, "Published todos");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read todos for live queries");
        }
    }
}

fn require_text(text: &str) -> Result<&str> {
    clean_text(text).ok_or_else(|| AppError::BadRequest("text must not be empty".to_string()))
}
