//! PostgreSQL-backed todo collection.

use super::TodoRepository;
use crate::error::Result;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::sync::Arc;
use todo_engine::{Clock, SystemClock, Todo, TodoId};

/// A stored todo row from the database.
#[derive(Debug)]
struct StoredTodo {
    id: String,
    text: String,
    is_completed: bool,
    creation_time: i64,
}

impl<'r> sqlx::FromRow<'r, PgRow> for StoredTodo {
    fn from_row(row: &'r PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(StoredTodo {
            id: row.try_get("id")?,
            text: row.try_get("text")?,
            is_completed: row.try_get("is_completed")?,
            creation_time: row.try_get("creation_time")?,
        })
    }
}

impl From<StoredTodo> for Todo {
    fn from(row: StoredTodo) -> Self {
        Todo {
            id: row.id,
            text: row.text,
            is_completed: row.is_completed,
            creation_time: row.creation_time,
        }
    }
}

/// Todo collection stored in the `todos` table.
#[derive(Debug, Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            clock: Arc::new(SystemClock),
        }
    }

    /// Connect to `database_url` and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(sqlx::Error::from)?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query_as::<_, StoredTodo>(
            r#"
            SELECT id, text, is_completed, creation_time
            FROM todos
            ORDER BY creation_time DESC, seq DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn insert(&self, text: &str) -> Result<TodoId> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO todos (id, text, is_completed, creation_time)
            VALUES ($1, $2, FALSE, $3)
            "#,
        )
        .bind(&id)
        .bind(text)
        .bind(self.clock.now_millis())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn toggle(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(r#"UPDATE todos SET is_completed = NOT is_completed WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_text(&self, id: &str, text: &str) -> Result<bool> {
        let result = sqlx::query(r#"UPDATE todos SET text = $2 WHERE id = $1"#)
            .bind(id)
            .bind(text)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM todos WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<usize> {
        let result = sqlx::query(r#"DELETE FROM todos"#)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() as usize)
    }
}
