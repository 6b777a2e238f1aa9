use std::{str::FromStr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::domain::{
    repository::TodoRepository,
    todo::{NewTodo, Todo, TodoId},
};

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    /// Opens `database_url`, creating the database file when it is missing.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url {database_url}"))?
            .create_if_missing(true);
        // Every connection to an in-memory database sees its own copy, so keep exactly one alive.
        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new().max_connections(1).min_connections(1).idle_timeout(None::<Duration>).max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options
            .connect_with(connect_options)
            .await
            .with_context(|| format!("opening {database_url}"))?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                completed INTEGER NOT NULL,
                sort_order INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query("SELECT id, title, completed, sort_order FROM todos ORDER BY id ASC")
            .fetch_all(&*self.pool)
            .await?;
        rows.iter().map(row_to_todo).collect()
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query("SELECT id, title, completed, sort_order FROM todos WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await?;
        row.as_ref().map(row_to_todo).transpose()
    }

    async fn save(&self, input: NewTodo) -> Result<Todo> {
        let result = sqlx::query("INSERT INTO todos (title, completed, sort_order) VALUES (?1, ?2, ?3)")
            .bind(&input.title)
            .bind(input.completed)
            .bind(input.order)
            .execute(&*self.pool)
            .await?;
        Ok(Todo { id: TodoId(result.last_insert_rowid()), title: input.title, completed: input.completed, order: input.order })
    }

    async fn update(&self, todo: Todo) -> Result<Option<Todo>> {
        let result = sqlx::query("UPDATE todos SET title = ?2, completed = ?3, sort_order = ?4 WHERE id = ?1")
            .bind(todo.id.0)
            .bind(&todo.title)
            .bind(todo.completed)
            .bind(todo.order)
            .execute(&*self.pool)
            .await?;
        if result.rows_affected() == 0 { return Ok(None) }
        Ok(Some(todo))
    }

    async fn delete(&self, id: TodoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_todo(row: &SqliteRow) -> Result<Todo> {
    Ok(Todo {
        id: TodoId(row.try_get("id")?),
        title: row.try_get("title")?,
        completed: row.try_get("completed")?,
        order: row.try_get("sort_order")?,
    })
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_creates_missing_database_file() {
        let path = std::env::temp_dir().join(format!("todo-api-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let repo = SqliteTodoRepository::connect(&format!("sqlite://{}", path.display())).await.unwrap();
        repo.init().await.unwrap();
        let saved = repo.save(NewTodo { title: "title".into(), completed: true, order: 2 }).await.unwrap();
        assert_eq!(repo.find_by_id(saved.id).await.unwrap(), Some(saved));
        assert!(path.exists());

        drop(repo);
        let _ = std::fs::remove_file(&path);
    }
}
