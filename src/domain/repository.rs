use async_trait::async_trait;
use super::todo::{NewTodo, Todo, TodoId};

/// Storage for todo records, keyed by integer id.
///
/// Absence is reported through `Option`/`bool`, never as an error. Errors are
/// reserved for backend failures.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    /// All stored records, ascending by id.
    async fn get_all(&self) -> anyhow::Result<Vec<Todo>>;
    async fn find_by_id(&self, id: TodoId) -> anyhow::Result<Option<Todo>>;
    async fn save(&self, input: NewTodo) -> anyhow::Result<Todo>;
    /// Returns `None` without writing when no record has `todo.id`.
    async fn update(&self, todo: Todo) -> anyhow::Result<Option<Todo>>;
    async fn delete(&self, id: TodoId) -> anyhow::Result<bool>;
}
