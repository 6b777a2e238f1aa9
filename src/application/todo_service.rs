use async_trait::async_trait;
use tracing::{debug, info};

use super::error::{TodoError, TodoResult};
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{validate_title, Todo, TodoId, TodoPayload};

/// Use cases behind the `/todos` resource.
///
/// Mutations of an existing record look it up first; a missing id ends in
/// `TodoError::NotFound` before anything is written.
#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn list(&self) -> TodoResult<Vec<Todo>>;
    async fn get(&self, id: TodoId) -> TodoResult<Todo>;
    async fn create(&self, input: TodoPayload) -> TodoResult<Todo>;
    async fn update(&self, id: TodoId, input: TodoPayload) -> TodoResult<Todo>;
    async fn delete(&self, id: TodoId) -> TodoResult<()>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }

    async fn existing(&self, id: TodoId) -> TodoResult<Todo> {
        self.repo.find_by_id(id).await?.ok_or(TodoError::NotFound(id))
    }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn list(&self) -> TodoResult<Vec<Todo>> {
        let todos = self.repo.get_all().await?;
        debug!(count = todos.len(), "listed todos");
        Ok(todos)
    }

    async fn get(&self, id: TodoId) -> TodoResult<Todo> { self.existing(id).await }

    async fn create(&self, input: TodoPayload) -> TodoResult<Todo> {
        validate_title(&input.title).map_err(TodoError::Validation)?;
        let todo = self.repo.save(input.into_new()).await?;
        info!(id = %todo.id, "todo created");
        Ok(todo)
    }

    async fn update(&self, id: TodoId, input: TodoPayload) -> TodoResult<Todo> {
        validate_title(&input.title).map_err(TodoError::Validation)?;
        let mut todo = self.existing(id).await?;
        input.apply_to(&mut todo);
        // Deleted between lookup and write.
        let updated = self.repo.update(todo).await?.ok_or(TodoError::NotFound(id))?;
        info!(id = %id, "todo updated");
        Ok(updated)
    }

    async fn delete(&self, id: TodoId) -> TodoResult<()> {
        self.existing(id).await?;
        if !self.repo.delete(id).await? { return Err(TodoError::NotFound(id)); }
        info!(id = %id, "todo deleted");
        Ok(())
    }
}
