use std::{collections::BTreeMap, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    repository::TodoRepository,
    todo::{NewTodo, Todo, TodoId},
};

#[derive(Default)]
struct Inner {
    items: BTreeMap<TodoId, Todo>,
    last_id: i64,
}

/// Process-local store. Writers hold the write guard for the whole
/// operation, so id assignment cannot race.
#[derive(Clone, Default)]
pub struct InMemoryTodoRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self { Self::default() }

    pub async fn len(&self) -> usize { self.inner.read().await.items.len() }

    pub async fn is_empty(&self) -> bool { self.len().await == 0 }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn init(&self) -> Result<()> { Ok(()) }

    async fn get_all(&self) -> Result<Vec<Todo>> {
        Ok(self.inner.read().await.items.values().cloned().collect())
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        Ok(self.inner.read().await.items.get(&id).cloned())
    }

    async fn save(&self, input: NewTodo) -> Result<Todo> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let todo = Todo { id: TodoId(inner.last_id), title: input.title, completed: input.completed, order: input.order };
        inner.items.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update(&self, todo: Todo) -> Result<Option<Todo>> {
        let mut inner = self.inner.write().await;
        let Some(slot) = inner.items.get_mut(&todo.id) else { return Ok(None) };
        *slot = todo.clone();
        Ok(Some(todo))
    }

    async fn delete(&self, id: TodoId) -> Result<bool> {
        Ok(self.inner.write().await.items.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_todo(title: &str) -> NewTodo {
        NewTodo { title: title.into(), completed: false, order: 0 }
    }

    #[tokio::test]
    async fn ids_start_at_one_and_are_not_reused() {
        let repo = InMemoryTodoRepository::new();
        let a = repo.save(new_todo("a")).await.unwrap();
        let b = repo.save(new_todo("b")).await.unwrap();
        assert_eq!((a.id, b.id), (TodoId(1), TodoId(2)));

        assert!(repo.delete(b.id).await.unwrap());
        let c = repo.save(new_todo("c")).await.unwrap();
        assert_eq!(c.id, TodoId(3));
    }

    #[tokio::test]
    async fn get_all_is_ordered_by_id() {
        let repo = InMemoryTodoRepository::new();
        for title in ["x", "y", "z"] { repo.save(new_todo(title)).await.unwrap(); }
        let titles: Vec<_> = repo.get_all().await.unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["x", "y", "z"]);
    }

    #[tokio::test]
    async fn update_of_absent_id_does_not_insert() {
        let repo = InMemoryTodoRepository::new();
        let ghost = Todo { id: TodoId(7), title: "ghost".into(), completed: false, order: 0 };
        assert_eq!(repo.update(ghost).await.unwrap(), None);
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn concurrent_saves_get_distinct_ids() {
        let repo = InMemoryTodoRepository::new();
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.save(new_todo(&format!("t{i}"))).await.unwrap().id })
            })
            .collect();
        let mut ids = Vec::new();
        for h in handles { ids.push(h.await.unwrap()); }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 32);
        assert_eq!(repo.len().await, 32);
    }
}
