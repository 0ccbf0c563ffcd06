use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::{NewTodo, Todo, TodoError};

use super::Storage;

/// Keeps todos in process memory. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    todos: BTreeMap<i64, Todo>,
    last_id: i64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn insert(&self, todo: &NewTodo) -> Result<Todo, TodoError> {
        let mut inner = self.inner.write().await;
        // ids are never reused, same as AUTOINCREMENT
        inner.last_id += 1;
        let todo = Todo {
            id: inner.last_id,
            title: todo.title.clone(),
            description: todo.description.clone(),
            completed: false,
            created_at: todo.created_at,
        };
        inner.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn get(&self, id: i64) -> Result<Todo, TodoError> {
        let inner = self.inner.read().await;
        inner.todos.get(&id).cloned().ok_or(TodoError::NotFound(id))
    }

    async fn update_fields(&self, id: i64, title: &str, description: Option<&str>) -> Result<Todo, TodoError> {
        let mut inner = self.inner.write().await;
        let todo = inner.todos.get_mut(&id).ok_or(TodoError::NotFound(id))?;
        todo.title = title.to_string();
        todo.description = description.map(str::to_string);
        Ok(todo.clone())
    }

    async fn toggle_completed(&self, id: i64) -> Result<Todo, TodoError> {
        let mut inner = self.inner.write().await;
        let todo = inner.todos.get_mut(&id).ok_or(TodoError::NotFound(id))?;
        todo.completed = !todo.completed;
        Ok(todo.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), TodoError> {
        let mut inner = self.inner.write().await;
        inner.todos.remove(&id).map(|_| ()).ok_or(TodoError::NotFound(id))
    }

    async fn list_all(&self) -> Result<Vec<Todo>, TodoError> {
        let mut todos = self.list_all_unordered().await?;
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn list_all_unordered(&self) -> Result<Vec<Todo>, TodoError> {
        let inner = self.inner.read().await;
        Ok(inner.todos.values().cloned().collect())
    }
}
