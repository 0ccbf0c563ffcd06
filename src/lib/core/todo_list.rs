use std::sync::Arc;

use crate::core::{NewTodo, Todo, TodoError, todo::validate_title};
use crate::storage::Storage;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument};

/// The todo operations the HTTP layer works against.
///
/// Owns no state of its own; everything goes through the injected storage.
pub struct TodoList<S: Storage + Send + Sync + 'static> {
    storage: Arc<S>,
}

impl<S: Storage + Send + Sync + 'static> Clone for TodoList<S> {
    fn clone(&self) -> Self {
        Self { storage: self.storage.clone() }
    }
}

impl<S: Storage + Send + Sync + 'static> TodoList<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self, description)))]
    pub async fn insert(&self, title: Option<String>, description: Option<String>) -> Result<Todo, TodoError> {
        let new_todo = NewTodo::new(title, description)?;
        let todo = self.storage.insert(&new_todo).await?;
        #[cfg(feature = "tracing")]
        debug!(id = todo.id, "Todo created");
        Ok(todo)
    }

    pub async fn get(&self, id: i64) -> Result<Todo, TodoError> {
        self.storage.get(id).await
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self, title, description)))]
    pub async fn update_fields(
        &self,
        id: i64,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Todo, TodoError> {
        let title = match validate_title(title) {
            Ok(title) => title,
            Err(e) => {
                // an unknown id is reported before a bad title
                self.storage.get(id).await?;
                return Err(e);
            }
        };
        let todo = self.storage.update_fields(id, &title, description.as_deref()).await?;
        #[cfg(feature = "tracing")]
        debug!(id, "Todo updated");
        Ok(todo)
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    pub async fn toggle_completed(&self, id: i64) -> Result<Todo, TodoError> {
        let todo = self.storage.toggle_completed(id).await?;
        #[cfg(feature = "tracing")]
        debug!(id, completed = todo.completed, "Todo toggled");
        Ok(todo)
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    pub async fn delete(&self, id: i64) -> Result<(), TodoError> {
        self.storage.delete(id).await?;
        #[cfg(feature = "tracing")]
        debug!(id, "Todo deleted");
        Ok(())
    }

    /// Newest first.
    pub async fn list_all(&self) -> Result<Vec<Todo>, TodoError> {
        self.storage.list_all().await
    }

    pub async fn list_all_unordered(&self) -> Result<Vec<Todo>, TodoError> {
        self.storage.list_all_unordered().await
    }
}
