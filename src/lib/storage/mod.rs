pub mod memory;
#[cfg(feature = "storage")]
pub mod sqlite;

use async_trait::async_trait;
use crate::core::{NewTodo, Todo, TodoError};

#[async_trait]
pub trait Storage: Send + Sync {
    async fn insert(&self, todo: &NewTodo) -> Result<Todo, TodoError>;
    async fn get(&self, id: i64) -> Result<Todo, TodoError>;
    async fn update_fields(&self, id: i64, title: &str, description: Option<&str>) -> Result<Todo, TodoError>;
    async fn toggle_completed(&self, id: i64) -> Result<Todo, TodoError>;
    async fn delete(&self, id: i64) -> Result<(), TodoError>;
    /// Newest first, ties broken by descending id.
    async fn list_all(&self) -> Result<Vec<Todo>, TodoError>;
    /// Whatever order the backend hands rows back in.
    async fn list_all_unordered(&self) -> Result<Vec<Todo>, TodoError>;
}
