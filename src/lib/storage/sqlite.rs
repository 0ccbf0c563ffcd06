use async_trait::async_trait;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{Sqlite, SqlitePool, SqlitePoolOptions};

use crate::core::{NewTodo, Todo, TodoError};
use crate::storage::Storage;

#[cfg(feature = "tracing")]
use tracing::info;

const COLUMNS: &str = "id, title, description, completed, created_at";

pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Opens (creating if needed) the database at `url` and makes sure the
    /// `todos` table exists.
    pub async fn new(url: &str, max_connections: u32) -> Result<Self, TodoError> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            #[cfg(feature = "tracing")]
            info!(url = %url, "Creating database");
            Sqlite::create_database(url).await?;
        }
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(url)
            .await?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database, used by tests.
    pub async fn new_memory() -> Result<Self, TodoError> {
        // every pooled connection would get its own memory database,
        // so pin the pool to a single connection that never expires
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, TodoError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(200) NOT NULL,
                description TEXT,
                completed BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn insert(&self, todo: &NewTodo) -> Result<Todo, TodoError> {
        let sql = format!(
            "INSERT INTO todos (title, description, completed, created_at) VALUES (?, ?, 0, ?) RETURNING {COLUMNS}"
        );
        let todo = sqlx::query_as::<_, Todo>(&sql)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(todo)
    }

    async fn get(&self, id: i64) -> Result<Todo, TodoError> {
        let sql = format!("SELECT {COLUMNS} FROM todos WHERE id = ?");
        sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(TodoError::NotFound(id))
    }

    async fn update_fields(&self, id: i64, title: &str, description: Option<&str>) -> Result<Todo, TodoError> {
        let sql = format!("UPDATE todos SET title = ?, description = ? WHERE id = ? RETURNING {COLUMNS}");
        sqlx::query_as::<_, Todo>(&sql)
            .bind(title)
            .bind(description)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(TodoError::NotFound(id))
    }

    async fn toggle_completed(&self, id: i64) -> Result<Todo, TodoError> {
        // single statement, so concurrent toggles on one row never lose a flip
        let sql = format!("UPDATE todos SET completed = NOT completed WHERE id = ? RETURNING {COLUMNS}");
        sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(TodoError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<(), TodoError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound(id));
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Todo>, TodoError> {
        let sql = format!("SELECT {COLUMNS} FROM todos ORDER BY created_at DESC, id DESC");
        Ok(sqlx::query_as::<_, Todo>(&sql).fetch_all(&self.pool).await?)
    }

    async fn list_all_unordered(&self) -> Result<Vec<Todo>, TodoError> {
        let sql = format!("SELECT {COLUMNS} FROM todos");
        Ok(sqlx::query_as::<_, Todo>(&sql).fetch_all(&self.pool).await?)
    }
}
