use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::core::TodoError;

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "storage", derive(sqlx::FromRow))]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: NaiveDateTime, // UTC, serialized without an offset
}

/// A validated todo that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

impl NewTodo {
    /// Builds a todo stamped with the current UTC time.
    ///
    /// Fails with [`TodoError::Validation`] when the title is missing or empty.
    pub fn new(title: Option<String>, description: Option<String>) -> Result<Self, TodoError> {
        let title = validate_title(title)?;
        Ok(Self {
            title,
            description,
            created_at: now_utc(),
        })
    }
}

/// Body of the add and edit forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoForm {
    pub title: Option<String>,
    pub description: Option<String>,
}

pub(crate) fn validate_title(title: Option<String>) -> Result<String, TodoError> {
    match title {
        Some(title) if !title.is_empty() => Ok(title),
        _ => Err(TodoError::Validation("title is required".to_string())),
    }
}

// Microsecond precision keeps the stored value and the JSON rendering identical.
pub(crate) fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}
