use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Todo {0} not found")]
    NotFound(i64),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Template error: {0}")]
    Template(String),
}

#[cfg(feature = "storage")]
impl From<sqlx::Error> for TodoError {
    fn from(err: sqlx::Error) -> Self {
        TodoError::Storage(err.to_string())
    }
}

impl From<tera::Error> for TodoError {
    fn from(err: tera::Error) -> Self {
        // tera keeps the useful part of the message in the source chain
        let mut msg = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            msg.push_str(": ");
            msg.push_str(&inner.to_string());
            source = inner.source();
        }
        TodoError::Template(msg)
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> axum::response::Response {
        match self {
            TodoError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            TodoError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg).into_response(),
            TodoError::Storage(_) | TodoError::Template(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}
