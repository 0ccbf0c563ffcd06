use axum::{
    Form, Json, Router,
    extract::{Path, State, rejection::FormRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;

use crate::adapters::views::Views;
use crate::core::{Todo, TodoError, TodoForm, TodoList};
use crate::storage::Storage;

#[cfg(feature = "tracing")]
use tracing::{debug, info, instrument};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpConfig {
    pub addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:5001".to_string(),
        }
    }
}

pub struct AppState<S: Storage + Send + Sync + 'static> {
    todos: TodoList<S>,
    views: Arc<Views>,
}

impl<S: Storage + Send + Sync + 'static> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            todos: self.todos.clone(),
            views: self.views.clone(),
        }
    }
}

/// The todo web application: routes, handlers and the listener loop.
pub struct TodoApp<S: Storage + Send + Sync + 'static> {
    state: AppState<S>,
    config: HttpConfig,
}

impl<S: Storage + Send + Sync + 'static> TodoApp<S> {
    pub fn new(storage: Arc<S>, config: HttpConfig) -> Result<Self, TodoError> {
        let state = AppState {
            todos: TodoList::new(storage),
            views: Arc::new(Views::new()?),
        };
        Ok(Self { state, config })
    }

    pub fn router(&self) -> Router {
        let router = Router::new()
            .route("/", get(Self::index))
            .route("/add", post(Self::add))
            .route("/complete/{id}", get(Self::complete))
            .route("/delete/{id}", get(Self::delete))
            .route("/edit/{id}", get(Self::edit_form).post(Self::edit))
            .route("/api/todos", get(Self::api_todos))
            .route("/health", get(health_route));

        #[cfg(feature = "tracing")]
        let router = router.layer(tower_http::trace::TraceLayer::new_for_http().make_span_with(
            |request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                tracing::info_span!("http_request", method = ?request.method(), uri)
            },
        ));

        router.with_state(self.state.clone())
    }

    pub async fn serve(&self) -> anyhow::Result<()> {
        use anyhow::Context;

        let listener = tokio::net::TcpListener::bind(&self.config.addr)
            .await
            .with_context(|| format!("failed to listen on {}", self.config.addr))?;
        #[cfg(feature = "tracing")]
        info!(addr = %self.config.addr, "Todo server started");
        axum::serve(listener, self.router())
            .await
            .context("received error from running server")?;
        Ok(())
    }

    async fn index(State(state): State<AppState<S>>) -> Result<Html<String>, TodoError> {
        let todos = state.todos.list_all().await?;
        Ok(Html(state.views.index(&todos)?))
    }

    #[cfg_attr(feature = "tracing", instrument(skip(state, form)))]
    async fn add(
        State(state): State<AppState<S>>,
        form: Result<Form<TodoForm>, FormRejection>,
    ) -> Result<Response, TodoError> {
        let form = form_or_default(form);
        match state.todos.insert(form.title, form.description).await {
            Ok(_) => {}
            // a missing title is dropped without telling the user
            Err(TodoError::Validation(_reason)) => {
                #[cfg(feature = "tracing")]
                debug!(reason = %_reason, "Ignoring add without a title");
            }
            Err(e) => return Err(e),
        }
        Ok(back_to_list())
    }

    async fn complete(State(state): State<AppState<S>>, Path(id): Path<i64>) -> Result<Response, TodoError> {
        state.todos.toggle_completed(id).await?;
        Ok(back_to_list())
    }

    async fn delete(State(state): State<AppState<S>>, Path(id): Path<i64>) -> Result<Response, TodoError> {
        state.todos.delete(id).await?;
        Ok(back_to_list())
    }

    async fn edit_form(State(state): State<AppState<S>>, Path(id): Path<i64>) -> Result<Html<String>, TodoError> {
        let todo = state.todos.get(id).await?;
        Ok(Html(state.views.edit(&todo)?))
    }

    async fn edit(
        State(state): State<AppState<S>>,
        Path(id): Path<i64>,
        form: Result<Form<TodoForm>, FormRejection>,
    ) -> Result<Response, TodoError> {
        let form = form_or_default(form);
        state.todos.update_fields(id, form.title, form.description).await?;
        Ok(back_to_list())
    }

    async fn api_todos(State(state): State<AppState<S>>) -> Result<Json<Vec<Todo>>, TodoError> {
        Ok(Json(state.todos.list_all_unordered().await?))
    }
}

// An unreadable body counts as an empty form, so the add and edit rules
// (silent redirect, 404 on unknown id) still decide the response.
fn form_or_default(form: Result<Form<TodoForm>, FormRejection>) -> TodoForm {
    match form {
        Ok(Form(form)) => form,
        Err(_rejection) => {
            #[cfg(feature = "tracing")]
            debug!(error = %_rejection, "Treating unreadable form body as empty");
            TodoForm::default()
        }
    }
}

/// `302 Found` back to the list. axum's `Redirect::to` answers 303.
fn back_to_list() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

async fn health_route() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
