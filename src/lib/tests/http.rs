use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::adapters::{HttpConfig, TodoApp};
use crate::storage::Storage;
use crate::storage::memory::MemoryStorage;

fn app_with<S: Storage + Send + Sync + 'static>(storage: S) -> Router {
    TodoApp::new(Arc::new(storage), HttpConfig::default())
        .expect("templates compile")
        .router()
}

fn app() -> Router {
    app_with(MemoryStorage::new())
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("router is infallible")
}

async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_form(app: &Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn api_todos(app: &Router) -> Vec<Value> {
    let response = get(app, "/api/todos").await;
    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
    value.as_array().cloned().unwrap()
}

fn assert_redirects_home(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn test_index_renders_html() {
    let app = app();
    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let html = body_text(response).await;
    assert!(html.contains("<h1>Todo Application</h1>"));
    assert!(html.contains(r#"id="addButton""#));
    assert!(html.contains(r#"class="empty-state""#));
}

#[tokio::test]
async fn test_add_then_list_shows_item() {
    let app = app();
    let response = post_form(&app, "/add", "title=Buy+milk&description=").await;
    assert_redirects_home(&response);

    let html = body_text(get(&app, "/").await).await;
    assert!(html.contains(r#"<div class="todo-title">Buy milk</div>"#));
    assert!(!html.contains(r#"class="empty-state""#));
}

#[tokio::test]
async fn test_add_without_title_is_silently_ignored() {
    let app = app();
    for body in ["", "title=", "description=no+title"] {
        let response = post_form(&app, "/add", body).await;
        assert_redirects_home(&response);
    }
    assert!(api_todos(&app).await.is_empty());
}

#[tokio::test]
async fn test_add_with_whitespace_title_is_stored() {
    let app = app();
    assert_redirects_home(&post_form(&app, "/add", "title=%20%20").await);
    let todos = api_todos(&app).await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["title"], "  ");
}

#[tokio::test]
async fn test_post_without_content_type_keeps_route_semantics() {
    let app = app();
    let bare_post = |uri: &str| Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap();

    assert_redirects_home(&send(&app, bare_post("/add")).await);
    assert!(api_todos(&app).await.is_empty());

    assert_eq!(send(&app, bare_post("/edit/999")).await.status(), StatusCode::NOT_FOUND);

    post_form(&app, "/add", "title=Existing").await;
    assert_eq!(
        send(&app, bare_post("/edit/1")).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(api_todos(&app).await[0]["title"], "Existing");
}

#[tokio::test]
async fn test_complete_toggles_back_and_forth() {
    let app = app();
    post_form(&app, "/add", "title=Walk+the+dog").await;

    assert_redirects_home(&get(&app, "/complete/1").await);
    let html = body_text(get(&app, "/").await).await;
    assert!(html.contains(r#"class="todo-item completed" data-id="1""#));

    assert_redirects_home(&get(&app, "/complete/1").await);
    let html = body_text(get(&app, "/").await).await;
    assert!(html.contains(r#"class="todo-item" data-id="1""#));
}

#[tokio::test]
async fn test_unknown_ids_are_404() {
    let app = app();
    assert_eq!(get(&app, "/delete/999").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/complete/999").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/edit/999").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        post_form(&app, "/edit/999", "title=x").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_delete_removes_item() {
    let app = app();
    post_form(&app, "/add", "title=Temporary").await;
    assert_redirects_home(&get(&app, "/delete/1").await);
    assert!(api_todos(&app).await.is_empty());
    assert_eq!(get(&app, "/delete/1").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_todos_empty_store() {
    let app = app();
    let response = get(&app, "/api/todos").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(body_text(response).await, "[]");
}

#[tokio::test]
async fn test_api_todos_record_shape() {
    let app = app();
    post_form(&app, "/add", "title=Pay+rent").await;
    post_form(&app, "/add", "title=Water+plants&description=balcony").await;

    let todos = api_todos(&app).await;
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0]["id"], 1);
    assert_eq!(todos[0]["title"], "Pay rent");
    assert_eq!(todos[0]["description"], Value::Null);
    assert_eq!(todos[0]["completed"], false);
    assert_eq!(todos[1]["description"], "balcony");

    let created_at = todos[0]["created_at"].as_str().unwrap();
    assert!(chrono::NaiveDateTime::parse_from_str(created_at, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
    assert!(!created_at.ends_with('Z') && !created_at.contains('+'));
}

#[tokio::test]
async fn test_edit_updates_fields_and_keeps_created_at() {
    let app = app();
    post_form(&app, "/add", "title=Draft&description=first+pass").await;
    let before = api_todos(&app).await.remove(0);

    let response = get(&app, "/edit/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(r#"value="Draft""#));

    let response = post_form(&app, "/edit/1", "title=Final&description=second+pass").await;
    assert_redirects_home(&response);

    let html = body_text(get(&app, "/edit/1").await).await;
    assert!(html.contains(r#"value="Final""#));
    assert!(html.contains(">second pass</textarea>"));

    let after = api_todos(&app).await.remove(0);
    assert_eq!(after["created_at"], before["created_at"]);
    assert_eq!(after["completed"], before["completed"]);
}

#[tokio::test]
async fn test_edit_with_blank_title_is_rejected() {
    let app = app();
    post_form(&app, "/add", "title=Keep+me").await;
    let response = post_form(&app, "/edit/1", "title=&description=x").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(api_todos(&app).await[0]["title"], "Keep me");
}

#[tokio::test]
async fn test_non_numeric_id_is_rejected() {
    let app = app();
    assert_eq!(get(&app, "/complete/abc").await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let response = get(&app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[cfg(feature = "storage")]
#[tokio::test]
async fn test_sqlite_backed_app_lists_newest_first() -> Result<(), Box<dyn std::error::Error>> {
    use crate::storage::sqlite::SqliteStorage;

    let app = app_with(SqliteStorage::new_memory().await?);
    post_form(&app, "/add", "title=Older").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    post_form(&app, "/add", "title=Newer").await;

    let html = body_text(get(&app, "/").await).await;
    let newer = html.find(">Newer<").ok_or("newer missing")?;
    let older = html.find(">Older<").ok_or("older missing")?;
    assert!(newer < older);

    let titles: Vec<String> = api_todos(&app)
        .await
        .iter()
        .map(|t| t["title"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(titles, vec!["Older", "Newer"]);
    Ok(())
}
