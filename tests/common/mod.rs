#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use trip_planner::app::build_router;
use trip_planner::config::Config;
use trip_planner::db;
use trip_planner::schedule::TripAnchors;
use trip_planner::state::AppState;

pub const BOUNDARY: &str = "trip-test-boundary";

/// One in-memory SQLite connection with the trip tables created.
///
/// The pool is pinned to a single connection that never expires, since every
/// in-memory connection would otherwise get its own empty database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    db::init_schema(&pool).await.expect("schema");
    pool
}

pub fn test_config(photo_dir: Option<PathBuf>) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        photo_dir,
        public_base_url: String::new(),
        photo_list_limit: 100,
        preview_limit: 50,
        anchors: TripAnchors::default(),
    }
}

pub async fn build_test_app(pool: SqlitePool, photo_dir: Option<PathBuf>) -> Router {
    let state = AppState::load(&test_config(photo_dir), pool)
        .await
        .expect("app state");
    build_router(state)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    json: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match json {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

/// Multipart form with one `file` part per `(file name, contents)` pair.
pub async fn post_files(app: &Router, uri: &str, files: &[(&str, &str)]) -> Response<Body> {
    let mut body = Vec::new();
    for (name, contents) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}

pub fn schedule_json(date: &str, time: Option<&str>, title: &str, area: &str) -> serde_json::Value {
    serde_json::json!({
        "date": date,
        "time": time,
        "title": title,
        "area": area,
    })
}
