#![allow(dead_code)]

use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use subway_lines::{AppState, db, router};
use tower::ServiceExt;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    /// Id taken from a `Location: /<resource>/{id}` header.
    pub fn created_id(&self) -> i64 {
        self.location()
            .split('/')
            .nth(2)
            .and_then(|id| id.parse().ok())
            .expect("Location header should carry an id")
    }
}

pub async fn app() -> Router {
    let pool = db::connect("sqlite::memory:")
        .await
        .expect("in-memory database should open");
    router(AppState { pool }, Duration::from_secs(10))
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn create_station(app: &Router, name: &str) -> TestResponse {
    send(app, Method::POST, "/stations", Some(json!({ "name": name }))).await
}

pub async fn create_line(
    app: &Router,
    name: &str,
    color: &str,
    up_station_id: i64,
    down_station_id: i64,
    distance: i64,
) -> TestResponse {
    send(
        app,
        Method::POST,
        "/lines",
        Some(json!({
            "name": name,
            "color": color,
            "upStationId": up_station_id,
            "downStationId": down_station_id,
            "distance": distance,
        })),
    )
    .await
}

/// Stations 강남역, 광교역, 왕십리역, 수원역 get ids 1 through 4.
pub async fn app_with_stations() -> Router {
    let app = app().await;
    for name in ["강남역", "광교역", "왕십리역", "수원역"] {
        let response = create_station(&app, name).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }
    app
}

pub fn station_ids(line: &Value) -> Vec<i64> {
    line["stations"]
        .as_array()
        .map(|stations| {
            stations
                .iter()
                .filter_map(|s| s["id"].as_i64())
                .collect::<Vec<i64>>()
        })
        .unwrap_or_default()
}
