mod common;

use axum::http::{Method, StatusCode};

use common::{app, app_with_stations, create_line, create_station, send};

#[tokio::test]
async fn create_station_assigns_id_and_location() {
    let app = app().await;

    let response = create_station(&app, "강남역").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["id"], 1);
    assert_eq!(response.body["name"], "강남역");
    assert_eq!(response.location(), "/stations/1");
}

#[tokio::test]
async fn duplicate_station_name_is_rejected() {
    let app = app().await;
    create_station(&app, "강남역").await;

    let response = create_station(&app, "강남역").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_stations_in_creation_order() {
    let app = app_with_stations().await;

    let response = send(&app, Method::GET, "/stations", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let names = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect::<Vec<&str>>();
    assert_eq!(names, vec!["강남역", "광교역", "왕십리역", "수원역"]);
}

#[tokio::test]
async fn delete_station() {
    let app = app_with_stations().await;

    let response = send(&app, Method::DELETE, "/stations/4", None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let missing = send(&app, Method::DELETE, "/stations/4", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn station_used_by_line_cannot_be_deleted() {
    let app = app_with_stations().await;
    let line = create_line(&app, "신분당선", "bg-red-600", 1, 2, 10).await;

    let blocked = send(&app, Method::DELETE, "/stations/2", None).await;
    assert_eq!(blocked.status, StatusCode::BAD_REQUEST);

    send(&app, Method::DELETE, line.location(), None).await;
    let freed = send(&app, Method::DELETE, "/stations/2", None).await;
    assert_eq!(freed.status, StatusCode::NO_CONTENT);
}
