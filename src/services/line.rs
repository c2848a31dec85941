use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    AppState,
    dtos::{
        line::{LineCreateDto, LineUpdateDto, LineViewDto},
        station::StationViewDto,
    },
    error::{ApiError, ApiResult, AppJson},
    models::{line::Line, station::Station},
    services::station::find_station,
};

const KIND: &str = "Line";

const LINE_COLUMNS: &str =
    "id, name, color, up_station_id, down_station_id, distance, created_date, modified_date";

async fn find_line(pool: &SqlitePool, id: i64) -> Result<Option<Line>, sqlx::Error> {
    sqlx::query_as::<_, Line>(&format!("SELECT {LINE_COLUMNS} FROM lines WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

async fn require_station(pool: &SqlitePool, id: i64) -> ApiResult<Station> {
    find_station(pool, id)
        .await?
        .ok_or_else(|| ApiError::InvalidRequest(format!("Station {} not found.", id)))
}

/// Resolves the up and down station of a line, in that order.
async fn line_to_view(pool: &SqlitePool, line: Line) -> ApiResult<LineViewDto> {
    let mut stations = Vec::with_capacity(2);
    for id in [line.up_station_id, line.down_station_id] {
        if let Some(station) = find_station(pool, id).await? {
            stations.push(StationViewDto::from(station));
        }
    }

    Ok(LineViewDto::new(line, stations))
}

fn validate_create(input: &LineCreateDto) -> ApiResult<()> {
    if input.name.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "Line name must not be blank.".to_string(),
        ));
    }
    if input.up_station_id == input.down_station_id {
        return Err(ApiError::InvalidRequest(
            "Up and down station must differ.".to_string(),
        ));
    }
    if input.distance <= 0 {
        return Err(ApiError::InvalidRequest(format!(
            "Distance must be positive, got {}.",
            input.distance
        )));
    }
    Ok(())
}

pub async fn get_lines(State(app_state): State<AppState>) -> ApiResult<Json<Vec<LineViewDto>>> {
    let lines = sqlx::query_as::<_, Line>(&format!("SELECT {LINE_COLUMNS} FROM lines ORDER BY id"))
        .fetch_all(&app_state.pool)
        .await?;

    let stations = sqlx::query_as::<_, Station>(
        "SELECT id, name, created_date, modified_date FROM stations",
    )
    .fetch_all(&app_state.pool)
    .await?
    .into_iter()
    .map(|s| (s.id, s))
    .collect::<HashMap<i64, Station>>();

    Ok(Json(
        lines
            .into_iter()
            .map(|line| {
                let line_stations = [line.up_station_id, line.down_station_id]
                    .iter()
                    .filter_map(|id| stations.get(id))
                    .cloned()
                    .map(StationViewDto::from)
                    .collect::<Vec<StationViewDto>>();
                LineViewDto::new(line, line_stations)
            })
            .collect::<Vec<LineViewDto>>(),
    ))
}

pub async fn get_line(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<LineViewDto>> {
    let line = find_line(&app_state.pool, id)
        .await?
        .ok_or(ApiError::NotFound { kind: KIND, id })?;

    Ok(Json(line_to_view(&app_state.pool, line).await?))
}

pub async fn create_line(
    State(app_state): State<AppState>,
    AppJson(input): AppJson<LineCreateDto>,
) -> ApiResult<impl IntoResponse> {
    validate_create(&input)?;

    require_station(&app_state.pool, input.up_station_id).await?;
    require_station(&app_state.pool, input.down_station_id).await?;

    let now = Utc::now();

    let line = sqlx::query_as::<_, Line>(&format!(
        r#"
        INSERT INTO lines (name, color, up_station_id, down_station_id, distance, created_date, modified_date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING {LINE_COLUMNS}
        "#
    ))
    .bind(&input.name)
    .bind(&input.color)
    .bind(input.up_station_id)
    .bind(input.down_station_id)
    .bind(input.distance)
    .bind(now)
    .bind(now)
    .fetch_one(&app_state.pool)
    .await
    .map_err(|e| ApiError::from_write(e, KIND, &input.name))?;

    tracing::debug!(id = line.id, name = %line.name, "line created");

    let location = format!("/lines/{}", line.id);
    let view = line_to_view(&app_state.pool, line).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(view),
    ))
}

pub async fn update_line(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(input): AppJson<LineUpdateDto>,
) -> ApiResult<Json<LineViewDto>> {
    if find_line(&app_state.pool, id).await?.is_none() {
        return Err(ApiError::NotFound { kind: KIND, id });
    }

    if input.name.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "Line name must not be blank.".to_string(),
        ));
    }

    let line = sqlx::query_as::<_, Line>(&format!(
        r#"
        UPDATE lines SET name = ?, color = ?, modified_date = ?
        WHERE id = ?
        RETURNING {LINE_COLUMNS}
        "#
    ))
    .bind(&input.name)
    .bind(&input.color)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&app_state.pool)
    .await
    .map_err(|e| ApiError::from_write(e, KIND, &input.name))?
    .ok_or(ApiError::NotFound { kind: KIND, id })?;

    tracing::debug!(id, name = %line.name, "line updated");

    Ok(Json(line_to_view(&app_state.pool, line).await?))
}

pub async fn delete_line(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let res = sqlx::query("DELETE FROM lines WHERE id = ?")
        .bind(id)
        .execute(&app_state.pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound { kind: KIND, id });
    }

    tracing::debug!(id, "line deleted");

    Ok(StatusCode::NO_CONTENT)
}
