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
    dtos::station::{StationCreateDto, StationViewDto},
    error::{ApiError, ApiResult, AppJson},
    models::station::Station,
};

const KIND: &str = "Station";

pub async fn find_station(pool: &SqlitePool, id: i64) -> Result<Option<Station>, sqlx::Error> {
    sqlx::query_as::<_, Station>(
        "SELECT id, name, created_date, modified_date FROM stations WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_stations(
    State(app_state): State<AppState>,
) -> ApiResult<Json<Vec<StationViewDto>>> {
    let stations = sqlx::query_as::<_, Station>(
        "SELECT id, name, created_date, modified_date FROM stations ORDER BY id",
    )
    .fetch_all(&app_state.pool)
    .await?;

    Ok(Json(
        stations
            .into_iter()
            .map(StationViewDto::from)
            .collect::<Vec<StationViewDto>>(),
    ))
}

pub async fn create_station(
    State(app_state): State<AppState>,
    AppJson(input): AppJson<StationCreateDto>,
) -> ApiResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "Station name must not be blank.".to_string(),
        ));
    }

    let now = Utc::now();

    let station = sqlx::query_as::<_, Station>(
        r#"
        INSERT INTO stations (name, created_date, modified_date)
        VALUES (?, ?, ?)
        RETURNING id, name, created_date, modified_date
        "#,
    )
    .bind(&input.name)
    .bind(now)
    .bind(now)
    .fetch_one(&app_state.pool)
    .await
    .map_err(|e| ApiError::from_write(e, KIND, &input.name))?;

    tracing::debug!(id = station.id, name = %station.name, "station created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/stations/{}", station.id))],
        Json(StationViewDto::from(station)),
    ))
}

/// Removes a station unless a line still references it.
async fn remove_station(pool: &SqlitePool, id: i64) -> ApiResult<()> {
    let mut tx = pool.begin().await?;

    let referencing_lines = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM lines WHERE up_station_id = ? OR down_station_id = ?",
    )
    .bind(id)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if referencing_lines > 0 {
        return Err(ApiError::StationInUse(id));
    }

    // A line added by another connection after the count still trips the foreign key.
    let res = sqlx::query("DELETE FROM stations WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::from_station_delete(e, id))?;

    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound { kind: KIND, id });
    }

    tx.commit()
        .await
        .map_err(|e| ApiError::from_station_delete(e, id))?;

    Ok(())
}

pub async fn delete_station(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    remove_station(&app_state.pool, id).await?;

    tracing::debug!(id, "station deleted");

    Ok(StatusCode::NO_CONTENT)
}
