use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{dtos::station::StationViewDto, models::line::Line};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCreateDto {
    pub name: String,
    pub color: String,
    pub up_station_id: i64,
    pub down_station_id: i64,
    pub distance: i64,
}

/// Body of `PUT /lines/{id}`. Only name and color are mutable.
#[derive(Debug, Deserialize)]
pub struct LineUpdateDto {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineViewDto {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub distance: i64,
    /// Up station first, then down station.
    pub stations: Vec<StationViewDto>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

impl LineViewDto {
    pub fn new(line: Line, stations: Vec<StationViewDto>) -> Self {
        Self {
            id: line.id,
            name: line.name,
            color: line.color,
            distance: line.distance,
            stations,
            created_date: line.created_date,
            modified_date: line.modified_date,
        }
    }
}
