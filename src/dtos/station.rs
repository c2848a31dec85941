use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::station::Station;

#[derive(Debug, Deserialize)]
pub struct StationCreateDto {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationViewDto {
    pub id: i64,
    pub name: String,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

impl From<Station> for StationViewDto {
    fn from(station: Station) -> Self {
        Self {
            id: station.id,
            name: station.name,
            created_date: station.created_date,
            modified_date: station.modified_date,
        }
    }
}
