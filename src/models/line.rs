use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Line {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub up_station_id: i64,
    pub down_station_id: i64,
    pub distance: i64,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}
