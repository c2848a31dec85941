pub mod line;
pub mod station;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDto {
    pub message: String,
}
