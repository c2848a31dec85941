pub mod line;
pub mod station;
