pub mod day;
pub mod into_utc;
pub mod observation;
pub mod radiation;
pub mod station;
