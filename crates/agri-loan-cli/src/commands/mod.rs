pub mod export;
pub mod schedule;
pub mod won;
