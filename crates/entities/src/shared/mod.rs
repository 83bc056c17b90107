pub mod config;
pub mod datetime;
pub mod metadata;
pub mod property;
