pub mod config;
pub mod models;
pub mod storage;
pub mod tracking;
