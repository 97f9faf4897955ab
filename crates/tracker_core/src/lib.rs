pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod storage;
pub mod streak;
