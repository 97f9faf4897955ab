use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// One record per (task, day). `failure_note` is only ever present on
/// records that were explicitly marked missed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub id: String,
    pub task_id: String,
    #[serde(with = "super::day_format")]
    pub completed_date: Date,
    pub is_completed: bool,
    #[serde(default)]
    pub failure_note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
