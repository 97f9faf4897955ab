use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, UtcOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Daily,
    Once,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub kind: TaskKind,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub archived: bool,
}

impl Task {
    /// Calendar day the task came into existence, truncated in UTC.
    pub fn created_on(&self) -> Date {
        self.created_at.to_offset(UtcOffset::UTC).date()
    }
}
