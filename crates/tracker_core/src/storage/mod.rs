use crate::error::AppError;
use crate::model::{Completion, Task, TaskKind};
use time::Date;

mod json_store;
pub use json_store::{JsonStore, SCHEMA_VERSION, store_path};

/// Data-access boundary for tasks and completions. Any backing store
/// that implements these operations can drive the application; the
/// calculators never touch a store directly.
#[allow(async_fn_in_trait)]
pub trait Store {
    /// Unarchived tasks, ordered by creation time ascending.
    async fn list_active_tasks(&self) -> Result<Vec<Task>, AppError>;

    /// Most recent completions by date, descending, capped at `limit`.
    async fn list_recent_completions(&self, limit: usize) -> Result<Vec<Completion>, AppError>;

    async fn get_completion(
        &self,
        task_id: &str,
        date: Date,
    ) -> Result<Option<Completion>, AppError>;

    /// Read-then-write: update the record for `(task_id, date)` when
    /// one exists, insert otherwise. `failure_note` is discarded when
    /// marking complete.
    async fn upsert_completion(
        &self,
        task_id: &str,
        date: Date,
        is_completed: bool,
        failure_note: Option<&str>,
    ) -> Result<Completion, AppError>;

    async fn create_task(&self, title: &str, kind: TaskKind) -> Result<Task, AppError>;

    async fn rename_task(&self, id: &str, title: &str) -> Result<Task, AppError>;

    /// Soft archive. Tasks are never physically deleted.
    async fn archive_task(&self, id: &str) -> Result<(), AppError>;
}
