use super::Store;
use crate::error::AppError;
use crate::model::{Completion, Task, TaskKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::{Date, OffsetDateTime};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "store.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    schema_version: u32,
    tasks: Vec<Task>,
    #[serde(default)]
    completions: Vec<Completion>,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    tasks: Vec<Task>,
    completions: Vec<Completion>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var("TRACKER_STORE_PATH")
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("tracker").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tracker")
            .join(STORE_FILE_NAME))
    }
}

/// Single-file JSON store. Every write rewrites the whole file, so a
/// write either lands completely or not at all.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::at(store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_state(&self) -> Result<StoreState, AppError> {
        if !self.path.exists() {
            return Ok(StoreState::default());
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| AppError::store_unavailable(err.to_string()))?;
        let stored: StoredState =
            serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;

        if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
            return Err(AppError::invalid_data("schema_version mismatch"));
        }

        let state = StoreState {
            tasks: stored.tasks,
            completions: stored.completions,
        };
        validate_state(&state)?;
        Ok(state)
    }

    async fn save_state(&self, state: &StoreState) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| AppError::store_unavailable(err.to_string()))?;
        }

        let stored = StoredState {
            schema_version: SCHEMA_VERSION,
            tasks: state.tasks.clone(),
            completions: state.completions.clone(),
        };
        let content = serde_json::to_string_pretty(&stored)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|err| AppError::store_unavailable(err.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, permissions)
                .await
                .map_err(|err| AppError::store_unavailable(err.to_string()))?;
        }

        Ok(())
    }
}

// Boundary validation: malformed records are rejected here instead of
// leaking into the calculators. Duplicate (task, day) pairs are
// tolerated on load; the upsert path keeps the invariant going
// forward and the history calculator tie-breaks on read.
fn validate_state(state: &StoreState) -> Result<(), AppError> {
    for task in &state.tasks {
        if task.id.trim().is_empty() {
            return Err(AppError::invalid_data("task with empty id"));
        }
    }

    for completion in &state.completions {
        if completion.id.trim().is_empty() || completion.task_id.trim().is_empty() {
            return Err(AppError::invalid_data("completion with empty id"));
        }
        if completion.is_completed && completion.failure_note.is_some() {
            return Err(AppError::invalid_data(
                "completed record carries a failure note",
            ));
        }
    }

    Ok(())
}

fn next_id(prefix: &str) -> String {
    format!("{prefix}-{}", OffsetDateTime::now_utc().unix_timestamp_nanos())
}

impl Store for JsonStore {
    async fn list_active_tasks(&self) -> Result<Vec<Task>, AppError> {
        let mut tasks: Vec<Task> = self
            .load_state()
            .await?
            .tasks
            .into_iter()
            .filter(|task| !task.archived)
            .collect();
        tasks.sort_by_key(|task| task.created_at);
        Ok(tasks)
    }

    async fn list_recent_completions(&self, limit: usize) -> Result<Vec<Completion>, AppError> {
        let mut completions = self.load_state().await?.completions;
        completions.sort_by(|a, b| b.completed_date.cmp(&a.completed_date));
        completions.truncate(limit);
        Ok(completions)
    }

    async fn get_completion(
        &self,
        task_id: &str,
        date: Date,
    ) -> Result<Option<Completion>, AppError> {
        let state = self.load_state().await?;
        Ok(state
            .completions
            .into_iter()
            .find(|completion| completion.task_id == task_id && completion.completed_date == date))
    }

    async fn upsert_completion(
        &self,
        task_id: &str,
        date: Date,
        is_completed: bool,
        failure_note: Option<&str>,
    ) -> Result<Completion, AppError> {
        let mut state = self.load_state().await?;
        if !state.tasks.iter().any(|task| task.id == task_id) {
            return Err(AppError::invalid_input("task not found"));
        }

        let note = if is_completed {
            None
        } else {
            failure_note.map(|value| value.to_string())
        };
        let now = OffsetDateTime::now_utc();

        let position = state
            .completions
            .iter()
            .position(|completion| completion.task_id == task_id && completion.completed_date == date);

        let updated = match position {
            Some(index) => {
                let record = &mut state.completions[index];
                record.is_completed = is_completed;
                record.failure_note = note;
                record.updated_at = now;
                record.clone()
            }
            None => {
                let record = Completion {
                    id: next_id("completion"),
                    task_id: task_id.to_string(),
                    completed_date: date,
                    is_completed,
                    failure_note: note,
                    updated_at: now,
                };
                state.completions.push(record.clone());
                record
            }
        };

        self.save_state(&state).await?;
        Ok(updated)
    }

    async fn create_task(&self, title: &str, kind: TaskKind) -> Result<Task, AppError> {
        let mut state = self.load_state().await?;
        let task = Task {
            id: next_id("task"),
            title: title.to_string(),
            kind,
            created_at: OffsetDateTime::now_utc(),
            archived: false,
        };
        state.tasks.push(task.clone());
        self.save_state(&state).await?;
        Ok(task)
    }

    async fn rename_task(&self, id: &str, title: &str) -> Result<Task, AppError> {
        let mut state = self.load_state().await?;
        let task = state
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::invalid_input("task not found"))?;
        task.title = title.to_string();
        let updated = task.clone();
        self.save_state(&state).await?;
        Ok(updated)
    }

    async fn archive_task(&self, id: &str) -> Result<(), AppError> {
        let mut state = self.load_state().await?;
        let task = state
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::invalid_input("task not found"))?;
        task.archived = true;
        self.save_state(&state).await?;
        Ok(())
    }
}
