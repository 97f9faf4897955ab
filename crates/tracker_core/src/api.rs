use crate::calendar::DayRange;
use crate::error::AppError;
use crate::history::{DayAggregate, compute_history};
use crate::model::{Completion, Task, TaskKind};
use crate::storage::Store;
use crate::streak::{StreakState, compute_streaks};
use serde::Serialize;
use time::Date;

/// Completion records fetched per refresh cycle.
pub const RECENT_COMPLETIONS_LIMIT: usize = 500;

/// A task with its display-facing completion state: a daily task is
/// completed when a completed record exists for today, a once task
/// when any completed record exists at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub completed: bool,
}

/// Immutable application state produced by one refresh cycle. Callers
/// render from it and throw it away; nothing is shared across cycles.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    #[serde(with = "crate::model::day_format")]
    pub today: Date,
    pub tasks: Vec<TaskView>,
    pub history: Vec<DayAggregate>,
    pub streaks: StreakState,
}

pub async fn add_task<S: Store>(store: &S, title: &str, kind: TaskKind) -> Result<Task, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }
    store.create_task(trimmed, kind).await
}

pub async fn rename_task<S: Store>(
    store: &S,
    id: &str,
    new_title: &str,
) -> Result<Task, AppError> {
    let trimmed_id = require_id(id)?;
    let trimmed_title = new_title.trim();
    if trimmed_title.is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }
    store.rename_task(trimmed_id, trimmed_title).await
}

pub async fn archive_task<S: Store>(store: &S, id: &str) -> Result<(), AppError> {
    let trimmed_id = require_id(id)?;
    store.archive_task(trimmed_id).await
}

pub async fn mark_complete<S: Store>(
    store: &S,
    id: &str,
    date: Date,
) -> Result<Completion, AppError> {
    let trimmed_id = require_id(id)?;
    store.upsert_completion(trimmed_id, date, true, None).await
}

pub async fn mark_missed<S: Store>(
    store: &S,
    id: &str,
    date: Date,
    note: &str,
) -> Result<Completion, AppError> {
    let trimmed_id = require_id(id)?;
    let trimmed_note = note.trim();
    if trimmed_note.is_empty() {
        return Err(AppError::invalid_input("failure note is required"));
    }
    store
        .upsert_completion(trimmed_id, date, false, Some(trimmed_note))
        .await
}

/// One full refresh cycle: fetch tasks and completions concurrently,
/// then run the calculators over the window of `window_days` ending at
/// `today`. A failed fetch aborts the cycle; there is no retry and no
/// partial snapshot.
pub async fn refresh<S: Store>(
    store: &S,
    today: Date,
    window_days: u16,
) -> Result<Snapshot, AppError> {
    let (tasks, completions) = tokio::try_join!(
        store.list_active_tasks(),
        store.list_recent_completions(RECENT_COMPLETIONS_LIMIT),
    )?;

    let range = DayRange::ending_at(today, window_days);
    let history = compute_history(&tasks, &completions, range);
    let streaks = compute_streaks(&history);
    let tasks = annotate(tasks, &completions, today);

    Ok(Snapshot {
        today,
        tasks,
        history,
        streaks,
    })
}

fn require_id(id: &str) -> Result<&str, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }
    Ok(trimmed)
}

fn annotate(tasks: Vec<Task>, completions: &[Completion], today: Date) -> Vec<TaskView> {
    tasks
        .into_iter()
        .map(|task| {
            let completed = completions.iter().any(|completion| {
                completion.task_id == task.id
                    && completion.is_completed
                    && (task.kind == TaskKind::Once || completion.completed_date == today)
            });
            TaskView { task, completed }
        })
        .collect()
}
