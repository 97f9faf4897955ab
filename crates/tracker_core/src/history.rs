use crate::calendar::DayRange;
use crate::model::{Completion, Task, TaskKind};
use serde::Serialize;
use std::collections::HashMap;
use time::Date;

/// Per-day rollup of daily-task completion. Derived fresh on every
/// refresh, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAggregate {
    #[serde(with = "crate::model::day_format")]
    pub date: Date,
    pub total: u32,
    pub completed: u32,
    pub percentage: u8,
}

/// One aggregate per day in `range`, ascending.
///
/// A task counts toward a day when it is a daily task created on or
/// before that day; once tasks never contribute. Should the store hand
/// back duplicate records for a (task, day) key, the most recently
/// updated one wins.
pub fn compute_history(
    tasks: &[Task],
    completions: &[Completion],
    range: DayRange,
) -> Vec<DayAggregate> {
    let mut lookup: HashMap<(&str, Date), &Completion> = HashMap::new();
    for completion in completions {
        let key = (completion.task_id.as_str(), completion.completed_date);
        match lookup.get(&key) {
            Some(existing) if existing.updated_at >= completion.updated_at => {}
            _ => {
                lookup.insert(key, completion);
            }
        }
    }

    let mut history = Vec::new();
    for day in range.days() {
        let mut total = 0u32;
        let mut completed = 0u32;

        for task in tasks {
            if task.kind != TaskKind::Daily || task.created_on() > day {
                continue;
            }
            total += 1;

            let done = lookup
                .get(&(task.id.as_str(), day))
                .map(|record| record.is_completed)
                .unwrap_or(false);
            if done {
                completed += 1;
            }
        }

        history.push(DayAggregate {
            date: day,
            total,
            completed,
            percentage: percentage(completed, total),
        });
    }

    history
}

// Round half up.
fn percentage(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(total) * 100.0).round() as u8
}
