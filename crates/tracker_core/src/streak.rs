use crate::history::DayAggregate;
use serde::Serialize;

/// Minimum completion percentage for a day to count toward a streak.
pub const SUCCESS_THRESHOLD: u8 = 80;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakState {
    pub current: u32,
    pub longest: u32,
}

/// Streaks over a contiguous, ascending day sequence.
///
/// Days with no active daily tasks are neutral: they never break a
/// run, and when bridged between successful days they count toward
/// its length. Neutral days before the first or after the last
/// successful day of a run do not count. Only a day that had active
/// tasks and fell below the threshold resets a streak.
pub fn compute_streaks(history: &[DayAggregate]) -> StreakState {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut bridged = 0u32;
    for day in history {
        if neutral(day) {
            if run > 0 {
                bridged += 1;
            }
            continue;
        }
        if successful(day) {
            run += bridged + 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
        bridged = 0;
    }

    // Current streak walks backward from the newest day and stops at
    // the first failing day. Neutral days never stop the walk; those
    // bridged between successful days are folded into the count once
    // the next successful day is reached.
    let mut current = 0u32;
    let mut pending = 0u32;
    for day in history.iter().rev() {
        if neutral(day) {
            if current > 0 {
                pending += 1;
            }
            continue;
        }
        if successful(day) {
            current += pending + 1;
            pending = 0;
        } else {
            break;
        }
    }

    StreakState { current, longest }
}

fn successful(day: &DayAggregate) -> bool {
    day.total > 0 && day.percentage >= SUCCESS_THRESHOLD
}

fn neutral(day: &DayAggregate) -> bool {
    day.total == 0
}
