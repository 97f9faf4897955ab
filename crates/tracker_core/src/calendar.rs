use time::{Date, Duration};

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    pub start: Date,
    pub end: Date,
}

impl DayRange {
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// Range of `len` days ending at `end` inclusive. A zero length is
    /// treated as one day.
    pub fn ending_at(end: Date, len: u16) -> Self {
        let span = i64::from(len.max(1)) - 1;
        Self {
            start: end - Duration::days(span),
            end,
        }
    }

    /// Lazy iterator over the days in the range, ascending. The range
    /// itself is `Copy`, so iteration can be restarted at will.
    pub fn days(&self) -> Days {
        let next = if self.start <= self.end {
            Some(self.start)
        } else {
            None
        };
        Days {
            next,
            end: self.end,
        }
    }
}

impl IntoIterator for DayRange {
    type Item = Date;
    type IntoIter = Days;

    fn into_iter(self) -> Days {
        self.days()
    }
}

#[derive(Debug, Clone)]
pub struct Days {
    next: Option<Date>,
    end: Date,
}

impl Iterator for Days {
    type Item = Date;

    fn next(&mut self) -> Option<Date> {
        let current = self.next?;
        self.next = current.next_day().filter(|day| *day <= self.end);
        Some(current)
    }
}
