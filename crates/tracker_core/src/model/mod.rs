mod completion;
mod task;

pub use completion::Completion;
pub use task::{Task, TaskKind};

time::serde::format_description!(pub day_format, Date, "[year]-[month]-[day]");
