use clap::Parser;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};
use tracker_cli::cli::{Cli, Command};
use tracker_core::api::{self, TaskView};
use tracker_core::config::{self, Palette};
use tracker_core::error::AppError;
use tracker_core::history::DayAggregate;
use tracker_core::model::TaskKind;
use tracker_core::storage::JsonStore;

/// Calendar window rendered by the list, stats and calendar views:
/// today and the 27 days before it.
const HISTORY_WINDOW_DAYS: u16 = 28;

const DATE_FORMAT: &'static [BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

#[derive(Tabled)]
struct TaskRow {
    id: String,
    title: String,
    done: &'static str,
}

#[derive(Tabled)]
struct CalendarRow {
    date: String,
    #[tabled(rename = "completed/total")]
    ratio: String,
    #[tabled(rename = "percent")]
    percentage: String,
}

fn today() -> Date {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset).date()
}

fn parse_date(raw: Option<&str>) -> Result<Date, AppError> {
    match raw {
        Some(value) => Date::parse(value.trim(), DATE_FORMAT)
            .map_err(|_| AppError::invalid_input("date must be YYYY-MM-DD")),
        None => Ok(today()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let payload =
        serde_json::to_string(value).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn print_task_tables(tasks: &[TaskView]) {
    if tasks.is_empty() {
        println!("No active tasks.");
        return;
    }

    print_task_section("Daily tasks", tasks, TaskKind::Daily);
    println!();
    print_task_section("Once tasks", tasks, TaskKind::Once);
}

fn print_task_section(heading: &str, tasks: &[TaskView], kind: TaskKind) {
    println!("{heading}");

    let rows: Vec<TaskRow> = tasks
        .iter()
        .filter(|view| view.task.kind == kind)
        .map(|view| TaskRow {
            id: view.task.id.clone(),
            title: view.task.title.clone(),
            done: if view.completed { "x" } else { "" },
        })
        .collect();

    if rows.is_empty() {
        println!("(none)");
    } else {
        println!("{}", Table::new(rows).with(Style::sharp()));
    }
}

fn print_calendar(history: &[DayAggregate], palette: &Palette) {
    if history.is_empty() {
        println!("No data available yet.");
        return;
    }

    let rows: Vec<CalendarRow> = history
        .iter()
        .map(|day| CalendarRow {
            date: day.date.to_string(),
            ratio: format!("{}/{}", day.completed, day.total),
            percentage: palette.shade(day.percentage, &format!("{}%", day.percentage)),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::sharp()));
}

fn load_palette(cli_theme: Option<&str>) -> Palette {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        eprintln!("WARNING: {err}");
    }
    let theme = cli_theme.map(str::to_string).or(loaded.config.theme);
    config::palette_for_theme(theme.as_deref())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

async fn run_command(cli: Cli) -> Result<(), AppError> {
    let store = JsonStore::from_env()?;

    match cli.command {
        Command::Add { title, once } => {
            let title = match title {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("title is required")),
            };
            let kind = if once { TaskKind::Once } else { TaskKind::Daily };

            let task = api::add_task(&store, &title, kind).await?;
            if cli.json {
                print_json(&task)?;
            } else {
                println!("Added task: {} ({})", task.title, task.id);
            }
        }
        Command::Rename { id, new_title } => {
            let task = api::rename_task(&store, &id, &new_title).await?;
            if cli.json {
                print_json(&task)?;
            } else {
                println!("Renamed task: {} ({})", task.title, task.id);
            }
        }
        Command::Archive { id } => {
            api::archive_task(&store, &id).await?;
            if cli.json {
                print_json(&serde_json::json!({ "id": id, "archived": true }))?;
            } else {
                println!("Archived task: {id}");
            }
        }
        Command::Done { id, date } => {
            let date = parse_date(date.as_deref())?;
            let completion = api::mark_complete(&store, &id, date).await?;
            if cli.json {
                print_json(&completion)?;
            } else {
                println!(
                    "Marked complete: {} on {}",
                    completion.task_id, completion.completed_date
                );
            }
        }
        Command::Miss { id, note, date } => {
            let date = parse_date(date.as_deref())?;
            let completion = api::mark_missed(&store, &id, date, &note).await?;
            if cli.json {
                print_json(&completion)?;
            } else {
                println!(
                    "Marked missed: {} on {}",
                    completion.task_id, completion.completed_date
                );
            }
        }
        Command::List => {
            let snapshot = api::refresh(&store, today(), HISTORY_WINDOW_DAYS).await?;
            if cli.json {
                print_json(&snapshot.tasks)?;
            } else {
                print_task_tables(&snapshot.tasks);
            }
        }
        Command::Stats => {
            let snapshot = api::refresh(&store, today(), HISTORY_WINDOW_DAYS).await?;
            if cli.json {
                print_json(&snapshot.streaks)?;
            } else {
                println!("Current streak: {} days", snapshot.streaks.current);
                println!("Longest streak: {} days", snapshot.streaks.longest);
            }
        }
        Command::Calendar => {
            let snapshot = api::refresh(&store, today(), HISTORY_WINDOW_DAYS).await?;
            if cli.json {
                print_json(&snapshot.history)?;
            } else {
                let palette = load_palette(cli.theme.as_deref());
                print_calendar(&snapshot.history, &palette);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli).await {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
