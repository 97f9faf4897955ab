use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TRACKER_CONFIG_PATH";

/// ANSI shades for the calendar percentage bands:
/// 0, 1-24, 25-49, 50-74, 75-99 and 100 percent.
#[derive(Debug, Clone)]
pub struct Palette {
    bands: [&'static str; 6],
    reset: &'static str,
}

impl Palette {
    pub fn shade(&self, percentage: u8, text: &str) -> String {
        let band = match percentage {
            0 => 0,
            1..=24 => 1,
            25..=49 => 2,
            50..=74 => 3,
            75..=99 => 4,
            _ => 5,
        };
        let color = self.bands[band];
        if color.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", color, text, self.reset)
        }
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match canonical_theme_name_option(theme) {
        Some(ref name) if name == "heat" => Palette {
            bands: [
                "\x1b[38;5;244m",
                "\x1b[38;5;196m",
                "\x1b[38;5;208m",
                "\x1b[38;5;220m",
                "\x1b[38;5;154m",
                "\x1b[38;5;40m",
            ],
            reset: "\x1b[0m",
        },
        _ => Palette {
            bands: [""; 6],
            reset: "",
        },
    }
}

fn canonical_theme_name_option(theme: Option<&str>) -> Option<String> {
    theme.and_then(canonical_theme_name)
}

// Separators are dropped outright so "Heat-Map", "heat_map" and
// "heatmap" all land on the same alias.
pub fn canonical_theme_name(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect();

    if cleaned.is_empty() {
        return Some("default".into());
    }

    match cleaned.as_str() {
        "plain" | "none" | "mono" => Some("default".to_string()),
        "color" | "colour" | "heatmap" => Some("heat".to_string()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("tracker")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tracker")
            .join(CONFIG_FILE_NAME))
    }
}

/// Config problems must never block a command; the caller gets the
/// defaults plus the error to report.
pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::store_unavailable(format!("{}: {}", path.display(), err)))?;
    let mut config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    config.theme = config.theme.as_deref().and_then(canonical_theme_name);
    Ok(config)
}
