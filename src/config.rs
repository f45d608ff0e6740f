use std::fs;
use std::env;
use std::str::FromStr;
use log::LevelFilter;
use ratatui::style::Color;
use crate::errors::ConfigError;
use crate::model::{FileConfig, Config};

const DEFAULT_CONFIG_PATH: &str = "vvsule.yml";
const CONFIG_ENV: &str = "VVSULE_CONFIG";

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_SWIPE_THRESHOLD_PX: u16 = 50;

/// Reads the YAML config named by `VVSULE_CONFIG`, falling back to
/// `vvsule.yml` in the working directory.
pub fn load_yaml_config() -> Result<Option<FileConfig>, ConfigError> {
    let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if fs::metadata(&path).is_err() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    parse_yaml_config(&content).map(Some)
}

pub fn parse_yaml_config(content: &str) -> Result<FileConfig, ConfigError> {
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    // Parse via generic Value so unknown keys and odd types are tolerated
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    if value.is_null() {
        return Ok(FileConfig::default());
    }
    let map = value.as_mapping().ok_or(ConfigError::NotAMapping)?;
    let get = |key: &str| map.get(&serde_yaml::Value::String(key.to_string()));
    let get_string = |key: &str| -> Option<String> {
        get(key)
            .and_then(|v| v.as_str().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
    };
    let get_u16 = |key: &str| -> Option<u16> {
        get(key)
            .and_then(|v| v.as_i64())
            .and_then(|n| if n > 0 { u16::try_from(n).ok() } else { None })
    };
    let get_u64 = |key: &str| -> Option<u64> {
        get(key)
            .and_then(|v| v.as_i64())
            .and_then(|n| if n > 0 { Some(n as u64) } else { None })
    };
    Ok(FileConfig {
        api_base_url: get_string("api_base_url"),
        request_timeout_secs: get_u64("request_timeout_secs"),
        theme_file: get_string("theme_file"),
        swipe_threshold_px: get_u16("swipe_threshold_px"),
        cell_width_px: get_u16("cell_width_px"),
        log_file: get_string("log_file"),
        log_level: get_string("log_level"),
        accent_color: get_string("accent_color"),
        first_marker_color: get_string("first_marker_color"),
    })
}

/// Builds the runtime config from defaults overlaid with the file config.
pub fn build_config(file_cfg: Option<FileConfig>) -> Config {
    let mut config = Config {
        api_base_url: DEFAULT_API_BASE_URL.to_string(),
        request_timeout_secs: 10,
        theme_file: "vvsule-prefs.json".to_string(),
        swipe_threshold_px: DEFAULT_SWIPE_THRESHOLD_PX,
        cell_width_px: 8,
        log_file: "vvsule.log".to_string(),
        log_level: LevelFilter::Info,
        accent_color: Color::Cyan,
        first_marker_color: Color::Yellow,
    };

    let Some(file_cfg) = file_cfg else {
        return config;
    };

    if let Some(url) = file_cfg.api_base_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = file_cfg.request_timeout_secs { config.request_timeout_secs = secs; }
    if let Some(path) = file_cfg.theme_file { config.theme_file = path; }
    if let Some(px) = file_cfg.swipe_threshold_px { config.swipe_threshold_px = px; }
    if let Some(px) = file_cfg.cell_width_px { config.cell_width_px = px; }
    if let Some(path) = file_cfg.log_file { config.log_file = path; }
    if let Some(level) = file_cfg.log_level {
        if let Ok(level) = LevelFilter::from_str(&level) { config.log_level = level; }
    }

    // 颜色配置
    if let Some(color_str) = file_cfg.accent_color {
        if let Some(color) = parse_color(&color_str) { config.accent_color = color; }
    }
    if let Some(color_str) = file_cfg.first_marker_color {
        if let Some(color) = parse_color(&color_str) { config.first_marker_color = color; }
    }

    config
}

pub fn parse_color(name: &str) -> Option<Color> {
    match name.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "lightred" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightyellow" => Some(Color::LightYellow),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        "lightcyan" => Some(Color::LightCyan),
        "orange" => Some(Color::Rgb(255, 165, 0)),
        _ => None,
    }
}
