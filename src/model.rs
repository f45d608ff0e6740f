use serde::{Deserialize, Deserializer};
use ratatui::layout::Rect;
use ratatui::style::Color;
use crate::controller::ViewController;
use crate::surface::TerminalSurface;
use crate::swipe::SwipeTracker;
use crate::theme::{FileStore, ThemeController};

// 课程记录：字段名与后端表格列一致
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Lesson {
    #[serde(rename = "Дата", default, deserialize_with = "scalar_text")]
    pub date: Option<String>,
    #[serde(rename = "Время", default, deserialize_with = "scalar_text")]
    pub time: Option<String>,
    #[serde(rename = "Дисциплина", default, deserialize_with = "scalar_text")]
    pub discipline: Option<String>,
    #[serde(rename = "Аудитория", default, deserialize_with = "scalar_text")]
    pub room: Option<String>,
    #[serde(rename = "Преподаватель", default, deserialize_with = "scalar_text")]
    pub teacher: Option<String>,
    #[serde(rename = "Тип занятия", default, deserialize_with = "scalar_text")]
    pub lesson_type: Option<String>,
}

// 天气预报（单日）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ForecastDay {
    #[serde(default, deserialize_with = "scalar_text")]
    pub condition_icon: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub date_display: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub temperature: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub wind_speed: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub wind_direction: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub humidity: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub precipitation: Option<String>,
}

// API响应数据结构
#[derive(Debug, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub success: bool,
    pub schedule: Option<ScheduleBody>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleBody {
    #[serde(default)]
    pub weeks: Vec<Vec<Lesson>>,
}

#[derive(Debug, Deserialize)]
pub struct WeatherResponse {
    #[serde(default)]
    pub success: bool,
    pub forecast: Option<Vec<ForecastDay>>,
    pub message: Option<String>,
}

/// Accepts any JSON scalar and keeps its text form. `null` and `""`
/// become `None`; whitespace is kept as a value. Arrays and objects are
/// rejected.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) if s.is_empty() => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(D::Error::custom(format!("expected a scalar, got {other}"))),
    }
}

// 配置文件结构
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub theme_file: Option<String>,
    pub swipe_threshold_px: Option<u16>,
    pub cell_width_px: Option<u16>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
    pub accent_color: Option<String>,
    pub first_marker_color: Option<String>,
}

// 应用配置结构
#[derive(Debug, Clone)]
pub struct Config {
    // api config
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    // persisted preferences
    pub theme_file: String,
    // gestures
    pub swipe_threshold_px: u16,
    pub cell_width_px: u16,
    // logging
    pub log_file: String,
    pub log_level: log::LevelFilter,
    // colors
    pub accent_color: Color,
    pub first_marker_color: Color,
}

// 应用状态结构
pub struct App {
    pub config: Config,
    pub view: ViewController<TerminalSurface>,
    pub theme: ThemeController<FileStore>,
    pub search_input: String,
    pub swipe: SwipeTracker,
    // last drawn content area, for mouse hit-testing
    pub content_area: Rect,
    // rows scrolled off the top of the content area
    pub content_scroll: u16,
    // surface revision the scroll offset belongs to
    pub seen_revision: u64,
    pub in_flight: usize,
}
