//! Pure rendering: turns loaded data into [`View`] instructions that a
//! surface draws (terminal) or serializes (HTML). Nothing here touches
//! controller state.

use crate::model::{ForecastDay, Lesson};

pub const NO_DATE: &str = "Без даты";
pub const NO_TIME: &str = "??:?? – ??:??";
pub const NO_DISCIPLINE: &str = "Не указано";
pub const NO_ROOM: &str = "Аудитория не указана";
pub const NO_TEACHER: &str = "Преподаватель не указан";
pub const NO_LESSON_TYPE: &str = "Тип не указан";
pub const NO_VALUE: &str = "—";

pub const ERROR_HEADER: &str = "❌ Ошибка";
pub const RETRY_LABEL: &str = "Повторить попытку";
pub const WEATHER_LOADING: &str = "Загружаем погоду во Владивостоке...";
pub const NO_WEATHER: [&str; 2] = ["📭 Не удалось загрузить прогноз погоды", "Попробуйте позже"];

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Container cleared and hidden.
    Blank,
    Loading { message: String },
    Schedule { days: Vec<DayBlock> },
    NotFound { lines: Vec<String> },
    Weather { days: Vec<WeatherBlock> },
    Error { message: String },
}

impl View {
    pub fn has_retry(&self) -> bool {
        matches!(self, View::Error { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayBlock {
    pub title: String,
    pub first: bool,
    pub lessons: Vec<LessonRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LessonRow {
    pub time: String,
    pub discipline: String,
    pub room: String,
    pub teacher: String,
    pub lesson_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherBlock {
    pub first: bool,
    pub icon: String,
    pub date: String,
    pub temperature: String,
    pub wind: String,
    pub humidity: String,
    pub precipitation: String,
}

/// Groups lessons by their date, keeping the order in which each date
/// first appears. Lessons without a date share the [`NO_DATE`] group.
pub fn group_by_date(lessons: &[Lesson]) -> Vec<(&str, Vec<&Lesson>)> {
    let mut groups: Vec<(&str, Vec<&Lesson>)> = Vec::new();
    for lesson in lessons {
        let date = lesson.date.as_deref().unwrap_or(NO_DATE);
        match groups.iter_mut().find(|(d, _)| *d == date) {
            Some((_, items)) => items.push(lesson),
            None => groups.push((date, vec![lesson])),
        }
    }
    groups
}

fn or_placeholder(value: &Option<String>, placeholder: &str) -> String {
    value.clone().unwrap_or_else(|| placeholder.to_string())
}

pub fn lesson_row(lesson: &Lesson) -> LessonRow {
    LessonRow {
        time: or_placeholder(&lesson.time, NO_TIME),
        discipline: or_placeholder(&lesson.discipline, NO_DISCIPLINE),
        room: or_placeholder(&lesson.room, NO_ROOM),
        teacher: or_placeholder(&lesson.teacher, NO_TEACHER),
        lesson_type: or_placeholder(&lesson.lesson_type, NO_LESSON_TYPE),
    }
}

/// One week of lessons. An empty week renders the "not found" notice.
pub fn render_week(lessons: &[Lesson], group: &str) -> View {
    if lessons.is_empty() {
        return render_schedule_not_found(group);
    }
    let days = group_by_date(lessons)
        .into_iter()
        .enumerate()
        .map(|(i, (date, items))| DayBlock {
            title: format!("● {}", date),
            first: i == 0,
            lessons: items.into_iter().map(lesson_row).collect(),
        })
        .collect();
    View::Schedule { days }
}

pub fn render_forecast(days: &[ForecastDay]) -> View {
    if days.is_empty() {
        return View::NotFound { lines: NO_WEATHER.iter().map(|s| s.to_string()).collect() };
    }
    let field = |v: &Option<String>| or_placeholder(v, NO_VALUE);
    let days = days
        .iter()
        .enumerate()
        .map(|(i, day)| WeatherBlock {
            first: i == 0,
            icon: field(&day.condition_icon),
            date: field(&day.date_display),
            temperature: field(&day.temperature),
            wind: format!("{} м/с ({})", field(&day.wind_speed), field(&day.wind_direction)),
            humidity: format!("{}%", field(&day.humidity)),
            precipitation: format!("{} мм", field(&day.precipitation)),
        })
        .collect();
    View::Weather { days }
}

pub fn render_schedule_loading(group: &str) -> View {
    View::Loading { message: format!("Загружаем расписание для группы {}...", group) }
}

pub fn render_weather_loading() -> View {
    View::Loading { message: WEATHER_LOADING.to_string() }
}

pub fn render_schedule_not_found(group: &str) -> View {
    View::NotFound {
        lines: vec![
            format!("📭 Расписание для группы \"{}\" не найдено", group),
            "Проверьте правильность написания группы".to_string(),
        ],
    }
}

pub fn render_error(message: &str) -> View {
    View::Error { message: message.to_string() }
}
