//! Schedule/weather view state machine.
//!
//! The controller never performs I/O. Actions that need data hand back a
//! [`Request`] ticket; the runtime executes it and reports the outcome via
//! [`ViewController::schedule_loaded`] or [`ViewController::weather_loaded`].
//! Every ticket carries a generation number and only the latest generation
//! is allowed to render, so overlapping requests resolve as "latest issued
//! wins" regardless of which response arrives last.

use crate::errors::FetchError;
use crate::model::{ForecastDay, Lesson};
use crate::render::{self, View};
use crate::swipe::SwipeDirection;

const SCHEDULE_REJECTED: &str = "Не удалось загрузить расписание";
const WEATHER_REJECTED: &str = "Не удалось загрузить погоду";
const SCHEDULE_TRANSPORT: &str = "Ошибка подключения к серверу";
const WEATHER_TRANSPORT: &str = "Ошибка загрузки погоды";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Schedule,
    Weather,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingSchedule,
    ScheduleShown,
    ScheduleEmpty,
    ScheduleError,
    LoadingWeather,
    WeatherShown,
    WeatherEmpty,
    WeatherError,
}

/// Everything the controller is allowed to change on screen.
pub trait Surface {
    fn replace_content(&mut self, view: View);
    fn set_content_visible(&mut self, visible: bool);
    fn set_nav_visible(&mut self, visible: bool);
    /// Disabled buttons are also drawn dimmed.
    fn set_nav_buttons(&mut self, prev_enabled: bool, next_enabled: bool);
    fn set_search_visible(&mut self, visible: bool);
    fn set_weather_title_visible(&mut self, visible: bool);
    fn set_weather_icon_filled(&mut self, filled: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// `group` is the trimmed search text, not upper-cased.
    Schedule { group: String },
    Weather,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub generation: u64,
    pub kind: RequestKind,
}

#[derive(Debug, Clone)]
enum LastFetch {
    Schedule(String),
    Weather,
}

pub struct ViewController<S: Surface> {
    surface: S,
    mode: Mode,
    phase: Phase,
    weeks: Vec<Vec<Lesson>>,
    week_index: usize,
    current_group: String,
    last_fetch: Option<LastFetch>,
    swipe_enabled: bool,
    generation: u64,
}

impl<S: Surface> ViewController<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            mode: Mode::Schedule,
            phase: Phase::Idle,
            weeks: Vec::new(),
            week_index: 0,
            current_group: String::new(),
            last_fetch: None,
            swipe_enabled: true,
            generation: 0,
        }
    }

    pub fn surface(&self) -> &S { &self.surface }
    pub fn mode(&self) -> Mode { self.mode }
    pub fn phase(&self) -> Phase { self.phase }
    pub fn week_index(&self) -> usize { self.week_index }
    pub fn week_count(&self) -> usize { self.weeks.len() }
    pub fn current_group(&self) -> &str { &self.current_group }
    pub fn swipe_enabled(&self) -> bool { self.swipe_enabled }

    fn issue(&mut self, kind: RequestKind) -> Request {
        self.generation += 1;
        log::debug!("request #{} {:?}", self.generation, kind);
        Request { generation: self.generation, kind }
    }

    fn is_stale(&self, generation: u64, expected: Mode) -> bool {
        if generation != self.generation || self.mode != expected {
            log::debug!("dropping stale response #{} (latest #{})", generation, self.generation);
            return true;
        }
        false
    }

    /// Search button or Enter. Empty text is sent as-is.
    pub fn submit_search(&mut self, text: &str) -> Request {
        if self.mode == Mode::Weather {
            self.leave_weather_chrome();
        }
        let query = text.trim().to_string();
        self.mode = Mode::Schedule;
        self.swipe_enabled = true;
        self.current_group = query.to_uppercase();
        self.phase = Phase::LoadingSchedule;

        self.surface.replace_content(render::render_schedule_loading(&self.current_group));
        self.surface.set_content_visible(true);
        self.surface.set_nav_visible(true);
        self.surface.set_nav_buttons(false, false);

        self.last_fetch = Some(LastFetch::Schedule(query.clone()));
        self.issue(RequestKind::Schedule { group: query })
    }

    pub fn schedule_loaded(&mut self, generation: u64, result: Result<Vec<Vec<Lesson>>, FetchError>) {
        if self.is_stale(generation, Mode::Schedule) {
            return;
        }
        match result {
            Ok(weeks) if !weeks.is_empty() => {
                log::info!("schedule for {}: {} weeks", self.current_group, weeks.len());
                self.weeks = weeks;
                self.week_index = 0;
                self.phase = Phase::ScheduleShown;
                self.show_week();
            }
            Ok(_) => {
                log::info!("schedule for {} is empty", self.current_group);
                self.weeks.clear();
                self.week_index = 0;
                self.phase = Phase::ScheduleEmpty;
                self.surface.replace_content(render::render_schedule_not_found(&self.current_group));
                self.surface.set_nav_visible(false);
            }
            Err(e) => {
                log::warn!("schedule for {} failed: {}", self.current_group, e);
                self.weeks.clear();
                self.week_index = 0;
                self.phase = Phase::ScheduleError;
                self.show_error(error_message(&e, SCHEDULE_REJECTED, SCHEDULE_TRANSPORT));
            }
        }
    }

    fn show_week(&mut self) {
        let view = render::render_week(&self.weeks[self.week_index], &self.current_group);
        self.surface.replace_content(view);
        self.surface.set_content_visible(true);
        self.surface.set_nav_visible(true);
        self.update_week_buttons();
    }

    fn update_week_buttons(&mut self) {
        let last = self.weeks.len().saturating_sub(1);
        self.surface.set_nav_buttons(self.week_index > 0, self.week_index < last);
    }

    fn can_navigate(&self) -> bool {
        self.mode == Mode::Schedule && self.phase == Phase::ScheduleShown && !self.weeks.is_empty()
    }

    /// Returns whether the week changed.
    pub fn prev_week(&mut self) -> bool {
        if !self.can_navigate() || self.week_index == 0 {
            return false;
        }
        self.week_index -= 1;
        self.show_week();
        true
    }

    pub fn next_week(&mut self) -> bool {
        if !self.can_navigate() || self.week_index + 1 >= self.weeks.len() {
            return false;
        }
        self.week_index += 1;
        self.show_week();
        true
    }

    /// A completed swipe over the content area. Ignored in weather mode.
    pub fn swipe(&mut self, direction: SwipeDirection) -> bool {
        if !self.swipe_enabled || self.mode == Mode::Weather {
            return false;
        }
        match direction {
            SwipeDirection::Right => self.prev_week(),
            SwipeDirection::Left => self.next_week(),
        }
    }

    /// Cloud icon. Enters weather mode (and asks for the forecast) or goes
    /// back to an empty schedule view.
    pub fn toggle_weather(&mut self) -> Option<Request> {
        match self.mode {
            Mode::Schedule => Some(self.enter_weather()),
            Mode::Weather => {
                self.return_to_schedule();
                None
            }
        }
    }

    fn enter_weather(&mut self) -> Request {
        self.mode = Mode::Weather;
        self.swipe_enabled = false;
        self.surface.set_weather_icon_filled(true);
        self.surface.set_weather_title_visible(true);
        self.surface.set_search_visible(false);
        self.surface.set_nav_visible(false);
        self.load_weather()
    }

    fn load_weather(&mut self) -> Request {
        self.phase = Phase::LoadingWeather;
        self.surface.replace_content(render::render_weather_loading());
        self.surface.set_content_visible(true);
        self.last_fetch = Some(LastFetch::Weather);
        self.issue(RequestKind::Weather)
    }

    fn leave_weather_chrome(&mut self) {
        self.surface.set_weather_icon_filled(false);
        self.surface.set_weather_title_visible(false);
        self.surface.set_search_visible(true);
    }

    fn return_to_schedule(&mut self) {
        self.mode = Mode::Schedule;
        self.phase = Phase::Idle;
        self.leave_weather_chrome();
        self.weeks.clear();
        self.week_index = 0;
        self.surface.replace_content(View::Blank);
        self.surface.set_content_visible(false);
        self.surface.set_nav_visible(false);
        // a forecast still in flight must not repaint the schedule view
        self.generation += 1;
    }

    pub fn weather_loaded(&mut self, generation: u64, result: Result<Vec<ForecastDay>, FetchError>) {
        if self.is_stale(generation, Mode::Weather) {
            return;
        }
        match result {
            Ok(days) if !days.is_empty() => {
                log::info!("forecast: {} days", days.len());
                self.phase = Phase::WeatherShown;
                self.surface.replace_content(render::render_forecast(&days));
            }
            Ok(_) => {
                log::info!("forecast is empty");
                self.phase = Phase::WeatherEmpty;
                self.surface.replace_content(render::render_forecast(&[]));
            }
            Err(e) => {
                log::warn!("forecast failed: {}", e);
                self.phase = Phase::WeatherError;
                self.show_error(error_message(&e, WEATHER_REJECTED, WEATHER_TRANSPORT));
            }
        }
        self.surface.set_content_visible(true);
    }

    fn show_error(&mut self, message: String) {
        self.surface.replace_content(render::render_error(&message));
        self.surface.set_content_visible(true);
        self.surface.set_nav_visible(false);
    }

    /// Retry control on the error screen: repeats whatever fetch failed.
    pub fn retry(&mut self) -> Option<Request> {
        if !matches!(self.phase, Phase::ScheduleError | Phase::WeatherError) {
            return None;
        }
        match self.last_fetch.clone()? {
            LastFetch::Schedule(query) => Some(self.submit_search(&query)),
            LastFetch::Weather if self.mode == Mode::Weather => Some(self.load_weather()),
            LastFetch::Weather => None,
        }
    }
}

fn error_message(err: &FetchError, rejected_fallback: &str, transport_prefix: &str) -> String {
    match err {
        FetchError::Rejected(Some(message)) => message.clone(),
        FetchError::Rejected(None) => rejected_fallback.to_string(),
        other => format!("{}: {}", transport_prefix, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::TerminalSurface;

    fn controller() -> ViewController<TerminalSurface> {
        ViewController::new(TerminalSurface::default())
    }

    fn lesson(date: &str, discipline: &str) -> Lesson {
        Lesson {
            date: Some(date.to_string()),
            discipline: Some(discipline.to_string()),
            ..Default::default()
        }
    }

    fn weeks(n: usize) -> Vec<Vec<Lesson>> {
        (0..n).map(|i| vec![lesson("Пн", &format!("week {i}"))]).collect()
    }

    fn loaded(n: usize) -> ViewController<TerminalSurface> {
        let mut c = controller();
        let req = c.submit_search("io21");
        c.schedule_loaded(req.generation, Ok(weeks(n)));
        c
    }

    fn shown_discipline(c: &ViewController<TerminalSurface>) -> String {
        match c.surface().content() {
            View::Schedule { days } => days[0].lessons[0].discipline.clone(),
            other => panic!("expected schedule, got {other:?}"),
        }
    }

    #[test]
    fn search_issues_raw_query_and_uppercases_label() {
        let mut c = controller();
        let req = c.submit_search("  io21 ");
        assert_eq!(req.kind, RequestKind::Schedule { group: "io21".into() });
        assert_eq!(c.current_group(), "IO21");
        assert_eq!(c.phase(), Phase::LoadingSchedule);
        assert!(matches!(c.surface().content(), View::Loading { message } if message.contains("IO21")));
        assert!(c.surface().content_visible());
    }

    #[test]
    fn empty_search_is_not_rejected() {
        let mut c = controller();
        let req = c.submit_search("");
        assert_eq!(req.kind, RequestKind::Schedule { group: String::new() });
    }

    #[test]
    fn end_to_end_schedule() {
        let mut c = controller();
        let req = c.submit_search("io21");
        let body = r#"{"success":true,"schedule":{"weeks":[
            [{"Дата":"Пн","Дисциплина":"Физика"},{"Дата":"Пн","Дисциплина":"Химия"},{"Дата":"Вт"}],
            [{"Дата":"Ср"}]]}}"#;
        let result = crate::api::interpret_schedule(serde_json::from_str(body).unwrap());
        c.schedule_loaded(req.generation, result);

        assert_eq!(c.phase(), Phase::ScheduleShown);
        assert_eq!(c.week_index(), 0);
        let View::Schedule { days } = c.surface().content() else { panic!() };
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].lessons.len(), 2);
        assert_eq!(days[1].title, "● Вт");
        assert!(c.surface().nav_visible());
        assert_eq!(c.surface().nav_buttons(), (false, true));
    }

    #[test]
    fn week_index_stays_in_bounds() {
        let mut c = loaded(3);
        assert!(!c.prev_week(), "prev disabled at 0");
        assert_eq!(c.week_index(), 0);
        assert!(c.next_week());
        assert_eq!(c.surface().nav_buttons(), (true, true));
        assert!(c.next_week());
        assert_eq!(c.surface().nav_buttons(), (true, false));
        assert_eq!(shown_discipline(&c), "week 2");
        assert!(!c.next_week(), "next disabled at N-1");
        assert_eq!(c.week_index(), 2);
        assert!(c.prev_week());
        assert_eq!(shown_discipline(&c), "week 1");
    }

    #[test]
    fn single_week_disables_both_buttons() {
        let c = loaded(1);
        assert_eq!(c.surface().nav_buttons(), (false, false));
    }

    #[test]
    fn empty_weeks_shows_not_found() {
        let mut c = controller();
        let req = c.submit_search("zz99");
        c.schedule_loaded(req.generation, Ok(Vec::new()));
        assert_eq!(c.phase(), Phase::ScheduleEmpty);
        assert!(matches!(c.surface().content(), View::NotFound { lines } if lines[0].contains("ZZ99")));
        assert!(!c.surface().nav_visible());
        assert!(!c.next_week());
    }

    #[test]
    fn empty_week_inside_result_keeps_navigation() {
        let mut c = controller();
        let req = c.submit_search("io21");
        c.schedule_loaded(req.generation, Ok(vec![vec![lesson("Пн", "a")], Vec::new()]));
        assert!(c.next_week());
        assert!(matches!(c.surface().content(), View::NotFound { .. }));
        assert!(c.surface().nav_visible());
        assert!(c.prev_week());
    }

    #[test]
    fn schedule_failures_render_error_with_retry() {
        let cases = [
            (FetchError::Status(500), "Ошибка подключения к серверу: HTTP ошибка: 500"),
            (FetchError::Transport("connection refused".into()), "Ошибка подключения к серверу: connection refused"),
            (FetchError::Rejected(None), SCHEDULE_REJECTED),
            (FetchError::Rejected(Some("Группа не найдена".into())), "Группа не найдена"),
        ];
        for (err, expected) in cases {
            let mut c = controller();
            let req = c.submit_search("io21");
            c.schedule_loaded(req.generation, Err(err));
            assert_eq!(c.phase(), Phase::ScheduleError);
            assert!(matches!(c.surface().content(), View::Error { message } if message == expected));
            assert!(c.surface().content().has_retry());
            assert!(!c.surface().nav_visible());
        }
    }

    #[test]
    fn retry_repeats_identical_search() {
        let mut c = controller();
        let first = c.submit_search(" io21 ");
        c.schedule_loaded(first.generation, Err(FetchError::Status(502)));
        let again = c.retry().unwrap();
        assert_eq!(again.kind, first.kind);
        assert!(again.generation > first.generation);
        assert_eq!(c.phase(), Phase::LoadingSchedule);
    }

    #[test]
    fn retry_outside_error_is_noop() {
        let mut c = loaded(2);
        assert_eq!(c.retry(), None);
        assert_eq!(c.phase(), Phase::ScheduleShown);
    }

    #[test]
    fn weather_toggle_hides_schedule_chrome() {
        let mut c = loaded(5);
        c.next_week();
        let req = c.toggle_weather().unwrap();
        assert_eq!(req.kind, RequestKind::Weather);
        assert_eq!(c.mode(), Mode::Weather);
        assert_eq!(c.phase(), Phase::LoadingWeather);
        assert!(!c.swipe_enabled());
        let s = c.surface();
        assert!(!s.search_visible() && !s.nav_visible());
        assert!(s.weather_title_visible() && s.weather_icon_filled());
        assert!(!c.next_week() && !c.prev_week());
    }

    #[test]
    fn returning_from_weather_does_not_restore_schedule() {
        let mut c = loaded(5);
        c.next_week();
        c.next_week();
        assert_eq!(c.week_index(), 2);
        c.toggle_weather();
        assert_eq!(c.toggle_weather(), None);

        assert_eq!(c.mode(), Mode::Schedule);
        assert_eq!(c.phase(), Phase::Idle);
        let s = c.surface();
        assert_eq!(s.content(), &View::Blank);
        assert!(!s.content_visible() && !s.nav_visible());
        assert!(s.search_visible() && !s.weather_title_visible() && !s.weather_icon_filled());
        assert!(!c.prev_week() && !c.next_week());
        assert_eq!(c.week_count(), 0);
    }

    #[test]
    fn weather_results() {
        let mut c = controller();
        let req = c.toggle_weather().unwrap();
        c.weather_loaded(req.generation, Ok(vec![ForecastDay::default(); 3]));
        assert_eq!(c.phase(), Phase::WeatherShown);
        assert!(matches!(c.surface().content(), View::Weather { days } if days.len() == 3));

        c.toggle_weather();
        let req = c.toggle_weather().unwrap();
        c.weather_loaded(req.generation, Ok(Vec::new()));
        assert_eq!(c.phase(), Phase::WeatherEmpty);
        assert!(matches!(c.surface().content(), View::NotFound { .. }));
    }

    #[test]
    fn end_to_end_weather_error_and_retry() {
        let mut c = controller();
        let req = c.toggle_weather().unwrap();
        let body = r#"{"success":false,"message":"no data"}"#;
        let result = crate::api::interpret_weather(serde_json::from_str(body).unwrap());
        c.weather_loaded(req.generation, result);

        assert_eq!(c.phase(), Phase::WeatherError);
        assert!(matches!(c.surface().content(), View::Error { message } if message == "no data"));
        assert!(c.surface().content().has_retry());

        let again = c.retry().unwrap();
        assert_eq!(again.kind, RequestKind::Weather);
        assert_eq!(c.phase(), Phase::LoadingWeather);
    }

    #[test]
    fn weather_failure_leaves_schedule_state_alone() {
        let mut c = controller();
        let req = c.toggle_weather().unwrap();
        c.weather_loaded(req.generation, Err(FetchError::Transport("timeout".into())));
        assert!(matches!(c.surface().content(), View::Error { message } if message == "Ошибка загрузки погоды: timeout"));
        c.toggle_weather();
        let req = c.submit_search("io21");
        c.schedule_loaded(req.generation, Ok(weeks(2)));
        assert_eq!(c.phase(), Phase::ScheduleShown);
    }

    #[test]
    fn swipes_navigate_in_schedule_mode_only() {
        let mut c = loaded(3);
        assert!(c.swipe(SwipeDirection::Left));
        assert_eq!(c.week_index(), 1);
        assert!(c.swipe(SwipeDirection::Right));
        assert_eq!(c.week_index(), 0);
        assert!(!c.swipe(SwipeDirection::Right));

        c.toggle_weather();
        assert!(!c.swipe(SwipeDirection::Left));
    }

    #[test]
    fn stale_schedule_response_is_dropped() {
        let mut c = controller();
        let first = c.submit_search("aa11");
        let second = c.submit_search("bb22");
        c.schedule_loaded(second.generation, Ok(weeks(2)));
        c.schedule_loaded(first.generation, Ok(weeks(5)));
        assert_eq!(c.week_count(), 2);
        assert_eq!(c.current_group(), "BB22");
    }

    #[test]
    fn forecast_arriving_after_leaving_weather_is_dropped() {
        let mut c = controller();
        let req = c.toggle_weather().unwrap();
        c.toggle_weather();
        c.weather_loaded(req.generation, Ok(vec![ForecastDay::default()]));
        assert_eq!(c.surface().content(), &View::Blank);
        assert_eq!(c.phase(), Phase::Idle);
    }

    #[test]
    fn search_from_weather_mode_restores_search_chrome() {
        let mut c = controller();
        c.toggle_weather();
        let req = c.submit_search("io21");
        assert_eq!(c.mode(), Mode::Schedule);
        assert!(c.swipe_enabled());
        assert!(c.surface().search_visible());
        assert!(!c.surface().weather_icon_filled());
        c.schedule_loaded(req.generation, Ok(weeks(1)));
        assert_eq!(c.phase(), Phase::ScheduleShown);
    }
}
