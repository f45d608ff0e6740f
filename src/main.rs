mod model;
mod api;
mod ui;
mod config;
mod errors;
mod logging;
mod theme;
mod render;
mod html;
mod swipe;
mod controller;
mod surface;

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use api::{Backend, HttpBackend};
use controller::{Mode, Request, RequestKind, ViewController};
use errors::FetchError;
use model::{App, Config, ForecastDay, Lesson};
use surface::TerminalSurface;
use swipe::SwipeTracker;
use theme::{FileStore, ThemeController};

const REFRESH_INTERVAL: Duration = Duration::from_millis(200);

/// Result of a request run on a worker thread, delivered back to the loop.
enum Outcome {
    Schedule(u64, Result<Vec<Vec<Lesson>>, FetchError>),
    Weather(u64, Result<Vec<ForecastDay>, FetchError>),
}

impl App {
    fn new(config: Config) -> Self {
        let theme = ThemeController::init(FileStore::new(&config.theme_file));
        let swipe = SwipeTracker::new(config.swipe_threshold_px);
        Self {
            view: ViewController::new(TerminalSurface::default()),
            theme,
            search_input: String::new(),
            swipe,
            content_area: Rect::default(),
            content_scroll: 0,
            seen_revision: 0,
            in_flight: 0,
            config,
        }
    }

    fn over_content(&self, column: u16, row: u16) -> bool {
        let a = self.content_area;
        column >= a.x && column < a.x + a.width && row >= a.y && row < a.y + a.height
    }

    fn column_px(&self, column: u16) -> f64 {
        f64::from(column) * f64::from(self.config.cell_width_px)
    }

    fn gestures_enabled(&self) -> bool {
        self.view.swipe_enabled() && self.view.mode() == Mode::Schedule
    }

    /// New content starts at its top.
    fn sync_scroll(&mut self) {
        let revision = self.view.surface().revision();
        if revision != self.seen_revision {
            self.seen_revision = revision;
            self.content_scroll = 0;
        }
    }

    // the upper bound depends on the rendered height and is applied when drawing
    fn scroll_by(&mut self, delta: i32) {
        self.sync_scroll();
        let next = i32::from(self.content_scroll) + delta;
        self.content_scroll = next.clamp(0, i32::from(u16::MAX)) as u16;
    }

    fn scroll_home(&mut self) {
        self.sync_scroll();
        self.content_scroll = 0;
    }

    fn scroll_to_end(&mut self) {
        self.sync_scroll();
        self.content_scroll = u16::MAX;
    }
}

// 在线程里执行请求，结果通过通道送回主循环
fn dispatch<B>(app: &mut App, backend: &B, tx: &Sender<Outcome>, request: Request)
where
    B: Backend + Clone + Send + 'static,
{
    let backend = backend.clone();
    let tx = tx.clone();
    app.in_flight += 1;
    thread::spawn(move || {
        let outcome = match request.kind {
            RequestKind::Schedule { group } => {
                Outcome::Schedule(request.generation, backend.fetch_schedule(&group))
            }
            RequestKind::Weather => Outcome::Weather(request.generation, backend.fetch_weather()),
        };
        // the receiver is gone only when the app is shutting down
        let _ = tx.send(outcome);
    });
}

fn drain_outcomes(app: &mut App, rx: &Receiver<Outcome>) {
    while let Ok(outcome) = rx.try_recv() {
        app.in_flight = app.in_flight.saturating_sub(1);
        match outcome {
            Outcome::Schedule(generation, result) => app.view.schedule_loaded(generation, result),
            Outcome::Weather(generation, result) => app.view.weather_loaded(generation, result),
        }
    }
}

/// Returns `false` when the user asked to quit.
fn handle_key<B>(app: &mut App, key: KeyEvent, backend: &B, tx: &Sender<Outcome>) -> bool
where
    B: Backend + Clone + Send + 'static,
{
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let request = match key.code {
        KeyCode::Esc => return false,
        KeyCode::Char('c') if ctrl => return false,
        KeyCode::Char('u') if ctrl => {
            app.search_input.clear();
            None
        }
        KeyCode::Char('r') if ctrl => app.view.retry(),
        KeyCode::F(5) => app.view.retry(),
        KeyCode::F(2) | KeyCode::Tab => app.view.toggle_weather(),
        KeyCode::F(3) => {
            app.theme.toggle();
            None
        }
        KeyCode::Enter => {
            if app.view.surface().search_visible() {
                Some(app.view.submit_search(&app.search_input))
            } else {
                None
            }
        }
        KeyCode::Left | KeyCode::PageUp => {
            app.view.prev_week();
            None
        }
        KeyCode::Right | KeyCode::PageDown => {
            app.view.next_week();
            None
        }
        KeyCode::Up => {
            app.scroll_by(-1);
            None
        }
        KeyCode::Down => {
            app.scroll_by(1);
            None
        }
        KeyCode::Home => {
            app.scroll_home();
            None
        }
        KeyCode::End => {
            app.scroll_to_end();
            None
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            None
        }
        KeyCode::Char(ch) if !ctrl && app.view.surface().search_visible() => {
            app.search_input.push(ch);
            None
        }
        _ => None,
    };
    if let Some(request) = request {
        dispatch(app, backend, tx, request);
    }
    true
}

// 鼠标左键按下/抬起模拟触摸滑动
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let enabled = app.gestures_enabled();
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if app.over_content(mouse.column, mouse.row) => {
            let x = app.column_px(mouse.column);
            app.swipe.touch_start(x, enabled);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let x = app.column_px(mouse.column);
            if let Some(direction) = app.swipe.touch_end(x, enabled) {
                log::debug!("swipe {:?}", direction);
                app.view.swipe(direction);
            }
        }
        _ => {}
    }
}

fn main() -> io::Result<()> {
    let file_cfg = match config::load_yaml_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}, using defaults");
            None
        }
    };
    let config = config::build_config(file_cfg);
    if let Err(e) = logging::init(&config.log_file, config.log_level) {
        eprintln!("logging disabled: {e}");
    }
    log::info!("starting against {}", config.api_base_url);

    let backend = HttpBackend::new(&config.api_base_url, Duration::from_secs(config.request_timeout_secs))
        .map_err(|e| io::Error::other(e.to_string()))?;
    let (tx, rx) = mpsc::channel::<Outcome>();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend_term = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term)?;

    let mut app = App::new(config);
    let mut last_tick = Instant::now();

    loop {
        drain_outcomes(&mut app, &rx);
        terminal.draw(|f| ui::draw(f, &mut app))?;

        let timeout = REFRESH_INTERVAL
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !handle_key(&mut app, key, &backend, &tx) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= REFRESH_INTERVAL {
            last_tick = Instant::now();
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    log::info!("bye");
    Ok(())
}
