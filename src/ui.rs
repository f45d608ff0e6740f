use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use crate::controller::Phase;
use crate::model::App;
use crate::render::{View, ERROR_HEADER, RETRY_LABEL};
use crate::theme::Palette;

const TITLE: &str = "ВВГУ · Расписание";
const WEATHER_TITLE: &str = "Погода во Владивостоке";
const SEARCH_HINT: &str = "Введите группу и нажмите Enter";
const HELP: &str = "Enter поиск · ←/→ недели · ↑/↓ прокрутка · F2 погода · F3 тема · F5 повтор · Ctrl-U очистить · Esc выход";

// 整个界面：标题栏、搜索框、内容区、翻页栏、帮助行
pub fn draw(f: &mut Frame, app: &mut App) {
    let palette = app.theme.palette();
    let base = Style::default().bg(palette.background).fg(palette.foreground);
    f.render_widget(Block::default().style(base), f.size());

    let surface = app.view.surface();
    let nav_height = if surface.nav_visible() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),          // header
            Constraint::Length(3),          // search or weather title
            Constraint::Min(1),             // content
            Constraint::Length(nav_height), // week navigation
            Constraint::Length(1),          // help
        ])
        .split(f.size());

    draw_header(f, chunks[0], app, &palette);
    draw_search(f, chunks[1], app, &palette);
    draw_content(f, chunks[2], app, &palette);
    if nav_height > 0 {
        draw_nav(f, chunks[3], app, &palette);
    }
    f.render_widget(
        Paragraph::new(Span::styled(HELP, Style::default().fg(palette.dim))),
        chunks[4],
    );
    app.content_area = chunks[2];
}

fn draw_header(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let clock = chrono::Local::now().format("%H:%M").to_string();
    let weather_icon = if app.view.surface().weather_icon_filled() { "☔" } else { "☂" };
    let busy = if app.in_flight > 0 { " …" } else { "" };
    let right = format!("{busy} {clock}  {weather_icon}  {} ", app.theme.icon_glyph());
    let width = area.width as usize;
    let pad = width.saturating_sub(TITLE.chars().count() + right.chars().count() + 1);
    let line = Line::from(vec![
        Span::styled(format!(" {TITLE}"), Style::default().fg(app.config.accent_color).add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(pad)),
        Span::styled(right, Style::default().fg(palette.foreground)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_search(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let surface = app.view.surface();
    if surface.weather_title_visible() {
        let title = Paragraph::new(Span::styled(
            WEATHER_TITLE,
            Style::default().fg(app.config.accent_color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(palette.dim)));
        f.render_widget(title, area);
        return;
    }
    if !surface.search_visible() {
        return;
    }
    let text = if app.search_input.is_empty() {
        Line::from(Span::styled(SEARCH_HINT, Style::default().fg(palette.dim)))
    } else {
        Line::from(vec![
            Span::raw(app.search_input.clone()),
            Span::styled("▏", Style::default().fg(app.config.accent_color)),
        ])
    };
    let search = Paragraph::new(text).block(
        Block::default()
            .title(" Группа ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.config.accent_color)),
    );
    f.render_widget(search, area);
}

fn draw_content(f: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    if !app.view.surface().content_visible() {
        return;
    }
    app.sync_scroll();
    let width = area.width as usize;
    let rows: Vec<Line> = content_lines(app, palette)
        .into_iter()
        .flat_map(|line| wrap_line(line, width))
        .collect();
    let max_scroll = rows.len().saturating_sub(area.height as usize);
    app.content_scroll = app.content_scroll.min(u16::try_from(max_scroll).unwrap_or(u16::MAX));

    let para = Paragraph::new(rows).scroll((app.content_scroll, 0));
    f.render_widget(para, area);
}

fn content_lines(app: &App, palette: &Palette) -> Vec<Line<'static>> {
    let surface = app.view.surface();
    let marker = |first: bool| {
        if first {
            Style::default().fg(app.config.first_marker_color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.config.accent_color).add_modifier(Modifier::BOLD)
        }
    };
    let dim = Style::default().fg(palette.dim);
    let mut lines: Vec<Line<'static>> = Vec::new();

    match surface.content() {
        View::Blank => {}
        View::Loading { message } => {
            lines.push(Line::from(""));
            lines.push(Line::from(format!("⏳ {message}")).alignment(Alignment::Center));
        }
        View::Schedule { days } => {
            for day in days {
                lines.push(Line::from(Span::styled(day.title.clone(), marker(day.first))));
                for lesson in &day.lessons {
                    lines.push(Line::from(vec![
                        Span::styled(format!("  {}  ", lesson.time), Style::default().add_modifier(Modifier::BOLD)),
                        Span::raw(lesson.discipline.clone()),
                    ]));
                    lines.push(Line::from(Span::styled(
                        format!("      {} · {} · {}", lesson.room, lesson.teacher, lesson.lesson_type),
                        dim,
                    )));
                }
                lines.push(Line::from(""));
            }
        }
        View::NotFound { lines: notice } => {
            lines.push(Line::from(""));
            for text in notice {
                lines.push(Line::from(text.clone()).alignment(Alignment::Center));
            }
        }
        View::Weather { days } => {
            for day in days {
                lines.push(Line::from(Span::styled(format!("{} {}", day.icon, day.date), marker(day.first))));
                lines.push(Line::from(vec![
                    Span::styled(format!("  {}°C", day.temperature), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(
                        format!("   Скорость ветра: {}   Влажность: {}   Осадки: {}", day.wind, day.humidity, day.precipitation),
                        dim,
                    ),
                ]));
                lines.push(Line::from(""));
            }
        }
        View::Error { message } => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(ERROR_HEADER, Style::default().fg(palette.error).add_modifier(Modifier::BOLD))).alignment(Alignment::Center));
            lines.push(Line::from(message.clone()).alignment(Alignment::Center));
            lines.push(Line::from(""));
        }
    }
    if surface.content().has_retry() {
        lines.push(Line::from(Span::styled(
            format!("[ {RETRY_LABEL} ] F5"),
            Style::default().fg(app.config.accent_color).add_modifier(Modifier::REVERSED),
        )).alignment(Alignment::Center));
    }

    lines
}

// 按宽度硬折行，这样行数就是实际占用的屏幕行数
fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 || line.width() <= width {
        return vec![line];
    }
    let alignment = line.alignment;
    let line_style = line.style;
    let finish = |spans: Vec<Span<'static>>| {
        let mut row = Line::from(spans).style(line_style);
        row.alignment = alignment;
        row
    };

    let mut rows = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;
    for span in line.spans {
        let style = span.style;
        let mut chunk = String::new();
        for ch in span.content.chars() {
            let w = Span::raw(ch.to_string()).width();
            if used > 0 && used + w > width {
                if !chunk.is_empty() {
                    current.push(Span::styled(std::mem::take(&mut chunk), style));
                }
                rows.push(finish(std::mem::take(&mut current)));
                used = 0;
            }
            chunk.push(ch);
            used += w;
        }
        if !chunk.is_empty() {
            current.push(Span::styled(chunk, style));
        }
    }
    if !current.is_empty() {
        rows.push(finish(current));
    }
    rows
}

fn nav_button(label: &str, enabled: bool, palette: &Palette, accent: Color) -> Span<'static> {
    // disabled buttons are dimmed, the terminal analogue of opacity 0.5
    let style = if enabled {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.dim).add_modifier(Modifier::DIM)
    };
    Span::styled(label.to_string(), style)
}

fn draw_nav(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let (prev, next) = app.view.surface().nav_buttons();
    let position = if app.view.phase() == Phase::ScheduleShown {
        format!("  {} · неделя {} из {}  ", app.view.current_group(), app.view.week_index() + 1, app.view.week_count())
    } else {
        "  ".to_string()
    };
    let line = Line::from(vec![
        nav_button("◀ Пред. неделя", prev, palette, app.config.accent_color),
        Span::styled(position, Style::default().fg(palette.dim)),
        nav_button("След. неделя ▶", next, palette, app.config.accent_color),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
