//! HTML serialization of [`View`], matching the markup the schedule page
//! styles (`.day`, `.lesson`, `.weather-day`, `.error`, ...).

use std::fmt::Write;
use crate::render::{View, ERROR_HEADER, RETRY_LABEL};

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn first_class(first: bool) -> &'static str {
    if first { " first" } else { "" }
}

/// Container contents for a view. Writing into a `String` cannot fail,
/// so the `fmt::Result`s are discarded.
pub fn to_html(view: &View) -> String {
    let mut html = String::new();
    match view {
        View::Blank => {}
        View::Loading { message } => {
            let _ = write!(
                html,
                "<div class=\"loading\"><div class=\"spinner\"></div><p class=\"loading-message\">{}</p></div>",
                escape(message)
            );
        }
        View::Schedule { days } => {
            for day in days {
                let mark = first_class(day.first);
                let _ = write!(
                    html,
                    "<div class=\"day{mark}\"><div class=\"day-title{mark}\">{}</div>",
                    escape(&day.title)
                );
                for lesson in &day.lessons {
                    let _ = write!(
                        html,
                        "<div class=\"lesson\">\
                         <div class=\"time\">{}</div>\
                         <div class=\"name\">{}</div>\
                         <div class=\"place\">{}</div>\
                         <div class=\"teacher\">{}</div>\
                         <div class=\"type\">{}</div>\
                         </div>",
                        escape(&lesson.time),
                        escape(&lesson.discipline),
                        escape(&lesson.room),
                        escape(&lesson.teacher),
                        escape(&lesson.lesson_type),
                    );
                }
                html.push_str("</div>");
            }
        }
        View::NotFound { lines } => {
            html.push_str("<div class=\"no-schedule\">");
            for line in lines {
                let _ = write!(html, "<p class=\"no-schedule-message\">{}</p>", escape(line));
            }
            html.push_str("</div>");
        }
        View::Weather { days } => {
            for day in days {
                let _ = write!(
                    html,
                    "<div class=\"weather-day\">\
                     <div class=\"weather-header{}\">\
                     <span class=\"weather-icon\">{}</span>\
                     <span class=\"weather-date\">{}</span>\
                     </div>\
                     <div class=\"weather-content\">\
                     <div class=\"weather-temp-container\"><div class=\"weather-temp\">\
                     <span class=\"temp-value\">{}</span><span class=\"temp-unit\">°C</span>\
                     </div></div>\
                     <div class=\"weather-details\">\
                     <div class=\"weather-detail\"><span class=\"detail-label\">Скорость ветра:</span><span class=\"detail-value\">{}</span></div>\
                     <div class=\"weather-detail\"><span class=\"detail-label\">Влажность:</span><span class=\"detail-value\">{}</span></div>\
                     <div class=\"weather-detail\"><span class=\"detail-label\">Осадки:</span><span class=\"detail-value\">{}</span></div>\
                     </div></div></div>",
                    first_class(day.first),
                    escape(&day.icon),
                    escape(&day.date),
                    escape(&day.temperature),
                    escape(&day.wind),
                    escape(&day.humidity),
                    escape(&day.precipitation),
                );
            }
        }
        View::Error { message } => {
            let _ = write!(
                html,
                "<div class=\"error\"><p>{}</p><p>{}</p><button class=\"retry-btn\">{}</button></div>",
                ERROR_HEADER,
                escape(message),
                RETRY_LABEL
            );
        }
    }
    html
}
