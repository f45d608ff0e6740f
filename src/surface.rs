use crate::controller::Surface;
use crate::html;
use crate::render::View;

/// In-memory screen state the terminal UI draws from each frame.
#[derive(Debug)]
pub struct TerminalSurface {
    content: View,
    content_visible: bool,
    nav_visible: bool,
    prev_enabled: bool,
    next_enabled: bool,
    search_visible: bool,
    weather_title_visible: bool,
    weather_icon_filled: bool,
    // bumped on every content replacement
    revision: u64,
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self {
            content: View::Blank,
            content_visible: false,
            nav_visible: false,
            prev_enabled: false,
            next_enabled: false,
            search_visible: true,
            weather_title_visible: false,
            weather_icon_filled: false,
            revision: 0,
        }
    }
}

impl TerminalSurface {
    pub fn content(&self) -> &View { &self.content }
    pub fn content_visible(&self) -> bool { self.content_visible }
    pub fn nav_visible(&self) -> bool { self.nav_visible }
    pub fn nav_buttons(&self) -> (bool, bool) { (self.prev_enabled, self.next_enabled) }
    pub fn search_visible(&self) -> bool { self.search_visible }
    pub fn weather_title_visible(&self) -> bool { self.weather_title_visible }
    pub fn weather_icon_filled(&self) -> bool { self.weather_icon_filled }
    pub fn revision(&self) -> u64 { self.revision }
}

impl Surface for TerminalSurface {
    fn replace_content(&mut self, view: View) {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("container <- {}", html::to_html(&view));
        }
        self.content = view;
        self.revision = self.revision.wrapping_add(1);
    }

    fn set_content_visible(&mut self, visible: bool) {
        self.content_visible = visible;
    }

    fn set_nav_visible(&mut self, visible: bool) {
        self.nav_visible = visible;
    }

    fn set_nav_buttons(&mut self, prev_enabled: bool, next_enabled: bool) {
        self.prev_enabled = prev_enabled;
        self.next_enabled = next_enabled;
    }

    fn set_search_visible(&mut self, visible: bool) {
        self.search_visible = visible;
    }

    fn set_weather_title_visible(&mut self, visible: bool) {
        self.weather_title_visible = visible;
    }

    fn set_weather_icon_filled(&mut self, filled: bool) {
        self.weather_icon_filled = filled;
    }
}
