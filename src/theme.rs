use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use ratatui::style::Color;
use crate::errors::StoreError;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePreference {
    Light,
    Dark,
}

impl ThemePreference {
    /// Only the exact string `"dark"` selects the dark theme.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => ThemePreference::Dark,
            _ => ThemePreference::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }
}

/// Durable key-value storage for user preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Flat JSON object on disk. A missing or unreadable file reads as empty.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> BTreeMap<String, String> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.load();
        map.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&map)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with(key: &str, value: &str) -> Self {
        let mut values = BTreeMap::new();
        values.insert(key.to_string(), value.to_string());
        Self { values }
    }
}

#[cfg(test)]
impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Colors the terminal UI draws with for a given theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub dim: Color,
    pub error: Color,
}

pub struct ThemeController<S: PreferenceStore> {
    store: S,
    current: ThemePreference,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Reads the stored preference once.
    pub fn init(store: S) -> Self {
        let stored = store.get(THEME_KEY);
        let current = ThemePreference::from_stored(stored.as_deref());
        log::debug!("theme on startup: {} (stored {:?})", current.as_str(), stored);
        Self { store, current }
    }

    /// Flips the theme and writes it through immediately. The visual state
    /// flips even if the write fails.
    pub fn toggle(&mut self) -> ThemePreference {
        self.current = self.current.toggled();
        if let Err(e) = self.store.set(THEME_KEY, self.current.as_str()) {
            log::warn!("failed to persist theme {}: {}", self.current.as_str(), e);
        } else {
            log::info!("theme set to {}", self.current.as_str());
        }
        self.current
    }

    pub fn is_dark(&self) -> bool {
        self.current == ThemePreference::Dark
    }

    pub fn icon_class(&self) -> &'static str {
        if self.is_dark() { "bi-moon-fill" } else { "bi-moon" }
    }

    pub fn icon_glyph(&self) -> &'static str {
        match self.icon_class() {
            "bi-moon-fill" => "●",
            _ => "○",
        }
    }

    pub fn palette(&self) -> Palette {
        match self.current {
            ThemePreference::Dark => Palette {
                background: Color::Rgb(24, 26, 32),
                foreground: Color::Rgb(220, 222, 228),
                dim: Color::DarkGray,
                error: Color::LightRed,
            },
            ThemePreference::Light => Palette {
                background: Color::Rgb(246, 246, 242),
                foreground: Color::Rgb(30, 30, 30),
                dim: Color::Gray,
                error: Color::Red,
            },
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_with(value: Option<&str>) -> ThemeController<MemoryStore> {
        let store = match value {
            Some(v) => MemoryStore::with(THEME_KEY, v),
            None => MemoryStore::default(),
        };
        ThemeController::init(store)
    }

    #[test]
    fn only_exact_dark_starts_dark() {
        for (stored, dark) in [
            (Some("dark"), true),
            (Some("light"), false),
            (None, false),
            (Some("Dark"), false),
            (Some("{garbage"), false),
            (Some(""), false),
        ] {
            let theme = init_with(stored);
            assert_eq!(theme.is_dark(), dark, "stored {stored:?}");
            assert_eq!(theme.icon_glyph(), if dark { "●" } else { "○" });
            assert_eq!(theme.icon_class(), if dark { "bi-moon-fill" } else { "bi-moon" });
        }
    }

    #[test]
    fn toggle_persists_immediately() {
        let mut theme = init_with(None);
        assert_eq!(theme.toggle(), ThemePreference::Dark);
        assert_eq!(theme.store().get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(theme.icon_class(), "bi-moon-fill");
        assert_eq!(theme.toggle(), ThemePreference::Light);
        assert_eq!(theme.store().get(THEME_KEY).as_deref(), Some("light"));
        assert_eq!(theme.icon_class(), "bi-moon");
    }

    #[test]
    fn double_toggle_restores_state_and_value() {
        for stored in ["light", "dark"] {
            let mut theme = init_with(Some(stored));
            let before = theme.is_dark();
            theme.toggle();
            theme.toggle();
            assert_eq!(theme.is_dark(), before);
            assert_eq!(theme.store().get(THEME_KEY).as_deref(), Some(stored));
        }
    }

    #[test]
    fn file_store_round_trips_and_tolerates_garbage() {
        let path = std::env::temp_dir().join(format!("vvsule-prefs-{}.json", std::process::id()));
        fs::write(&path, "not json").unwrap();
        let mut store = FileStore::new(&path);
        assert_eq!(store.get(THEME_KEY), None);

        store.set(THEME_KEY, "dark").unwrap();
        let theme = ThemeController::init(FileStore::new(&path));
        assert!(theme.is_dark());
        fs::remove_file(&path).unwrap();
    }
}
