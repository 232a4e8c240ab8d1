use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};
use std::time::Duration;

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "pagescroll";

/// Named font size presets, each mapped to a fixed render scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

impl FontSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }
}

impl std::str::FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(FontSize::Small),
            "medium" => Ok(FontSize::Medium),
            "large" => Ok(FontSize::Large),
            other => Err(format!("unknown font size '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontScales {
    #[serde(default = "default_small_scale")]
    pub small: f32,
    #[serde(default = "default_medium_scale")]
    pub medium: f32,
    #[serde(default = "default_large_scale")]
    pub large: f32,
}

impl FontScales {
    pub fn scale_for(&self, size: FontSize) -> f32 {
        match size {
            FontSize::Small => self.small,
            FontSize::Medium => self.medium,
            FontSize::Large => self.large,
        }
    }
}

impl Default for FontScales {
    fn default() -> Self {
        Self {
            small: default_small_scale(),
            medium: default_medium_scale(),
            large: default_large_scale(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerSettings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_min_scale")]
    pub min_scale: f32,

    #[serde(default = "default_max_scale")]
    pub max_scale: f32,

    #[serde(default = "default_scroll_debounce_ms")]
    pub scroll_debounce_ms: u64,

    #[serde(default = "default_library_poll_attempts")]
    pub library_poll_attempts: u32,

    #[serde(default = "default_library_poll_interval_ms")]
    pub library_poll_interval_ms: u64,

    /// Horizontal room left beside the first page when fitting its width
    #[serde(default = "default_horizontal_padding")]
    pub horizontal_padding: u32,

    /// Padding around the page column inside the scroll container
    #[serde(default = "default_container_padding")]
    pub container_padding: u32,

    /// Vertical gap below each page
    #[serde(default = "default_page_gap")]
    pub page_gap: u32,

    /// Fraction of the viewport height moved by one keyboard scroll step
    #[serde(default = "default_keyboard_scroll_ratio")]
    pub keyboard_scroll_ratio: f64,

    #[serde(default = "default_smooth_scroll_ms")]
    pub smooth_scroll_ms: u64,

    #[serde(default)]
    pub font_scales: FontScales,

    #[serde(default = "default_title")]
    pub default_title: String,

    #[serde(default)]
    pub dark_theme: bool,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_min_scale() -> f32 {
    0.5
}

fn default_max_scale() -> f32 {
    3.0
}

fn default_scroll_debounce_ms() -> u64 {
    100
}

fn default_library_poll_attempts() -> u32 {
    50
}

fn default_library_poll_interval_ms() -> u64 {
    100
}

fn default_horizontal_padding() -> u32 {
    32
}

fn default_container_padding() -> u32 {
    20
}

fn default_page_gap() -> u32 {
    20
}

fn default_keyboard_scroll_ratio() -> f64 {
    0.9
}

fn default_smooth_scroll_ms() -> u64 {
    300
}

fn default_small_scale() -> f32 {
    1.2
}

fn default_medium_scale() -> f32 {
    1.5
}

fn default_large_scale() -> f32 {
    2.0
}

fn default_title() -> String {
    "Untitled document".to_string()
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            min_scale: default_min_scale(),
            max_scale: default_max_scale(),
            scroll_debounce_ms: default_scroll_debounce_ms(),
            library_poll_attempts: default_library_poll_attempts(),
            library_poll_interval_ms: default_library_poll_interval_ms(),
            horizontal_padding: default_horizontal_padding(),
            container_padding: default_container_padding(),
            page_gap: default_page_gap(),
            keyboard_scroll_ratio: default_keyboard_scroll_ratio(),
            smooth_scroll_ms: default_smooth_scroll_ms(),
            font_scales: FontScales::default(),
            default_title: default_title(),
            dark_theme: false,
        }
    }
}

impl ViewerSettings {
    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    pub fn library_poll_interval(&self) -> Duration {
        Duration::from_millis(self.library_poll_interval_ms)
    }

    pub fn smooth_scroll(&self) -> Duration {
        Duration::from_millis(self.smooth_scroll_ms)
    }

    /// Repair bounds that would make every scale change a no-op
    fn sanitize(&mut self) {
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            warn!("Invalid min_scale {}, using default", self.min_scale);
            self.min_scale = default_min_scale();
        }
        if !(self.max_scale.is_finite() && self.max_scale >= self.min_scale) {
            warn!("Invalid max_scale {}, using default", self.max_scale);
            self.max_scale = default_max_scale().max(self.min_scale);
        }
        if !(self.keyboard_scroll_ratio.is_finite() && self.keyboard_scroll_ratio > 0.0) {
            self.keyboard_scroll_ratio = default_keyboard_scroll_ratio();
        }
    }
}

static SETTINGS: LazyLock<RwLock<ViewerSettings>> =
    LazyLock::new(|| RwLock::new(ViewerSettings::default()));

fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

pub fn load_settings() {
    let Some(path) = preferred_config_path() else {
        warn!("Could not determine config directory, using default settings");
        return;
    };

    if path.exists() {
        load_settings_from_path(&path);
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        if let Ok(settings) = SETTINGS.read() {
            save_settings_to_file(&settings, &path);
        }
    }
}

/// Load settings from an explicit file, returning whether they were applied
pub fn load_settings_from_path(path: &Path) -> bool {
    match read_settings_file(path) {
        Some(settings) => {
            if let Ok(mut global) = SETTINGS.write() {
                *global = settings;
            }
            true
        }
        None => false,
    }
}

pub fn read_settings_file(path: &Path) -> Option<ViewerSettings> {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<ViewerSettings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");
                if settings.version < CURRENT_VERSION {
                    info!(
                        "Migrating settings from v{} to v{}",
                        settings.version, CURRENT_VERSION
                    );
                    settings.version = CURRENT_VERSION;
                    save_settings_to_file(&settings, path);
                }
                settings.sanitize();
                Some(settings)
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
                None
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
            None
        }
    }
}

pub fn save_settings_to_file(settings: &ViewerSettings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let body = match serde_yaml::to_string(settings) {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to serialize settings: {e}");
            return;
        }
    };

    match fs::write(path, format!("{SETTINGS_HEADER}{body}")) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

const SETTINGS_HEADER: &str = r#"# ============================================================================
# pagescroll viewer settings
# ============================================================================
# Scales are render multipliers (1.0 = native page size in points).
# Durations are in milliseconds, paddings and gaps in pixels.

"#;

/// Snapshot of the active settings
pub fn current() -> ViewerSettings {
    SETTINGS.read().map(|s| s.clone()).unwrap_or_default()
}

pub fn replace(settings: ViewerSettings) {
    if let Ok(mut global) = SETTINGS.write() {
        *global = settings;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn defaults_match_viewer_constants() {
        let s = ViewerSettings::default();
        assert_eq!(s.min_scale, 0.5);
        assert_eq!(s.max_scale, 3.0);
        assert_eq!(s.scroll_debounce(), Duration::from_millis(100));
        assert_eq!(s.library_poll_attempts, 50);
        assert_eq!(s.horizontal_padding, 32);
        assert_eq!(s.font_scales.scale_for(FontSize::Large), 2.0);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let s: ViewerSettings = serde_yaml::from_str("max_scale: 4.0\nfont_scales:\n  small: 1.1\n")
            .expect("valid yaml");
        assert_eq!(s.max_scale, 4.0);
        assert_eq!(s.min_scale, 0.5);
        assert_eq!(s.font_scales.small, 1.1);
        assert_eq!(s.font_scales.medium, 1.5);
    }

    #[test]
    fn font_size_parses_case_insensitively() {
        assert_eq!("Large".parse::<FontSize>(), Ok(FontSize::Large));
        assert!("huge".parse::<FontSize>().is_err());
    }

    #[test]
    fn save_then_read_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let settings = ViewerSettings {
            page_gap: 8,
            dark_theme: true,
            ..ViewerSettings::default()
        };
        save_settings_to_file(&settings, &path);

        let loaded = read_settings_file(&path).expect("settings written");
        assert_eq!(loaded.page_gap, 8);
        assert!(loaded.dark_theme);
    }

    #[test]
    fn inverted_bounds_are_repaired() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "min_scale: 2.0\nmax_scale: 1.0\n").unwrap();

        let loaded = read_settings_file(&path).unwrap();
        assert_eq!(loaded.min_scale, 2.0);
        assert_eq!(loaded.max_scale, 3.0);
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "min_scale: [not, a, number]\n").unwrap();
        assert!(read_settings_file(&path).is_none());
    }

    #[test]
    #[serial]
    fn load_from_path_replaces_global() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "page_gap: 3\n").unwrap();

        assert!(load_settings_from_path(&path));
        assert_eq!(current().page_gap, 3);

        replace(ViewerSettings::default());
        assert_eq!(current().page_gap, 20);
    }
}
