//! TOML-based configuration for AirKeys.
//!
//! Reads and writes [`AppConfig`] from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\AirKeys\config.toml`
//! - Linux:    `~/.config/airkeys/config.toml` (or `$XDG_CONFIG_HOME/airkeys`)
//! - macOS:    `~/Library/Application Support/AirKeys/config.toml`
//!
//! An explicit path can be given instead with `--config`.
//!
//! # Example
//!
//! ```toml
//! [app]
//! log_level = "debug"
//! output_path = "notes.txt"
//!
//! [pinch]
//! sensitivity = 25.0
//! click_delay_ms = 400
//!
//! [layout]
//! default_layout = "numeric"
//!
//! [[layout.custom]]
//! id = "arrows"
//! name = "ARROWS"
//! rows = [["Up"], ["Left", "Down", "Right"]]
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "...")]`, so a missing file, a
//! missing section, or a missing key all fall back to the built-in
//! defaults.  An empty file is a valid configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use airkeys_core::{
    GridMetrics, Layout, LayoutError, LayoutId, LayoutRegistry, PinchConfig, TwoHandConfig,
};

use crate::application::interaction_loop::LoopConfig;
use crate::application::render_state::DisplaySettings;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub app: GeneralConfig,
    #[serde(default)]
    pub pinch: PinchSection,
    #[serde(default)]
    pub two_hand: TwoHandSection,
    #[serde(default)]
    pub layout: LayoutSection,
    #[serde(default)]
    pub capture: CaptureSection,
}

/// General behaviour and display settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Where `save` writes the text buffer.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// Number of wrapped buffer lines shown.
    #[serde(default = "default_display_lines")]
    pub display_lines: usize,
    /// Character width used for wrapping the buffer.
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,
    #[serde(default = "default_true")]
    pub show_distance: bool,
    #[serde(default = "default_true")]
    pub show_landmarks: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
}

/// Pinch-click tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PinchSection {
    /// Fingertip distance in pixels below which a pinch counts as a click.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Minimum time between two accepted clicks.
    #[serde(default = "default_click_delay_ms")]
    pub click_delay_ms: u64,
}

/// Two-hand gesture tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TwoHandSection {
    #[serde(default = "default_advisory_distance")]
    pub advisory_distance: f32,
    #[serde(default = "default_switch_distance")]
    pub switch_distance: f32,
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

/// Layout selection, key placement, and user-defined layouts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutSection {
    #[serde(default = "default_layout")]
    pub default_layout: String,
    #[serde(default = "default_origin")]
    pub origin_x: f32,
    #[serde(default = "default_origin")]
    pub origin_y: f32,
    #[serde(default = "default_column_gap")]
    pub column_gap: f32,
    #[serde(default = "default_row_pitch")]
    pub row_pitch: f32,
    /// Appended to the cycle after the built-in layouts, in file order.
    #[serde(default)]
    pub custom: Vec<CustomLayoutEntry>,
}

/// A user-defined layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomLayoutEntry {
    pub id: String,
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Capture geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureSection {
    /// Flip hands horizontally so the view behaves like a mirror.
    #[serde(default = "default_true")]
    pub mirror: bool,
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,
    #[serde(default = "default_frame_height")]
    pub frame_height: u32,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_output_path() -> PathBuf {
    PathBuf::from("keyboard_output.txt")
}
fn default_display_lines() -> usize {
    2
}
fn default_wrap_width() -> usize {
    50
}
fn default_true() -> bool {
    true
}
fn default_theme() -> String {
    "dark".to_string()
}
fn default_sensitivity() -> f32 {
    30.0
}
fn default_click_delay_ms() -> u64 {
    300
}
fn default_advisory_distance() -> f32 {
    200.0
}
fn default_switch_distance() -> f32 {
    100.0
}
fn default_cooldown_ms() -> u64 {
    2000
}
fn default_layout() -> String {
    "qwerty".to_string()
}
fn default_origin() -> f32 {
    50.0
}
fn default_column_gap() -> f32 {
    15.0
}
fn default_row_pitch() -> f32 {
    100.0
}
fn default_frame_width() -> u32 {
    1280
}
fn default_frame_height() -> u32 {
    720
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output_path: default_output_path(),
            display_lines: default_display_lines(),
            wrap_width: default_wrap_width(),
            show_distance: default_true(),
            show_landmarks: default_true(),
            theme: default_theme(),
        }
    }
}

impl Default for PinchSection {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            click_delay_ms: default_click_delay_ms(),
        }
    }
}

impl Default for TwoHandSection {
    fn default() -> Self {
        Self {
            advisory_distance: default_advisory_distance(),
            switch_distance: default_switch_distance(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            default_layout: default_layout(),
            origin_x: default_origin(),
            origin_y: default_origin(),
            column_gap: default_column_gap(),
            row_pitch: default_row_pitch(),
            custom: Vec::new(),
        }
    }
}

impl Default for CaptureSection {
    fn default() -> Self {
        Self {
            mirror: default_true(),
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
        }
    }
}

// ── Conversions into runtime types ────────────────────────────────────────────

impl AppConfig {
    pub fn pinch_config(&self) -> PinchConfig {
        PinchConfig {
            sensitivity: self.pinch.sensitivity,
            click_delay: Duration::from_millis(self.pinch.click_delay_ms),
        }
    }

    pub fn two_hand_config(&self) -> TwoHandConfig {
        TwoHandConfig {
            advisory_distance: self.two_hand.advisory_distance,
            switch_distance: self.two_hand.switch_distance,
            cooldown: Duration::from_millis(self.two_hand.cooldown_ms),
        }
    }

    pub fn grid_metrics(&self) -> GridMetrics {
        GridMetrics {
            origin_x: self.layout.origin_x,
            origin_y: self.layout.origin_y,
            column_gap: self.layout.column_gap,
            row_pitch: self.layout.row_pitch,
        }
    }

    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            display_lines: self.app.display_lines,
            wrap_width: self.app.wrap_width,
            show_distance: self.app.show_distance,
            show_landmarks: self.app.show_landmarks,
            theme: self.app.theme.clone(),
        }
    }

    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            pinch: self.pinch_config(),
            two_hand: self.two_hand_config(),
            display: self.display_settings(),
        }
    }

    pub fn default_layout_id(&self) -> LayoutId {
        LayoutId::new(self.layout.default_layout.as_str())
    }

    /// Builds the registry: built-in layouts first, then the custom ones.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayoutError`] raised while registering a custom
    /// layout (duplicate id, empty layout, or empty label).
    pub fn build_registry(&self) -> Result<LayoutRegistry, LayoutError> {
        let mut registry = LayoutRegistry::with_builtin(self.grid_metrics());
        for entry in &self.layout.custom {
            registry.register(Layout {
                id: LayoutId::new(entry.id.as_str()),
                name: entry.name.clone(),
                rows: entry.rows.clone(),
            })?;
        }
        Ok(registry)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from `path`, returning defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            debug!(path = %path.display(), "config loaded");
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            Ok(AppConfig::default())
        }
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config directory, including the `airkeys` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("AirKeys"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("airkeys"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("AirKeys"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
