use crate::gesture::GestureConfig;
use crate::overlay::OverlayConfig;
use crate::projection::Pose;
use crate::source::browser::{BrowserOptions, MOBILE_USER_AGENT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const SETTINGS_FILE: &str = "settings.json";
const APP_DIR: &str = "xr-window-manager";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Log file location. Defaults to `debug.log` in the local data dir.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Pixels a touch must travel from its anchor before moves are sent.
    #[serde(default = "default_start_deadzone")]
    pub start_deadzone_px: f32,
    /// Pixels a touch must travel from the last sent move.
    #[serde(default = "default_move_deadzone")]
    pub move_deadzone_px: f32,
    /// Overlay window width in metres.
    #[serde(default = "default_panel_width")]
    pub panel_width: f32,
    /// Height over width of browser panels before the first paint.
    #[serde(default = "default_aspect")]
    pub default_aspect: f32,
    /// Distance in metres at which new overlays spawn.
    #[serde(default = "default_spawn_distance")]
    pub spawn_distance: f32,
    #[serde(default = "default_press_volume_offset")]
    pub press_volume_offset: f32,
    #[serde(default = "default_press_volume_depth")]
    pub press_volume_depth: f32,
    #[serde(default = "default_user_agent")]
    pub browser_user_agent: String,
    #[serde(default)]
    pub browser_cache_dir: Option<String>,
    /// Initial state of the "show helper panel" toggle.
    #[serde(default)]
    pub show_helper_panel: bool,
    /// Scale of the flat desktop preview.
    #[serde(default = "default_pixels_per_meter")]
    pub preview_pixels_per_meter: f32,
}

fn default_start_deadzone() -> f32 {
    6.0
}

fn default_move_deadzone() -> f32 {
    1.0
}

fn default_panel_width() -> f32 {
    0.6
}

fn default_aspect() -> f32 {
    9.0 / 16.0
}

fn default_spawn_distance() -> f32 {
    0.5
}

fn default_press_volume_offset() -> f32 {
    0.01
}

fn default_press_volume_depth() -> f32 {
    0.03
}

fn default_user_agent() -> String {
    MOBILE_USER_AGENT.to_string()
}

fn default_pixels_per_meter() -> f32 {
    1000.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            start_deadzone_px: default_start_deadzone(),
            move_deadzone_px: default_move_deadzone(),
            panel_width: default_panel_width(),
            default_aspect: default_aspect(),
            spawn_distance: default_spawn_distance(),
            press_volume_offset: default_press_volume_offset(),
            press_volume_depth: default_press_volume_depth(),
            browser_user_agent: default_user_agent(),
            browser_cache_dir: None,
            show_helper_panel: false,
            preview_pixels_per_meter: default_pixels_per_meter(),
        }
    }
}

/// Per-user directory holding the log file and browser cache.
pub fn data_dir() -> PathBuf {
    dirs_next::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

fn positive_or(value: f32, fallback: f32, name: &str) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::warn!("{name} must be positive, got {value}; using {fallback}");
        fallback
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn log_file_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) => PathBuf::from(path),
            None => data_dir().join("debug.log"),
        }
    }

    pub fn gesture_config(&self) -> GestureConfig {
        let defaults = GestureConfig::default();
        let start = positive_or(
            self.start_deadzone_px,
            defaults.start_deadzone_px,
            "start_deadzone_px",
        );
        let moving = positive_or(
            self.move_deadzone_px,
            defaults.move_deadzone_px,
            "move_deadzone_px",
        );
        if start <= moving {
            tracing::warn!(
                "start_deadzone_px ({start}) must exceed move_deadzone_px ({moving}); using defaults"
            );
            return defaults;
        }
        GestureConfig {
            start_deadzone_px: start,
            move_deadzone_px: moving,
        }
    }

    pub fn overlay_config(&self) -> OverlayConfig {
        let defaults = OverlayConfig::default();
        OverlayConfig {
            panel_width: positive_or(self.panel_width, defaults.panel_width, "panel_width"),
            default_aspect: positive_or(
                self.default_aspect,
                defaults.default_aspect,
                "default_aspect",
            ),
            press_volume_offset: self.press_volume_offset,
            press_volume_depth: self.press_volume_depth.max(0.0),
        }
    }

    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            user_agent: self.browser_user_agent.clone(),
            cache_dir: Some(
                self.browser_cache_dir
                    .as_ref()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| data_dir().join("cache")),
            ),
            popups_in_place: true,
        }
    }

    pub fn spawn_pose(&self) -> Pose {
        Pose::in_front(positive_or(
            self.spawn_distance,
            default_spawn_distance(),
            "spawn_distance",
        ))
    }
}
