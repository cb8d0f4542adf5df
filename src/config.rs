use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::notification::Position;
use crate::overlay::OverlaySize;

/// RGB color represented as a 3-element array.
pub type Rgb = [u8; 3];

/// Overlay defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Time between close() and detachment, in milliseconds
    pub exit_delay_ms: u64,
    /// Default panel size: "sm", "md", "lg", "xl" or "full"
    pub size: OverlaySize,
    /// Close when the backdrop is clicked
    pub close_on_backdrop: bool,
    /// Show the close affordance in the header
    pub show_close_button: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            exit_delay_ms: 300,
            size: OverlaySize::Md,
            close_on_backdrop: true,
            show_close_button: true,
        }
    }
}

impl OverlayConfig {
    pub fn exit_delay(&self) -> Duration {
        Duration::from_millis(self.exit_delay_ms)
    }
}

/// Notification defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Display time in milliseconds (0 = until dismissed)
    pub duration_ms: u64,
    /// Container placement, e.g. "top-right" or "bottom-center"
    pub position: Position,
    /// Show a close affordance on each notification
    pub dismissible: bool,
    /// Show the category icon
    pub icon: bool,
    /// Time between closing and removal, in milliseconds
    pub exit_delay_ms: u64,
    /// Maximum live notifications (0 = unlimited)
    pub max_visible: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 3000,
            position: Position::TopRight,
            dismissible: true,
            icon: true,
            exit_delay_ms: 300,
            max_visible: 5,
        }
    }
}

impl NotificationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn exit_delay(&self) -> Duration {
        Duration::from_millis(self.exit_delay_ms)
    }
}

/// Behavior configuration for the demo event loop.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Idle polling interval in milliseconds
    pub idle_poll_ms: u64,
    /// Number of lines to scroll with Page Up/Down
    pub scroll_page_size: usize,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            idle_poll_ms: 50,
            scroll_page_size: 10,
        }
    }
}

/// Theme configuration for overlays and notifications.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    // Overlay colors
    /// Dimmed backdrop behind an overlay
    pub backdrop: Rgb,
    /// Overlay panel background
    pub panel_bg: Rgb,
    /// Overlay panel border
    pub panel_border: Rgb,
    /// Overlay title text
    pub title_fg: Rgb,
    /// Overlay body text
    pub body_fg: Rgb,

    // Button colors
    /// Primary button
    pub button_primary: Rgb,
    /// Secondary button
    pub button_secondary: Rgb,
    /// Danger button
    pub button_danger: Rgb,

    // Notification colors
    /// Success notification accent
    pub success: Rgb,
    /// Error notification accent
    pub error: Rgb,
    /// Warning notification accent
    pub warning: Rgb,
    /// Info notification accent
    pub info: Rgb,
    /// Notification background
    pub toast_bg: Rgb,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            // Overlay colors
            backdrop: [10, 10, 15],
            panel_bg: [25, 25, 35],
            panel_border: [80, 80, 100],
            title_fg: [0, 255, 255], // Cyan
            body_fg: [220, 220, 230],

            // Button colors
            button_primary: [59, 130, 246],   // Blue
            button_secondary: [140, 140, 160],
            button_danger: [255, 100, 100],

            // Notification colors
            success: [100, 255, 100],
            error: [255, 100, 100],
            warning: [255, 200, 0],
            info: [0, 255, 255],
            toast_bg: [0, 0, 0],
        }
    }
}

impl ThemeConfig {
    /// Convert an RGB array to a ratatui Color.
    pub fn to_color(rgb: &Rgb) -> ratatui::style::Color {
        ratatui::style::Color::Rgb(rgb[0], rgb[1], rgb[2])
    }
}

/// Main configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub overlay: OverlayConfig,
    pub notification: NotificationConfig,
    pub behavior: BehaviorConfig,
    pub theme: ThemeConfig,
}

impl Config {
    /// Returns the default config file path: ~/.config/overlay-kit/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("overlay-kit").join("config.toml"))
    }

    /// Load configuration from the default path, falling back to defaults.
    pub fn load() -> Self {
        Self::default_path()
            .and_then(|path| match Self::load_from_path(&path) {
                Ok(config) => Some(config),
                Err(err) => {
                    tracing::debug!(path = %path.display(), %err, "using default config");
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::default_path() {
            self.save_to_path(&path)
        } else {
            Err(anyhow::anyhow!("Could not determine config directory"))
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
