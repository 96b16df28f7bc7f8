use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults::*;

/// Visual theme the glow layer renders for.
///
/// Only the identifier lives here; what each mode looks like is up to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChromeMode {
    #[default]
    VisualStudio2013,
    Office2013,
}

/// Glow chrome settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromeSettings {
    // Active glow color
    #[serde(default = "default_active_color_red")]
    pub active_color_red: u8,
    #[serde(default = "default_active_color_green")]
    pub active_color_green: u8,
    #[serde(default = "default_active_color_blue")]
    pub active_color_blue: u8,

    // Inactive glow color
    #[serde(default = "default_inactive_color_red")]
    pub inactive_color_red: u8,
    #[serde(default = "default_inactive_color_green")]
    pub inactive_color_green: u8,
    #[serde(default = "default_inactive_color_blue")]
    pub inactive_color_blue: u8,

    #[serde(default)]
    pub chrome_mode: ChromeMode,

    /// Decoration thickness in logical units.
    #[serde(default = "default_glow_size")]
    pub glow_size: f64,
    /// Length of the diagonal resize zone at each corner, in logical units.
    #[serde(default = "default_edge_size")]
    pub edge_size: f64,
}

impl Default for ChromeSettings {
    fn default() -> Self {
        Self {
            active_color_red: default_active_color_red(),
            active_color_green: default_active_color_green(),
            active_color_blue: default_active_color_blue(),

            inactive_color_red: default_inactive_color_red(),
            inactive_color_green: default_inactive_color_green(),
            inactive_color_blue: default_inactive_color_blue(),

            chrome_mode: ChromeMode::default(),

            glow_size: default_glow_size(),
            edge_size: default_edge_size(),
        }
    }
}

impl ChromeSettings {
    fn settings_dir() -> PathBuf {
        default_config_dir().join(".glow_chrome")
    }

    pub fn primary_settings_path() -> PathBuf {
        Self::settings_dir().join("chrome_settings.json")
    }

    /// Load settings from the default location.
    ///
    /// Falls back to defaults (and persists them) if loading fails.
    pub fn load() -> Self {
        let path = Self::primary_settings_path();
        if let Some(settings) = Self::load_from(&path) {
            return settings;
        }

        let default_settings = Self::default();
        if let Err(e) = default_settings.save() {
            log::warn!("failed to persist default chrome settings: {e}");
        }
        default_settings
    }

    /// Load and sanitize settings from `path`; `None` if missing or unreadable.
    pub fn load_from(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str::<ChromeSettings>(&content) {
            Ok(settings) => Some(settings.sanitized()),
            Err(e) => {
                log::warn!("ignoring invalid chrome settings at {}: {e}", path.display());
                None
            }
        }
    }

    /// Save settings to the default location.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::primary_settings_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Replace non-finite or negative sizes with their defaults.
    pub fn sanitized(mut self) -> Self {
        if !self.glow_size.is_finite() || self.glow_size < 0.0 {
            self.glow_size = default_glow_size();
        }
        if !self.edge_size.is_finite() || self.edge_size < 0.0 {
            self.edge_size = default_edge_size();
        }
        self
    }

    pub fn active_color(&self) -> (u8, u8, u8) {
        (
            self.active_color_red,
            self.active_color_green,
            self.active_color_blue,
        )
    }

    pub fn inactive_color(&self) -> (u8, u8, u8) {
        (
            self.inactive_color_red,
            self.inactive_color_green,
            self.inactive_color_blue,
        )
    }

    pub fn set_active_color(&mut self, (r, g, b): (u8, u8, u8)) {
        self.active_color_red = r;
        self.active_color_green = g;
        self.active_color_blue = b;
    }

    pub fn set_inactive_color(&mut self, (r, g, b): (u8, u8, u8)) {
        self.inactive_color_red = r;
        self.inactive_color_green = g;
        self.inactive_color_blue = b;
    }
}
