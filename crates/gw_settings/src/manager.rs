use std::sync::{Arc, RwLock};

use crate::{ChromeMode, ChromeSettings};

/// Unified config manager.
pub struct ConfigManager {
    settings: Arc<RwLock<ChromeSettings>>,
}

impl ConfigManager {
    /// Create a new config manager (loads settings once and caches them).
    pub fn new() -> Self {
        Self::with_settings(ChromeSettings::load())
    }

    pub fn with_settings(settings: ChromeSettings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Get a snapshot copy of current settings.
    pub fn get(&self) -> ChromeSettings {
        self.settings
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|_| ChromeSettings::default())
    }

    /// Get the shared settings reference.
    pub fn get_shared(&self) -> Arc<RwLock<ChromeSettings>> {
        Arc::clone(&self.settings)
    }

    /// Reload settings from disk.
    pub fn reload(&mut self) {
        let new_settings = ChromeSettings::load();
        if let Ok(mut guard) = self.settings.write() {
            *guard = new_settings;
        }
    }

    /// Replace the cached settings (not persisted).
    pub fn replace(&self, settings: ChromeSettings) {
        if let Ok(mut guard) = self.settings.write() {
            *guard = settings.sanitized();
        }
    }

    // Convenience accessors.

    #[inline]
    pub fn active_color(&self) -> (u8, u8, u8) {
        self.get().active_color()
    }

    #[inline]
    pub fn inactive_color(&self) -> (u8, u8, u8) {
        self.get().inactive_color()
    }

    #[inline]
    pub fn chrome_mode(&self) -> ChromeMode {
        self.get().chrome_mode
    }

    #[inline]
    pub fn glow_size(&self) -> f64 {
        self.get().glow_size
    }

    #[inline]
    pub fn edge_size(&self) -> f64 {
        self.get().edge_size
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
