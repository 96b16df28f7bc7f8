use std::path::PathBuf;

// Active glow color defaults
pub fn default_active_color_red() -> u8 {
    0
}

pub fn default_active_color_green() -> u8 {
    122
}

pub fn default_active_color_blue() -> u8 {
    204
}

// Inactive glow color defaults
pub fn default_inactive_color_red() -> u8 {
    64
}

pub fn default_inactive_color_green() -> u8 {
    64
}

pub fn default_inactive_color_blue() -> u8 {
    64
}

// Geometry defaults (logical units)
pub fn default_glow_size() -> f64 {
    9.0
}

pub fn default_edge_size() -> f64 {
    20.0
}

// Settings directory default
pub fn default_config_dir() -> PathBuf {
    // Prefer a user home directory.
    if let Ok(home_dir) = std::env::var("USERPROFILE") {
        return PathBuf::from(home_dir);
    }
    if let Ok(home_dir) = std::env::var("HOME") {
        return PathBuf::from(home_dir);
    }

    // Fallback: program directory.
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.to_path_buf();
    }

    // Last resort: cwd.
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
