// src/config.rs
// 运行时设置：默认值 + 环境变量覆盖，不做持久化

use std::path::PathBuf;

use crate::overlay::{DEFAULT_ACCENT, DEFAULT_BORDER_WIDTH, DEFAULT_DIM_ALPHA};

pub const DEFAULT_HOTKEY: &str = "ctrl+alt+s";
pub const DEFAULT_QUIT_HOTKEY: &str = "ctrl+alt+q";
pub const DEFAULT_MIN_DRAG: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub hotkey: String,
    pub quit_hotkey: String,
    pub save_dir: PathBuf,
    pub dim_alpha: u8,
    /// Gestures moving this many pixels or fewer on either axis select nothing.
    pub min_drag: u32,
    pub accent: u32,
    pub border_width: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            hotkey: DEFAULT_HOTKEY.to_string(),
            quit_hotkey: DEFAULT_QUIT_HOTKEY.to_string(),
            save_dir: default_save_dir(),
            dim_alpha: DEFAULT_DIM_ALPHA,
            min_drag: DEFAULT_MIN_DRAG,
            accent: DEFAULT_ACCENT,
            border_width: DEFAULT_BORDER_WIDTH,
        }
    }
}

/// `<pictures>/SnapPath`, falling back to `~/Pictures/SnapPath`.
pub fn default_save_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("Pictures"))
        .join("SnapPath")
}

impl Settings {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `SNAPPATH_*` overrides read through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("SNAPPATH_HOTKEY") {
            self.hotkey = v;
        }
        if let Some(v) = lookup("SNAPPATH_QUIT_HOTKEY") {
            self.quit_hotkey = v;
        }
        if let Some(v) = lookup("SNAPPATH_DIR") {
            self.save_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("SNAPPATH_DIM_ALPHA") {
            match v.trim().parse::<u8>() {
                Ok(alpha) => self.dim_alpha = alpha,
                Err(e) => log::warn!("ignoring SNAPPATH_DIM_ALPHA={v:?}: {e}"),
            }
        }
        self
    }
}
