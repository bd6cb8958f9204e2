// src/output.rs

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use arboard::Clipboard;
use chrono::NaiveDateTime;
use image::RgbaImage;

use crate::error::SnapError;

/// `screenshot_<YYYYMMDD_HHMMSS>.png`, second resolution.
pub fn screenshot_filename(at: NaiveDateTime) -> String {
    format!("screenshot_{}.png", at.format("%Y%m%d_%H%M%S"))
}

/// Creates `dir` if needed and writes `crop` there as PNG. Returns the absolute
/// path of the written file. Same-second collisions overwrite.
pub fn save_crop(crop: &RgbaImage, dir: &Path, at: NaiveDateTime) -> Result<PathBuf, SnapError> {
    std::fs::create_dir_all(dir).map_err(|source| SnapError::DirectoryCreationFailed {
        path: dir.to_path_buf(),
        source,
    })?;
    let dir = std::path::absolute(dir).map_err(|source| SnapError::DirectoryCreationFailed {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(screenshot_filename(at));
    crop.save_with_format(&path, image::ImageFormat::Png)
        .map_err(|source| SnapError::FileWriteFailed { path: path.clone(), source })?;
    Ok(path)
}

/// Receives the saved file's path as text.
pub trait ClipboardSink {
    fn set_text(&self, text: &str) -> Result<(), SnapError>;
}

/// `arboard` clipboard kept alive across sessions. On X11 and Wayland the
/// contents are only served while a `Clipboard` exists, so it is not dropped
/// when a session thread ends.
#[derive(Clone, Default)]
pub struct SharedClipboard {
    inner: Arc<Mutex<Option<Clipboard>>>,
}

impl SharedClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSink for SharedClipboard {
    fn set_text(&self, text: &str) -> Result<(), SnapError> {
        let unavailable = |e: arboard::Error| SnapError::ClipboardUnavailable(e.to_string());
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| SnapError::ClipboardUnavailable("clipboard lock poisoned".into()))?;
        if guard.is_none() {
            *guard = Some(Clipboard::new().map_err(unavailable)?);
        }
        if let Some(clipboard) = guard.as_mut() {
            if let Err(e) = clipboard.set_text(text.to_string()) {
                // 下次重新打开剪贴板
                *guard = None;
                return Err(unavailable(e));
            }
        }
        Ok(())
    }
}
