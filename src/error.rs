// src/error.rs

use std::path::PathBuf;

/// 一次截图调用中可能出现的错误。所有错误都只影响当次调用。
#[derive(Debug, thiserror::Error)]
pub enum SnapError {
    #[error("screen capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("no displays reported by the platform")]
    DisplayEnumerationEmpty,

    #[error("failed to create output directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    #[error("overlay window failed: {0}")]
    Overlay(String),

    #[error("hotkey registration failed: {0}")]
    Hotkey(String),
}
