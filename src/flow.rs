// src/flow.rs
// 截图 → 选区 → 裁剪保存 → 复制路径

use std::path::PathBuf;

use chrono::Local;

use crate::capture::ScreenSource;
use crate::config::Settings;
use crate::error::SnapError;
use crate::output::{save_crop, ClipboardSink};
use crate::window::Selector;

/// One hotkey invocation. Returns the saved file's path, or `None` when the
/// user cancelled. A clipboard failure is logged and does not undo the save.
pub fn run_selection_flow(
    source: &impl ScreenSource,
    selector: &mut impl Selector,
    clipboard: &impl ClipboardSink,
    settings: &Settings,
) -> Result<Option<PathBuf>, SnapError> {
    let frozen = source.capture_all()?;
    let bounds = frozen.bounds();
    log::info!(
        "frozen {}x{} desktop at ({}, {})",
        bounds.width(),
        bounds.height(),
        bounds.min_x,
        bounds.min_y
    );

    let Some(rect) = selector.select(&frozen, settings)? else {
        log::info!("selection cancelled");
        return Ok(None);
    };
    let Some(crop) = frozen.crop(rect) else {
        log::debug!("selection {rect:?} lies outside the frozen image");
        return Ok(None);
    };
    drop(frozen);

    let path = save_crop(&crop, &settings.save_dir, Local::now().naive_local())?;
    log::info!("saved {}", path.display());

    if let Err(e) = clipboard.set_text(&path.to_string_lossy()) {
        log::warn!("{e}; file kept at {}", path.display());
    }
    Ok(Some(path))
}
