// src/capture.rs

use std::sync::Arc;
use std::time::Instant;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use xcap::Monitor;

use crate::error::SnapError;
use crate::geometry::{compute_bounding_box, MonitorRect, SelectionRect, VirtualBounds};

/// 按下快捷键那一刻的整个虚拟桌面截图。只读，只会被裁剪。
///
/// `bounds` is in desktop coordinates as the platform reports them; `pixels`
/// is the native capture, which is `scale` times larger on HiDPI displays.
#[derive(Debug, Clone)]
pub struct FrozenImage {
    bounds: VirtualBounds,
    scale: f64,
    pixels: Arc<RgbaImage>,
}

impl FrozenImage {
    pub fn new(bounds: VirtualBounds, pixels: RgbaImage) -> Self {
        let scale = pixels.width() as f64 / bounds.width() as f64;
        FrozenImage { bounds, scale, pixels: Arc::new(pixels) }
    }

    pub fn bounds(&self) -> VirtualBounds {
        self.bounds
    }

    /// Image pixels per desktop unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Copies the region out of the frozen image. The rect is clipped to the
    /// image first; `None` if nothing remains.
    pub fn crop(&self, rect: SelectionRect) -> Option<RgbaImage> {
        let r = rect.clamp_to(self.width(), self.height())?;
        Some(imageops::crop_imm(&*self.pixels, r.x1, r.y1, r.width(), r.height()).to_image())
    }
}

/// Platform access for a capture session.
pub trait ScreenSource {
    fn monitors(&self) -> Result<Vec<MonitorRect>, SnapError>;

    fn capture_all(&self) -> Result<FrozenImage, SnapError>;
}

/// `xcap` backed source. Monitors are enumerated on every call so hot-plugging
/// between sessions is picked up.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapSource;

impl XcapSource {
    fn enumerate() -> Result<Vec<(MonitorRect, Monitor)>, SnapError> {
        let monitors = Monitor::all().map_err(|e| SnapError::CaptureUnavailable(e.to_string()))?;
        monitors
            .into_iter()
            .map(|m| {
                let rect = monitor_rect(&m)
                    .map_err(|e| SnapError::CaptureUnavailable(e.to_string()))?;
                Ok((rect, m))
            })
            .collect()
    }
}

fn monitor_rect(m: &Monitor) -> xcap::XCapResult<MonitorRect> {
    Ok(MonitorRect::new(m.x()?, m.y()?, m.width()?, m.height()?))
}

impl ScreenSource for XcapSource {
    fn monitors(&self) -> Result<Vec<MonitorRect>, SnapError> {
        Ok(Self::enumerate()?.into_iter().map(|(rect, _)| rect).collect())
    }

    fn capture_all(&self) -> Result<FrozenImage, SnapError> {
        let start = Instant::now();
        let monitors = Self::enumerate()?;
        let rects: Vec<MonitorRect> = monitors.iter().map(|(r, _)| *r).collect();
        let bounds = compute_bounding_box(&rects)?;

        // 先把所有显示器都抓下来，再做拼接，尽量缩短各屏之间的时间差
        let shots = monitors
            .iter()
            .map(|(rect, m)| {
                m.capture_image()
                    .map(|img| (*rect, img))
                    .map_err(|e| SnapError::CaptureUnavailable(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("captured {} monitor(s) in {}ms", shots.len(), start.elapsed().as_millis());

        Ok(FrozenImage::new(bounds, stitch(bounds, shots)))
    }
}

fn shot_scale(rect: &MonitorRect, img: &RgbaImage) -> f64 {
    img.width() as f64 / rect.width as f64
}

fn scaled(v: u32, scale: f64) -> u32 {
    (v as f64 * scale).round() as u32
}

/// Places every monitor image on one canvas at its translated origin.
///
/// The canvas uses the highest pixel density among the shots (2.0 on a Retina
/// display whose size is reported in points), so those shots are copied
/// without resampling. Only a lower-density monitor next to a denser one is
/// scaled up to match.
pub fn stitch(bounds: VirtualBounds, shots: Vec<(MonitorRect, RgbaImage)>) -> RgbaImage {
    let scale = shots
        .iter()
        .map(|(rect, img)| shot_scale(rect, img))
        .fold(1.0_f64, f64::max);
    let mut canvas = RgbaImage::new(scaled(bounds.width(), scale), scaled(bounds.height(), scale));
    for (rect, img) in shots {
        let size = (scaled(rect.width, scale), scaled(rect.height, scale));
        let img = if img.dimensions() != size {
            imageops::resize(&img, size.0, size.1, FilterType::Triangle)
        } else {
            img
        };
        let (cx, cy) = bounds.to_canvas(&rect);
        imageops::replace(&mut canvas, &img, scaled(cx, scale) as i64, scaled(cy, scale) as i64);
    }
    canvas
}
