// src/overlay.rs

use image::{imageops, Rgba, RgbaImage};

use crate::capture::FrozenImage;
use crate::geometry::SelectionRect;

/// 默认遮罩不透明度，约 47%
pub const DEFAULT_DIM_ALPHA: u8 = 120;
pub const DEFAULT_ACCENT: u32 = 0x00aaff;
pub const DEFAULT_BORDER_WIDTH: u32 = 2;

/// Alpha-composites uniform black at `alpha` over a copy of the frozen image.
pub fn dim_layer(frozen: &FrozenImage, alpha: u8) -> RgbaImage {
    let keep = 255 - alpha as u32;
    let mut out = frozen.pixels().clone();
    for Rgba(px) in out.pixels_mut() {
        for c in &mut px[..3] {
            *c = ((*c as u32 * keep + 127) / 255) as u8;
        }
    }
    out
}

/// The untouched frozen pixels under `rect`, used to punch through the dim layer.
pub fn bright_crop(frozen: &FrozenImage, rect: SelectionRect) -> Option<RgbaImage> {
    frozen.crop(rect)
}

fn to_0rgb(px: &Rgba<u8>) -> u32 {
    let [r, g, b, _] = px.0;
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Half-open pixel region `[x0, x1) × [y0, y1)` on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

/// 合成遮罩窗口的帧缓冲（minifb 的 0RGB 格式）
pub struct OverlayRenderer {
    frozen: FrozenImage,
    width: usize,
    height: usize,
    dimmed: Vec<u32>,
    frame: Vec<u32>,
    accent: u32,
    border_width: u32,
    // 上一次绘制的选区和边框所占区域，下次绘制前先还原
    artifacts: Option<Region>,
}

impl OverlayRenderer {
    pub fn new(frozen: FrozenImage, dim_alpha: u8, accent: u32, border_width: u32) -> Self {
        let dimmed: Vec<u32> = dim_layer(&frozen, dim_alpha).pixels().map(to_0rgb).collect();
        OverlayRenderer {
            width: frozen.width() as usize,
            height: frozen.height() as usize,
            frame: dimmed.clone(),
            dimmed,
            frozen,
            accent,
            border_width,
            artifacts: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn frame(&self) -> &[u32] {
        &self.frame
    }

    /// Removes whatever the previous `render` drew.
    pub fn clear(&mut self) {
        if let Some(r) = self.artifacts.take() {
            for y in r.y0 as usize..r.y1 as usize {
                let row = y * self.width;
                let span = row + r.x0 as usize..row + r.x1 as usize;
                self.frame[span.clone()].copy_from_slice(&self.dimmed[span]);
            }
        }
    }

    /// Delete-then-redraw: bright crop when the extent is wider and taller than
    /// one pixel, then the outline.
    pub fn render(&mut self, rect: Option<SelectionRect>) {
        self.clear();
        let Some(rect) = rect else { return };

        if rect.width() > 1 && rect.height() > 1 {
            if let Some(crop) = bright_crop(&self.frozen, rect) {
                self.blit(&crop, rect.x1, rect.y1);
            }
        }
        self.artifacts = Some(self.stroke(rect));
    }

    fn blit(&mut self, img: &RgbaImage, x: u32, y: u32) {
        for (dy, row) in img.rows().enumerate() {
            let start = (y as usize + dy) * self.width + x as usize;
            for (dst, px) in self.frame[start..start + img.width() as usize].iter_mut().zip(row) {
                *dst = to_0rgb(px);
            }
        }
    }

    /// Draws an outline centred on the rect edges and returns the region it
    /// covers together with the rect itself.
    fn stroke(&mut self, rect: SelectionRect) -> Region {
        let half = self.border_width / 2;
        let rest = self.border_width - half;
        let (w, h) = (self.width as u32, self.height as u32);
        let outer = Region {
            x0: rect.x1.saturating_sub(half).min(w),
            y0: rect.y1.saturating_sub(half).min(h),
            x1: (rect.x2 + rest).min(w),
            y1: (rect.y2 + rest).min(h),
        };
        let inner = Region {
            x0: rect.x1 + rest,
            y0: rect.y1 + rest,
            x1: rect.x2.saturating_sub(half),
            y1: rect.y2.saturating_sub(half),
        };

        for y in outer.y0..outer.y1 {
            let row = y as usize * self.width;
            for x in outer.x0..outer.x1 {
                let inside = x >= inner.x0 && x < inner.x1 && y >= inner.y0 && y < inner.y1;
                if !inside {
                    self.frame[row + x as usize] = self.accent;
                }
            }
        }
        outer
    }
}
