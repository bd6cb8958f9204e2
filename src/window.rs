// src/window.rs

use minifb::{CursorStyle, Key, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};

use crate::capture::FrozenImage;
use crate::config::Settings;
use crate::error::SnapError;
use crate::geometry::SelectionRect;
use crate::overlay::OverlayRenderer;
use crate::selection::SelectionSession;

/// Lets the user pick a rectangle on a frozen image. `Ok(None)` means the
/// user cancelled or the gesture was too small.
pub trait Selector {
    fn select(
        &mut self,
        frozen: &FrozenImage,
        settings: &Settings,
    ) -> Result<Option<SelectionRect>, SnapError>;
}

/// Maps a window-space mouse position onto frozen-image pixels. The two only
/// differ when the capture is denser than the window (Retina).
pub fn to_image_coords(pos: (f32, f32), window: (usize, usize), image: (u32, u32)) -> (u32, u32) {
    let axis = |p: f32, win: usize, img: u32| {
        let ratio = if win == 0 { 1.0 } else { img as f32 / win as f32 };
        ((p.max(0.0) * ratio) as u32).min(img)
    };
    (axis(pos.0, window.0, image.0), axis(pos.1, window.1, image.1))
}

/// 每帧把鼠标按键的变化转换成 press/drag/release，并驱动渲染
pub struct GestureTracker {
    session: SelectionSession,
    renderer: OverlayRenderer,
    was_down: bool,
    last: Option<(u32, u32)>,
}

impl GestureTracker {
    pub fn new(frozen: &FrozenImage, settings: &Settings) -> Self {
        GestureTracker {
            session: SelectionSession::new(settings.min_drag),
            renderer: OverlayRenderer::new(
                frozen.clone(),
                settings.dim_alpha,
                settings.accent,
                settings.border_width,
            ),
            was_down: false,
            last: None,
        }
    }

    pub fn renderer(&self) -> &OverlayRenderer {
        &self.renderer
    }

    pub fn session(&self) -> &SelectionSession {
        &self.session
    }

    /// Feeds one frame of input. `pos` is in image pixels; `cancel` is set for
    /// Escape or a closed window. Returns true when the frame buffer changed.
    pub fn step(&mut self, down: bool, pos: Option<(u32, u32)>, cancel: bool) -> bool {
        if self.session.is_finished() {
            return false;
        }
        if cancel {
            self.session.cancel();
            return false;
        }

        let mut redrawn = false;
        match (self.was_down, down, pos) {
            (false, true, Some(p)) => {
                if self.session.press(p) {
                    self.renderer.clear();
                    redrawn = true;
                }
                self.last = Some(p);
            }
            (true, true, Some(p)) if self.last != Some(p) => {
                self.renderer.render(self.session.drag(p));
                self.last = Some(p);
                redrawn = true;
            }
            (true, false, _) => match pos.or(self.last) {
                Some(p) => {
                    self.session.release(p);
                }
                None => self.session.cancel(),
            },
            _ => {}
        }
        self.was_down = down;
        redrawn
    }
}

/// 无边框、置顶、覆盖整个虚拟桌面的 minifb 窗口
#[derive(Debug, Default, Clone, Copy)]
pub struct OverlayWindow;

impl OverlayWindow {
    fn open(frozen: &FrozenImage) -> Result<Window, SnapError> {
        let options = WindowOptions {
            borderless: true,
            title: false,
            resize: false,
            topmost: true,
            scale_mode: ScaleMode::Stretch,
            ..WindowOptions::default()
        };
        // 窗口按桌面坐标铺满，帧缓冲保持截图的原始像素
        let bounds = frozen.bounds();
        let mut window = Window::new(
            "snappath",
            bounds.width() as usize,
            bounds.height() as usize,
            options,
        )
        .map_err(|e| SnapError::Overlay(e.to_string()))?;
        let (x, y) = bounds.origin();
        window.set_position(x as isize, y as isize);
        window.set_cursor_style(CursorStyle::Crosshair);
        window.set_target_fps(120);
        Ok(window)
    }
}

impl Selector for OverlayWindow {
    fn select(
        &mut self,
        frozen: &FrozenImage,
        settings: &Settings,
    ) -> Result<Option<SelectionRect>, SnapError> {
        let mut window = Self::open(frozen)?;
        let mut tracker = GestureTracker::new(frozen, settings);
        let image = (frozen.width(), frozen.height());

        while !tracker.session().is_finished() {
            let cancel = !window.is_open() || window.is_key_down(Key::Escape);
            let down = window.get_mouse_down(MouseButton::Left);
            let pos = window
                .get_mouse_pos(MouseMode::Clamp)
                .map(|p| to_image_coords(p, window.get_size(), image));
            tracker.step(down, pos, cancel);
            if tracker.session().is_finished() {
                break;
            }

            let r = tracker.renderer();
            window
                .update_with_buffer(r.frame(), r.width(), r.height())
                .map_err(|e| SnapError::Overlay(e.to_string()))?;
        }

        // window 在此处被销毁，无论结果如何
        Ok(tracker.session().outcome().flatten())
    }
}
