// src/geometry.rs

use crate::error::SnapError;

/// 单个显示器在虚拟桌面中的位置与尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl MonitorRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        MonitorRect { x, y, width, height }
    }

    fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }
}

/// Bounding box of every attached monitor. The origin can be negative when a
/// secondary monitor sits left of or above the primary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl VirtualBounds {
    pub fn width(&self) -> u32 {
        (self.max_x - self.min_x) as u32
    }

    pub fn height(&self) -> u32 {
        (self.max_y - self.min_y) as u32
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.min_x, self.min_y)
    }

    /// Translates a monitor's desktop origin into canvas coordinates.
    pub fn to_canvas(&self, monitor: &MonitorRect) -> (u32, u32) {
        ((monitor.x - self.min_x) as u32, (monitor.y - self.min_y) as u32)
    }
}

pub fn compute_bounding_box(monitors: &[MonitorRect]) -> Result<VirtualBounds, SnapError> {
    let first = monitors.first().ok_or(SnapError::DisplayEnumerationEmpty)?;
    let init = VirtualBounds {
        min_x: first.x,
        min_y: first.y,
        max_x: first.right(),
        max_y: first.bottom(),
    };
    Ok(monitors[1..].iter().fold(init, |b, m| VirtualBounds {
        min_x: b.min_x.min(m.x),
        min_y: b.min_y.min(m.y),
        max_x: b.max_x.max(m.right()),
        max_y: b.max_y.max(m.bottom()),
    }))
}

/// 规范化后的矩形选区，x1 < x2，y1 < y2，坐标为画布坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl SelectionRect {
    /// Normalizes two corners regardless of drag direction.
    pub fn from_points(a: (u32, u32), b: (u32, u32)) -> Self {
        SelectionRect {
            x1: a.0.min(b.0),
            y1: a.1.min(b.1),
            x2: a.0.max(b.0),
            y2: a.1.max(b.1),
        }
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// Clips the rectangle to a `width × height` image. `None` when nothing is left.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<SelectionRect> {
        let r = SelectionRect {
            x1: self.x1.min(width),
            y1: self.y1.min(height),
            x2: self.x2.min(width),
            y2: self.y2.min(height),
        };
        (r.width() > 0 && r.height() > 0).then_some(r)
    }
}
