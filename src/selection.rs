// src/selection.rs
// 纯状态机，不依赖窗口库

use crate::geometry::SelectionRect;

/// 拖拽中的起点与当前点（画布坐标）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub start: (u32, u32),
    pub current: (u32, u32),
}

impl DragState {
    pub fn rect(&self) -> SelectionRect {
        SelectionRect::from_points(self.start, self.current)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Dragging(DragState),
    Completed(SelectionRect),
    Cancelled,
}

/// One press/drag/release gesture over the frozen image.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSession {
    state: SelectionState,
    min_drag: u32,
}

impl SelectionSession {
    pub fn new(min_drag: u32) -> Self {
        SelectionSession { state: SelectionState::Idle, min_drag }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SelectionState::Completed(_) | SelectionState::Cancelled)
    }

    /// `Some(result)` once the session reached a terminal state; the inner
    /// value is `None` for a cancelled or too-small gesture.
    pub fn outcome(&self) -> Option<Option<SelectionRect>> {
        match self.state {
            SelectionState::Completed(rect) => Some(Some(rect)),
            SelectionState::Cancelled => Some(None),
            _ => None,
        }
    }

    /// Starts (or restarts) a drag. Returns true when the overlay must drop
    /// what it has drawn so far.
    pub fn press(&mut self, p: (u32, u32)) -> bool {
        match self.state {
            SelectionState::Idle | SelectionState::Dragging(_) => {
                self.state = SelectionState::Dragging(DragState { start: p, current: p });
                true
            }
            _ => false,
        }
    }

    /// Moves the drag end. Returns the normalized rect to redraw, or `None`
    /// when no drag is in progress.
    pub fn drag(&mut self, p: (u32, u32)) -> Option<SelectionRect> {
        match &mut self.state {
            SelectionState::Dragging(drag) => {
                drag.current = p;
                Some(drag.rect())
            }
            _ => None,
        }
    }

    pub fn release(&mut self, p: (u32, u32)) -> Option<SelectionRect> {
        let SelectionState::Dragging(drag) = self.state else {
            return None;
        };
        let dx = drag.start.0.abs_diff(p.0);
        let dy = drag.start.1.abs_diff(p.1);
        if dx > self.min_drag && dy > self.min_drag {
            let rect = SelectionRect::from_points(drag.start, p);
            self.state = SelectionState::Completed(rect);
            Some(rect)
        } else {
            log::debug!("selection too small ({dx}x{dy}), ignoring");
            self.state = SelectionState::Cancelled;
            None
        }
    }

    pub fn cancel(&mut self) {
        if !self.is_finished() {
            self.state = SelectionState::Cancelled;
        }
    }
}
