//! Freeze the desktop on a hotkey, drag out a region, save it as PNG and copy
//! the file's path to the clipboard.

pub mod capture;
pub mod config;
pub mod error;
pub mod flow;
pub mod geometry;
pub mod hotkey;
pub mod output;
pub mod overlay;
pub mod selection;
pub mod window;

pub use capture::{FrozenImage, ScreenSource, XcapSource};
pub use config::Settings;
pub use error::SnapError;
pub use flow::run_selection_flow;
pub use geometry::{compute_bounding_box, MonitorRect, SelectionRect, VirtualBounds};
pub use output::{ClipboardSink, SharedClipboard};
pub use window::{OverlayWindow, Selector};
