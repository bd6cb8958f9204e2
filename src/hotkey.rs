// src/hotkey.rs

use std::str::FromStr;
use std::sync::Mutex;
use std::thread;

use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::capture::{ScreenSource, XcapSource};
use crate::config::Settings;
use crate::error::SnapError;
use crate::flow::run_selection_flow;
use crate::geometry::compute_bounding_box;
use crate::output::SharedClipboard;
use crate::window::OverlayWindow;

/// Parses combinations like `ctrl+alt+s`.
pub fn parse_hotkey(text: &str) -> Result<HotKey, SnapError> {
    HotKey::from_str(text).map_err(|e| SnapError::Hotkey(format!("{text:?}: {e}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    Capture,
    Quit,
}

/// Only key presses count; releases and unknown ids are ignored.
pub fn classify(
    capture: &HotKey,
    quit: &HotKey,
    id: u32,
    state: HotKeyState,
) -> Option<HotkeyAction> {
    if state != HotKeyState::Pressed {
        None
    } else if id == capture.id() {
        Some(HotkeyAction::Capture)
    } else if id == quit.id() {
        Some(HotkeyAction::Quit)
    } else {
        None
    }
}

/// Runs the platform event loop on the calling (main) thread until the quit
/// hotkey is pressed. The loop is what delivers `WM_HOTKEY` on Windows and
/// Carbon hotkey events on macOS.
pub fn listen(settings: Settings) -> Result<(), SnapError> {
    let event_loop = EventLoop::<GlobalHotKeyEvent>::with_user_event()
        .build()
        .map_err(|e| SnapError::Hotkey(e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Wait);
    // 事件循环创建之后再查询显示器：在 Windows 上 winit 此时已开启 per-monitor DPI 感知
    log_monitors();

    let proxy = Mutex::new(event_loop.create_proxy());
    GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
        if let Ok(proxy) = proxy.lock() {
            // 事件循环已经退出时丢弃
            let _ = proxy.send_event(event);
        }
    }));

    let mut listener = HotkeyListener::register(settings)?;
    event_loop
        .run_app(&mut listener)
        .map_err(|e| SnapError::Hotkey(e.to_string()))?;
    listener.unregister()
}

fn log_monitors() {
    match XcapSource.monitors().and_then(|m| Ok((compute_bounding_box(&m)?, m.len()))) {
        Ok((bounds, count)) => log::info!("{count} monitor(s), virtual desktop {bounds:?}"),
        Err(e) => log::warn!("{e}"),
    }
}

/// 全局快捷键监听：截图键每按一次启动一个独立会话，退出键结束事件循环
pub struct HotkeyListener {
    manager: GlobalHotKeyManager,
    capture: HotKey,
    quit: HotKey,
    settings: Settings,
    clipboard: SharedClipboard,
}

impl HotkeyListener {
    /// Must be called on the thread that runs the event loop.
    pub fn register(settings: Settings) -> Result<Self, SnapError> {
        let capture = parse_hotkey(&settings.hotkey)?;
        let quit = parse_hotkey(&settings.quit_hotkey)?;
        let manager = GlobalHotKeyManager::new().map_err(|e| SnapError::Hotkey(e.to_string()))?;
        manager.register(capture).map_err(|e| SnapError::Hotkey(e.to_string()))?;
        manager.register(quit).map_err(|e| SnapError::Hotkey(e.to_string()))?;
        log::info!("capture: {}, quit: {}", settings.hotkey, settings.quit_hotkey);
        Ok(HotkeyListener { manager, capture, quit, settings, clipboard: SharedClipboard::new() })
    }

    fn unregister(&self) -> Result<(), SnapError> {
        self.manager
            .unregister_all(&[self.capture, self.quit])
            .map_err(|e| SnapError::Hotkey(e.to_string()))
    }

    fn start_session(&self) {
        let settings = self.settings.clone();
        let clipboard = self.clipboard.clone();
        if cfg!(target_os = "macos") {
            // AppKit 窗口只能在主线程上创建，会话期间快捷键事件排队等待
            run_session(&settings, &clipboard);
            return;
        }
        let spawned = thread::Builder::new()
            .name("snappath-session".into())
            .spawn(move || run_session(&settings, &clipboard));
        if let Err(e) = spawned {
            log::error!("failed to start capture session: {e}");
        }
    }
}

fn run_session(settings: &Settings, clipboard: &SharedClipboard) {
    match run_selection_flow(&XcapSource, &mut OverlayWindow, clipboard, settings) {
        Ok(Some(path)) => log::info!("copied {} to clipboard", path.display()),
        Ok(None) => {}
        Err(e @ (SnapError::CaptureUnavailable(_) | SnapError::DisplayEnumerationEmpty)) => {
            log::warn!("{e}")
        }
        Err(e) => log::error!("capture session failed: {e}"),
    }
}

impl ApplicationHandler<GlobalHotKeyEvent> for HotkeyListener {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, _event: WindowEvent) {}

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: GlobalHotKeyEvent) {
        match classify(&self.capture, &self.quit, event.id(), event.state()) {
            Some(HotkeyAction::Capture) => self.start_session(),
            Some(HotkeyAction::Quit) => {
                log::info!("quit requested");
                event_loop.exit();
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use global_hotkey::hotkey::{Code, Modifiers};

    #[test]
    fn default_combinations_parse() {
        let capture = parse_hotkey("ctrl+alt+s").unwrap();
        assert_eq!(capture, HotKey::new(Some(Modifiers::CONTROL | Modifiers::ALT), Code::KeyS));
        let quit = parse_hotkey("ctrl+alt+q").unwrap();
        assert_ne!(capture.id(), quit.id());
    }

    #[test]
    fn garbage_is_a_hotkey_error() {
        assert!(matches!(parse_hotkey("ctrl+alt+"), Err(SnapError::Hotkey(_))));
    }

    #[test]
    fn only_presses_trigger_actions() {
        let capture = parse_hotkey("ctrl+alt+s").unwrap();
        let quit = parse_hotkey("ctrl+alt+q").unwrap();
        let other = parse_hotkey("ctrl+alt+x").unwrap();

        let pressed = |id| classify(&capture, &quit, id, HotKeyState::Pressed);
        assert_eq!(pressed(capture.id()), Some(HotkeyAction::Capture));
        assert_eq!(pressed(quit.id()), Some(HotkeyAction::Quit));
        assert_eq!(pressed(other.id()), None);
        assert_eq!(classify(&capture, &quit, capture.id(), HotKeyState::Released), None);
    }
}
