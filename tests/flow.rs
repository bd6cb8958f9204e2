use std::cell::RefCell;
use std::path::PathBuf;

use image::{Rgba, RgbaImage};
use snappath::capture::stitch;
use snappath::{
    compute_bounding_box, run_selection_flow, ClipboardSink, FrozenImage, MonitorRect, ScreenSource,
    SelectionRect, Selector, Settings, SnapError,
};
use snappath::selection::SelectionSession;

struct FakeDesktop {
    monitors: Vec<MonitorRect>,
    // 截图像素 / 报告的显示器尺寸
    density: u32,
}

impl FakeDesktop {
    fn dual() -> Self {
        FakeDesktop {
            monitors: vec![
                MonitorRect::new(0, 0, 1920, 1080),
                MonitorRect::new(-1920, 0, 1920, 1080),
            ],
            density: 1,
        }
    }

    fn retina() -> Self {
        FakeDesktop { monitors: vec![MonitorRect::new(0, 0, 1440, 900)], density: 2 }
    }
}

impl ScreenSource for FakeDesktop {
    fn monitors(&self) -> Result<Vec<MonitorRect>, SnapError> {
        Ok(self.monitors.clone())
    }

    fn capture_all(&self) -> Result<FrozenImage, SnapError> {
        let bounds = compute_bounding_box(&self.monitors)?;
        let shots = self
            .monitors
            .iter()
            .map(|m| {
                let (w, h) = (m.width * self.density, m.height * self.density);
                let img = RgbaImage::from_fn(w, h, |x, y| {
                    Rgba([(x % 251) as u8, (y % 241) as u8, if m.x < 0 { 10 } else { 200 }, 255])
                });
                (*m, img)
            })
            .collect();
        Ok(FrozenImage::new(bounds, stitch(bounds, shots)))
    }
}

struct NoDisplays;

impl ScreenSource for NoDisplays {
    fn monitors(&self) -> Result<Vec<MonitorRect>, SnapError> {
        Ok(Vec::new())
    }

    fn capture_all(&self) -> Result<FrozenImage, SnapError> {
        let bounds = compute_bounding_box(&self.monitors()?)?;
        Ok(FrozenImage::new(bounds, RgbaImage::new(bounds.width(), bounds.height())))
    }
}

/// Replays press → drag → release through a real session.
struct Gesture {
    press: (u32, u32),
    release: (u32, u32),
    seen: Option<(u32, u32)>,
}

impl Gesture {
    fn new(press: (u32, u32), release: (u32, u32)) -> Self {
        Gesture { press, release, seen: None }
    }
}

impl Selector for Gesture {
    fn select(
        &mut self,
        frozen: &FrozenImage,
        settings: &Settings,
    ) -> Result<Option<SelectionRect>, SnapError> {
        self.seen = Some((frozen.width(), frozen.height()));
        let mut session = SelectionSession::new(settings.min_drag);
        session.press(self.press);
        session.drag(self.release);
        session.release(self.release);
        Ok(session.outcome().flatten())
    }
}

#[derive(Default)]
struct RecordingClipboard {
    text: RefCell<Option<String>>,
    broken: bool,
}

impl ClipboardSink for RecordingClipboard {
    fn set_text(&self, text: &str) -> Result<(), SnapError> {
        if self.broken {
            return Err(SnapError::ClipboardUnavailable("no display".into()));
        }
        *self.text.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

fn settings_in(dir: &std::path::Path) -> Settings {
    Settings { save_dir: dir.join("SnapPath"), ..Settings::default() }
}

#[test]
fn dual_monitor_selection_is_saved_and_copied() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = settings_in(tmp.path());
    let source = FakeDesktop::dual();
    let mut gesture = Gesture::new((100, 100), (50, 50));
    let clipboard = RecordingClipboard::default();

    let path = run_selection_flow(&source, &mut gesture, &clipboard, &settings)
        .unwrap()
        .expect("selection should produce a file");

    assert_eq!(gesture.seen, Some((3840, 1080)));
    assert_eq!(clipboard.text.borrow().as_deref(), Some(path.to_string_lossy().as_ref()));
    assert!(path.starts_with(std::path::absolute(&settings.save_dir).unwrap()));
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("screenshot_") && name.ends_with(".png"), "{name}");

    let expected = source
        .capture_all()
        .unwrap()
        .crop(SelectionRect { x1: 50, y1: 50, x2: 100, y2: 100 })
        .unwrap();
    let saved = image::open(&path).unwrap().to_rgba8();
    assert_eq!(saved.dimensions(), (50, 50));
    assert_eq!(saved.as_raw(), expected.as_raw());
    // 左侧是副屏
    assert_eq!(saved.get_pixel(0, 0).0[2], 10);
}

#[test]
fn tiny_drag_saves_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = settings_in(tmp.path());
    let clipboard = RecordingClipboard::default();

    let mut gesture = Gesture::new((10, 10), (12, 12));
    let result = run_selection_flow(&FakeDesktop::dual(), &mut gesture, &clipboard, &settings);
    assert!(matches!(result, Ok(None)));
    assert!(clipboard.text.borrow().is_none());
    assert!(!settings.save_dir.exists());
}

#[test]
fn broken_clipboard_still_saves() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = settings_in(tmp.path());
    let clipboard = RecordingClipboard { broken: true, ..Default::default() };

    let mut gesture = Gesture::new((1900, 10), (1950, 60));
    let path: PathBuf =
        run_selection_flow(&FakeDesktop::dual(), &mut gesture, &clipboard, &settings)
            .unwrap()
            .unwrap();
    assert!(path.exists());
    assert_eq!(image::open(&path).unwrap().to_rgba8().dimensions(), (50, 50));
}

#[test]
fn no_displays_aborts_before_selection() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = settings_in(tmp.path());
    let mut gesture = Gesture::new((0, 0), (100, 100));

    let clipboard = RecordingClipboard::default();
    let err = run_selection_flow(&NoDisplays, &mut gesture, &clipboard, &settings).unwrap_err();
    assert!(matches!(err, SnapError::DisplayEnumerationEmpty));
    assert_eq!(gesture.seen, None);
    assert!(!settings.save_dir.exists());
}

#[test]
fn retina_capture_is_saved_at_native_resolution() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = settings_in(tmp.path());
    let source = FakeDesktop::retina();
    // 选区坐标是截图像素坐标
    let mut gesture = Gesture::new((301, 201), (101, 41));
    let clipboard = RecordingClipboard::default();

    let path = run_selection_flow(&source, &mut gesture, &clipboard, &settings)
        .unwrap()
        .unwrap();
    assert_eq!(gesture.seen, Some((2880, 1800)));

    let frozen = source.capture_all().unwrap();
    assert_eq!(frozen.scale(), 2.0);
    let expected = frozen.crop(SelectionRect { x1: 101, y1: 41, x2: 301, y2: 201 }).unwrap();
    let saved = image::open(&path).unwrap().to_rgba8();
    assert_eq!(saved.dimensions(), (200, 160));
    assert_eq!(saved.as_raw(), expected.as_raw());
}
