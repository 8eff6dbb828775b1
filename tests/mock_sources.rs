#![allow(dead_code)]

use glam::{Vec2, Vec3};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use xr_window_manager::frame::{PixelFormat, PixelFrame};
use xr_window_manager::gesture::{Hand, HandPress, TouchEvent};
use xr_window_manager::instance::InstanceId;
use xr_window_manager::overlay::{NavigationAction, NavigationState, OverlayUi};
use xr_window_manager::projection::{unproject, Panel, PanelBounds, Pose};
use xr_window_manager::source::{
    BrowserEngine, BrowserOptions, BrowserSession, SourceStatus, WindowCapture, WindowHandle,
};
use xr_window_manager::swapchain::FrameSink;

/// Shared view of one mock browser session, kept by the engine after the
/// session itself has been handed out.
pub struct MockSessionState {
    pub url: String,
    pub options: BrowserOptions,
    pub status: Mutex<SourceStatus>,
    pub viewport: Mutex<Option<(u32, u32)>>,
    pub events: Mutex<Vec<TouchEvent>>,
    pub can_go_back: AtomicBool,
    pub can_go_forward: AtomicBool,
    pub back_calls: AtomicUsize,
    pub forward_calls: AtomicUsize,
    pub closed: AtomicBool,
    sink: FrameSink,
}

impl MockSessionState {
    /// Simulate the engine finishing its first load and painting a frame.
    pub fn paint(&self, width: u32, height: u32) -> bool {
        *self.viewport.lock().unwrap() = Some((width, height));
        *self.status.lock().unwrap() = SourceStatus::Ready;
        let pixels = vec![0x80; (width * height * 4) as usize];
        self.sink
            .deliver_pixels(width, height, PixelFormat::Rgba8, &pixels)
    }

    pub fn set_status(&self, status: SourceStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn events(&self) -> Vec<TouchEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn sink(&self) -> FrameSink {
        self.sink.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct MockSession {
    state: Arc<MockSessionState>,
}

impl BrowserSession for MockSession {
    fn status(&self) -> SourceStatus {
        *self.state.status.lock().unwrap()
    }

    fn viewport_size(&self) -> Option<(u32, u32)> {
        *self.state.viewport.lock().unwrap()
    }

    fn address(&self) -> String {
        self.state.url.clone()
    }

    fn can_go_back(&self) -> bool {
        self.state.can_go_back.load(Ordering::SeqCst)
    }

    fn can_go_forward(&self) -> bool {
        self.state.can_go_forward.load(Ordering::SeqCst)
    }

    fn back(&mut self) {
        self.state.back_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn forward(&mut self) {
        self.state.forward_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn dispatch_touch(&self, event: &TouchEvent) {
        self.state.events.lock().unwrap().push(*event);
    }

    fn close(&mut self) {
        self.state.closed.store(true, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MockBrowserEngine {
    sessions: Mutex<Vec<Arc<MockSessionState>>>,
    failing: Mutex<HashSet<String>>,
    opened: AtomicUsize,
}

impl MockBrowserEngine {
    pub fn fail_url(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    pub fn allow_url(&self, url: &str) {
        self.failing.lock().unwrap().remove(url);
    }

    /// Number of `open` calls, successful or not.
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// The most recent session opened for `url`.
    pub fn session(&self, url: &str) -> Option<Arc<MockSessionState>> {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.url == url)
            .cloned()
    }

    pub fn sessions(&self) -> Vec<Arc<MockSessionState>> {
        self.sessions.lock().unwrap().clone()
    }
}

impl BrowserEngine for MockBrowserEngine {
    fn open(
        &self,
        url: &str,
        options: &BrowserOptions,
        sink: FrameSink,
    ) -> anyhow::Result<Box<dyn BrowserSession>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(url) {
            anyhow::bail!("mock engine refused {url}");
        }
        let state = Arc::new(MockSessionState {
            url: url.to_string(),
            options: options.clone(),
            status: Mutex::new(SourceStatus::Initializing),
            viewport: Mutex::new(None),
            events: Mutex::new(Vec::new()),
            can_go_back: AtomicBool::new(false),
            can_go_forward: AtomicBool::new(false),
            back_calls: AtomicUsize::new(0),
            forward_calls: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            sink,
        });
        self.sessions.lock().unwrap().push(state.clone());
        Ok(Box::new(MockSession { state }))
    }
}

/// Desktop windows with fixed sizes; counts every capture per handle.
#[derive(Default)]
pub struct MockCapture {
    windows: Mutex<HashMap<WindowHandle, (u32, u32, String)>>,
    captures: Mutex<HashMap<WindowHandle, usize>>,
}

impl MockCapture {
    pub fn add_window(&self, handle: WindowHandle, width: u32, height: u32, title: &str) {
        self.windows
            .lock()
            .unwrap()
            .insert(handle, (width, height, title.to_string()));
    }

    pub fn close_window(&self, handle: WindowHandle) {
        self.windows.lock().unwrap().remove(&handle);
    }

    pub fn capture_count(&self, handle: WindowHandle) -> usize {
        self.captures
            .lock()
            .unwrap()
            .get(&handle)
            .copied()
            .unwrap_or(0)
    }
}

impl WindowCapture for MockCapture {
    fn is_window(&self, handle: WindowHandle) -> bool {
        self.windows.lock().unwrap().contains_key(&handle)
    }

    fn capture(&self, handle: WindowHandle) -> Option<PixelFrame> {
        *self.captures.lock().unwrap().entry(handle).or_default() += 1;
        let (w, h, _) = self.windows.lock().unwrap().get(&handle).cloned()?;
        PixelFrame::new(w, h, PixelFormat::Bgra8, vec![0x40; (w * h * 4) as usize]).ok()
    }

    fn title(&self, handle: WindowHandle) -> Option<String> {
        self.windows
            .lock()
            .unwrap()
            .get(&handle)
            .map(|(_, _, t)| t.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnFrame {
    pub id: InstanceId,
    pub generation: u64,
    pub size: (u32, u32),
    pub bounds: PanelBounds,
}

/// Overlay layer driven by the test: records what was drawn and reports
/// the configured presses on every panel.
#[derive(Default)]
pub struct ScriptedUi {
    pub hints: Vec<String>,
    pub windows: Vec<(InstanceId, String)>,
    pub nav_bars: Vec<(NavigationState, String)>,
    pub drawn: Vec<DrawnFrame>,
    pub volumes: HashMap<InstanceId, (Pose, PanelBounds)>,
    pub presses: Vec<HandPress>,
    pub nav_action: Option<NavigationAction>,
    /// Moves the next window opened, like a title-bar drag.
    pub drag: Option<Vec3>,
    width: f32,
    cursor_y: f32,
    pose: Pose,
}

impl ScriptedUi {
    /// Forget everything recorded so far, keeping presses and actions.
    pub fn clear_records(&mut self) {
        self.hints.clear();
        self.windows.clear();
        self.nav_bars.clear();
        self.drawn.clear();
    }

    /// Fingertip position that lands on `pixel` of a `size` surface shown by
    /// `id` in the previous step.
    pub fn fingertip_for(&self, id: InstanceId, pixel: Vec2, size: (u32, u32)) -> Vec3 {
        let (pose, bounds) = self.volumes[&id];
        let normalized = pixel / Vec2::new(size.0 as f32, size.1 as f32);
        unproject(&Panel { pose, bounds }, normalized)
    }

    pub fn press(&mut self, id: InstanceId, pixel: Vec2, size: (u32, u32)) {
        self.presses = vec![HandPress {
            hand: Hand::Right,
            fingertip: self.fingertip_for(id, pixel, size),
            radius: 1.0,
        }];
    }

    pub fn release(&mut self) {
        self.presses.clear();
    }
}

impl OverlayUi for ScriptedUi {
    fn hint_panel(&mut self, title: &str) {
        self.hints.push(title.to_string());
    }

    fn window_begin(&mut self, id: InstanceId, title: &str, pose: &mut Pose, width: f32) {
        self.windows.push((id, title.to_string()));
        if let Some(delta) = self.drag.take() {
            pose.position += delta;
        }
        self.width = width;
        self.cursor_y = 0.0;
        self.pose = *pose;
    }

    fn window_end(&mut self) {}

    fn navigation_bar(&mut self, state: NavigationState, address: &str) -> Option<NavigationAction> {
        self.nav_bars.push((state, address.to_string()));
        self.cursor_y -= 0.04;
        self.nav_action.take()
    }

    fn layout_remaining_width(&self) -> f32 {
        self.width
    }

    fn reserve(&mut self, size: Vec2) -> PanelBounds {
        let center = Vec3::new(0.0, self.cursor_y - size.y / 2.0, 0.0);
        self.cursor_y -= size.y;
        PanelBounds::new(center, size.extend(0.0))
    }

    fn draw_frame(&mut self, id: InstanceId, frame: &Arc<PixelFrame>, generation: u64, bounds: &PanelBounds) {
        self.drawn.push(DrawnFrame {
            id,
            generation,
            size: frame.size(),
            bounds: *bounds,
        });
    }

    fn panel_presses(&mut self, id: InstanceId, volume: &PanelBounds) -> Vec<HandPress> {
        self.volumes.insert(id, (self.pose, *volume));
        self.presses.clone()
    }
}
