//! Producers of 2D pixel content: embedded browser sessions and captured
//! desktop windows.

pub mod browser;
pub mod window;

pub use browser::{BrowserEngine, BrowserOptions, BrowserSession, BrowserSource, UnavailableBrowserEngine};
pub use window::{WindowCapture, WindowSource};

use crate::gesture::TouchEvent;
use crate::swapchain::FrameSink;

/// Opaque native window handle. Only equality is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(isize);

impl WindowHandle {
    pub fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> isize {
        self.0
    }
}

impl std::fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Key distinguishing a source in the desired and live sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceId {
    Url(String),
    Window(WindowHandle),
}

impl SourceId {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceId::Url(_) => SourceKind::Browser,
            SourceId::Window(_) => SourceKind::Window,
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceId::Url(url) => write!(f, "{url}"),
            SourceId::Window(handle) => write!(f, "window {handle}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Browser,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    /// Still starting up (e.g. waiting for the initial page load).
    Initializing,
    Ready,
    /// Initialisation failed; the instance is dropped at the next
    /// reconciliation.
    Failed,
}

/// Back/forward history of a browser-like source.
pub trait Navigation {
    fn can_go_back(&self) -> bool;
    fn can_go_forward(&self) -> bool;
    fn back(&mut self);
    fn forward(&mut self);
    fn address(&self) -> String;
}

/// Native input channel accepting synthetic touch events.
pub trait TouchInput {
    fn inject(&self, event: &TouchEvent);
}

/// A thing that produces pixels.
pub trait SurfaceSource: Send {
    fn kind(&self) -> SourceKind;

    fn status(&self) -> SourceStatus;

    /// Height over width of the content, once known.
    fn aspect_ratio(&self) -> Option<f32>;

    /// Native pixel size that projected touch points are scaled to.
    fn pixel_size(&self) -> Option<(u32, u32)>;

    fn title(&self) -> Option<String>;

    /// Pull-model sources capture here once per render step. Push-model
    /// sources deliver through the sink handed to them at construction.
    fn poll_frame(&mut self, _sink: &FrameSink) {}

    fn navigation(&mut self) -> Option<&mut dyn Navigation> {
        None
    }

    fn touch_input(&self) -> Option<&dyn TouchInput> {
        None
    }
}
