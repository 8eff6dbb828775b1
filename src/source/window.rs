use super::{SourceKind, SourceStatus, SurfaceSource, WindowHandle};
use crate::frame::PixelFrame;
use crate::swapchain::FrameSink;
use anyhow::{anyhow, Result};
use std::sync::Arc;

/// Native window capture. Failures are "no frame", never errors.
pub trait WindowCapture: Send + Sync {
    fn is_window(&self, handle: WindowHandle) -> bool;
    fn capture(&self, handle: WindowHandle) -> Option<PixelFrame>;
    fn title(&self, handle: WindowHandle) -> Option<String>;
}

/// A desktop window pulled once per render step.
pub struct WindowSource {
    handle: WindowHandle,
    capture: Arc<dyn WindowCapture>,
    size: Option<(u32, u32)>,
    title: Option<String>,
}

impl WindowSource {
    pub fn open(capture: Arc<dyn WindowCapture>, handle: WindowHandle) -> Result<Self> {
        if !capture.is_window(handle) {
            return Err(anyhow!("window {handle} is not available for capture"));
        }
        let title = capture.title(handle);
        tracing::debug!(%handle, title = title.as_deref().unwrap_or(""), "window source opened");
        Ok(Self {
            handle,
            capture,
            size: None,
            title,
        })
    }
}

impl SurfaceSource for WindowSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Window
    }

    fn status(&self) -> SourceStatus {
        SourceStatus::Ready
    }

    // Follows the live window rectangle, refreshed with every capture.
    fn aspect_ratio(&self) -> Option<f32> {
        match self.size {
            Some((w, h)) if w > 0 && h > 0 => Some(h as f32 / w as f32),
            _ => None,
        }
    }

    fn pixel_size(&self) -> Option<(u32, u32)> {
        self.size
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn poll_frame(&mut self, sink: &FrameSink) {
        if let Some(title) = self.capture.title(self.handle) {
            self.title = Some(title);
        }
        match self.capture.capture(self.handle) {
            Some(frame) => {
                self.size = Some(frame.size());
                sink.deliver(frame);
            }
            None => tracing::trace!(handle = %self.handle, "window capture unavailable"),
        }
    }
}
