use super::{Navigation, SourceKind, SourceStatus, SurfaceSource, TouchInput};
use crate::gesture::TouchEvent;
use crate::swapchain::FrameSink;
use anyhow::{anyhow, Context, Result};
use once_cell::unsync::OnceCell;
use std::path::PathBuf;

pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.4896.79 Mobile Safari/537.36";

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserOptions {
    pub user_agent: String,
    pub cache_dir: Option<PathBuf>,
    /// Load popup targets in the same session instead of opening new tabs.
    pub popups_in_place: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            user_agent: MOBILE_USER_AGENT.to_string(),
            cache_dir: None,
            popups_in_place: true,
        }
    }
}

/// Embedded browser engine able to start off-screen sessions.
///
/// Sessions paint asynchronously by calling [`FrameSink::deliver_pixels`]
/// from the engine's own threads.
pub trait BrowserEngine: Send + Sync {
    fn open(
        &self,
        url: &str,
        options: &BrowserOptions,
        sink: FrameSink,
    ) -> Result<Box<dyn BrowserSession>>;
}

/// A live off-screen page.
pub trait BrowserSession: Send {
    /// `Initializing` until the initial load completes.
    fn status(&self) -> SourceStatus;
    fn viewport_size(&self) -> Option<(u32, u32)>;
    fn address(&self) -> String;
    fn can_go_back(&self) -> bool;
    fn can_go_forward(&self) -> bool;
    fn back(&mut self);
    fn forward(&mut self);
    fn dispatch_touch(&self, event: &TouchEvent);
    /// Stop paint delivery and release the engine session.
    fn close(&mut self);
}

/// Engine used when no embedded browser is linked into the build.
#[derive(Debug, Default)]
pub struct UnavailableBrowserEngine;

impl BrowserEngine for UnavailableBrowserEngine {
    fn open(
        &self,
        url: &str,
        _options: &BrowserOptions,
        _sink: FrameSink,
    ) -> Result<Box<dyn BrowserSession>> {
        Err(anyhow!("no embedded browser engine is available to open {url}"))
    }
}

pub struct BrowserSource {
    url: String,
    session: Box<dyn BrowserSession>,
    // Fixed from the first rendered size.
    aspect: OnceCell<f32>,
}

impl BrowserSource {
    pub fn open(
        engine: &dyn BrowserEngine,
        url: &str,
        options: &BrowserOptions,
        sink: FrameSink,
    ) -> Result<Self> {
        let session = engine
            .open(url, options, sink)
            .with_context(|| format!("failed to start browser session for {url}"))?;
        tracing::debug!(url, "browser session started");
        Ok(Self {
            url: url.to_string(),
            session,
            aspect: OnceCell::new(),
        })
    }

    fn is_ready(&self) -> bool {
        self.session.status() == SourceStatus::Ready
    }
}

impl SurfaceSource for BrowserSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Browser
    }

    fn status(&self) -> SourceStatus {
        self.session.status()
    }

    fn aspect_ratio(&self) -> Option<f32> {
        if !self.is_ready() {
            return None;
        }
        self.aspect
            .get_or_try_init(|| match self.session.viewport_size() {
                Some((w, h)) if w > 0 && h > 0 => Ok(h as f32 / w as f32),
                _ => Err(()),
            })
            .ok()
            .copied()
    }

    fn pixel_size(&self) -> Option<(u32, u32)> {
        if !self.is_ready() {
            return None;
        }
        self.session.viewport_size()
    }

    fn title(&self) -> Option<String> {
        Some(self.session.address())
    }

    fn navigation(&mut self) -> Option<&mut dyn Navigation> {
        Some(self)
    }

    fn touch_input(&self) -> Option<&dyn TouchInput> {
        if self.is_ready() {
            Some(self)
        } else {
            None
        }
    }
}

impl Navigation for BrowserSource {
    fn can_go_back(&self) -> bool {
        self.is_ready() && self.session.can_go_back()
    }

    fn can_go_forward(&self) -> bool {
        self.is_ready() && self.session.can_go_forward()
    }

    fn back(&mut self) {
        if self.is_ready() {
            self.session.back();
        }
    }

    fn forward(&mut self) {
        if self.is_ready() {
            self.session.forward();
        }
    }

    fn address(&self) -> String {
        self.session.address()
    }
}

impl TouchInput for BrowserSource {
    fn inject(&self, event: &TouchEvent) {
        self.session.dispatch_touch(event);
    }
}

impl Drop for BrowserSource {
    fn drop(&mut self) {
        self.session.close();
        tracing::debug!(url = %self.url, "browser session closed");
    }
}
