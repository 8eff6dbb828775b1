use crate::gesture::{GestureConfig, GestureDispatcher};
use crate::projection::Pose;
use crate::source::{SourceId, SourceStatus, SurfaceSource};
use crate::swapchain::{FrameSink, TextureSwapchain};
use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one live instance. A recreated instance for
/// the same source gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// The live overlay wrapping one source while it stays selected.
pub struct Instance {
    id: InstanceId,
    source_id: SourceId,
    pub(crate) source: Box<dyn SurfaceSource>,
    swapchain: Arc<TextureSwapchain>,
    pub pose: Pose,
    pub(crate) gesture: GestureDispatcher,
    title: Option<String>,
}

impl Instance {
    /// Allocate a fresh swapchain and build the source around its sink.
    pub fn new<F>(source_id: SourceId, pose: Pose, gesture: GestureConfig, build: F) -> Result<Self>
    where
        F: FnOnce(FrameSink) -> Result<Box<dyn SurfaceSource>>,
    {
        let swapchain = Arc::new(TextureSwapchain::new());
        let source = build(swapchain.sink())?;
        let title = source.title();
        let instance = Self {
            id: InstanceId::next(),
            source_id,
            source,
            swapchain,
            pose,
            gesture: GestureDispatcher::new(gesture),
            title,
        };
        tracing::debug!(id = instance.id.0, source = %instance.source_id, "instance created");
        Ok(instance)
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    pub fn source(&self) -> &dyn SurfaceSource {
        self.source.as_ref()
    }

    pub fn source_mut(&mut self) -> &mut dyn SurfaceSource {
        self.source.as_mut()
    }

    pub fn swapchain(&self) -> &Arc<TextureSwapchain> {
        &self.swapchain
    }

    pub fn gesture(&self) -> &GestureDispatcher {
        &self.gesture
    }

    pub fn status(&self) -> SourceStatus {
        self.source.status()
    }

    /// Cached display title, falling back to the source identifier.
    pub fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| self.source_id.to_string())
    }

    /// Pull a frame from pull-model sources and refresh the cached title.
    pub fn poll(&mut self) {
        let sink = self.swapchain.sink();
        self.source.poll_frame(&sink);
        if let Some(title) = self.source.title() {
            self.title = Some(title);
        }
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        tracing::debug!(id = self.id.0, source = %self.source_id, "instance disposed");
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("source_id", &self.source_id)
            .field("pose", &self.pose)
            .finish_non_exhaustive()
    }
}
