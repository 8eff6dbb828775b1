//! Double-buffered frame handoff between a producer (browser paint callback
//! or window capture) and the render step.
//!
//! One slot is "current" for reading, the other is the write target. A write
//! fills the back slot completely and only then flips `current`, so a reader
//! always clones a finished frame. Readers only ever hold a slot lock long
//! enough to clone an `Arc`; pixel copies happen outside every lock.

use crate::frame::{byte_len, PixelFormat, PixelFrame};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

pub struct TextureSwapchain {
    // Each lock guards one `Arc` swap or clone, never a pixel copy.
    slots: [Mutex<Arc<PixelFrame>>; 2],
    current: AtomicUsize,
    generation: AtomicU64,
    // Serialises producers only; readers never take it.
    writer: Mutex<()>,
}

impl Default for TextureSwapchain {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureSwapchain {
    pub fn new() -> Self {
        let blank = Arc::new(PixelFrame::blank());
        Self {
            slots: [Mutex::new(blank.clone()), Mutex::new(blank)],
            current: AtomicUsize::new(0),
            generation: AtomicU64::new(0),
            writer: Mutex::new(()),
        }
    }

    /// Most recently completed frame, or the white placeholder before the
    /// first write.
    pub fn read_current(&self) -> Arc<PixelFrame> {
        let index = self.current.load(Ordering::Acquire);
        lock(&self.slots[index]).clone()
    }

    /// Number of completed writes. Zero until the first frame lands.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn has_frame(&self) -> bool {
        self.generation() > 0
    }

    /// Publish an already built frame. Returns `false`, keeping the current
    /// frame, when the buffer does not match the frame's size.
    pub fn write(&self, frame: PixelFrame) -> bool {
        if !size_matches(frame.width, frame.height, frame.pixels.len()) {
            return false;
        }
        let frame = Arc::new(frame);
        self.publish(move |target| *target = frame);
        true
    }

    /// Copy raw pixels into the back buffer, reusing its allocation when no
    /// reader still holds it. Returns `false` for a malformed buffer.
    pub fn write_pixels(&self, width: u32, height: u32, format: PixelFormat, src: &[u8]) -> bool {
        if !size_matches(width, height, src.len()) {
            return false;
        }
        self.publish(|target| match Arc::get_mut(target) {
            Some(frame) => frame.copy_from(width, height, format, src),
            None => {
                *target = Arc::new(PixelFrame {
                    width,
                    height,
                    format,
                    pixels: src.to_vec(),
                })
            }
        });
        true
    }

    fn publish<F>(&self, fill: F)
    where
        F: FnOnce(&mut Arc<PixelFrame>),
    {
        let _writer = lock(&self.writer);
        let front = self.current.load(Ordering::Acquire);
        let back = 1 - front;

        // Park the front frame in the back slot while we fill the old back
        // buffer, so a reader racing onto the back index still sees a whole
        // frame.
        let front_frame = lock(&self.slots[front]).clone();
        let mut target = std::mem::replace(&mut *lock(&self.slots[back]), front_frame);
        fill(&mut target);
        *lock(&self.slots[back]) = target;

        self.current.store(back, Ordering::Release);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Producer handle that stops delivering once the swapchain is dropped.
    pub fn sink(self: &Arc<Self>) -> FrameSink {
        FrameSink {
            target: Arc::downgrade(self),
        }
    }
}

/// The single "deliver frame" entry point handed to producers.
///
/// Holds only a weak reference: after the owning instance is disposed every
/// delivery is a no-op.
#[derive(Clone)]
pub struct FrameSink {
    target: Weak<TextureSwapchain>,
}

impl FrameSink {
    pub fn deliver(&self, frame: PixelFrame) -> bool {
        match self.target.upgrade() {
            Some(swapchain) => swapchain.write(frame),
            None => false,
        }
    }

    pub fn deliver_pixels(&self, width: u32, height: u32, format: PixelFormat, src: &[u8]) -> bool {
        match self.target.upgrade() {
            Some(swapchain) => swapchain.write_pixels(width, height, format, src),
            None => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.target.strong_count() == 0
    }
}

fn size_matches(width: u32, height: u32, len: usize) -> bool {
    if len == byte_len(width, height) {
        return true;
    }
    tracing::warn!(width, height, len, "dropping frame with mismatched buffer size");
    false
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
