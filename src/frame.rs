use anyhow::{anyhow, Result};
use std::borrow::Cow;

/// Byte order of a 32-bit pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Native Windows / Chromium paint order.
    Bgra8,
    Rgba8,
}

/// One rendered moment of a source: a tightly packed 4-byte-per-pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFrame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl PixelFrame {
    pub fn new(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height);
        if pixels.len() != expected {
            return Err(anyhow!(
                "pixel buffer is {} bytes, expected {expected} for {width}x{height}",
                pixels.len()
            ));
        }
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    /// Opaque white frame shown before a source has painted anything.
    pub fn blank() -> Self {
        Self {
            width: 1,
            height: 1,
            format: PixelFormat::Rgba8,
            pixels: vec![0xff; 4],
        }
    }

    /// Height over width, the ratio panels are laid out with.
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(self.height as f32 / self.width as f32)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixels in RGBA order, converting from BGRA when needed.
    pub fn to_rgba8(&self) -> Cow<'_, [u8]> {
        match self.format {
            PixelFormat::Rgba8 => Cow::Borrowed(&self.pixels),
            PixelFormat::Bgra8 => {
                let mut rgba = self.pixels.clone();
                for px in rgba.chunks_exact_mut(4) {
                    px.swap(0, 2);
                }
                Cow::Owned(rgba)
            }
        }
    }

    /// Overwrite this frame with new contents, reusing the allocation.
    pub(crate) fn copy_from(&mut self, width: u32, height: u32, format: PixelFormat, src: &[u8]) {
        self.width = width;
        self.height = height;
        self.format = format;
        self.pixels.clear();
        self.pixels.extend_from_slice(src);
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize) * 4
}
