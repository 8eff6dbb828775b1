use crate::frame::{PixelFormat, PixelFrame};
use crate::source::{WindowCapture, WindowHandle};
use anyhow::{anyhow, Result};

use super::enumerate::window_text;

/// Copies a window's pixels (frame included) through GDI each call.
#[derive(Debug, Default, Clone, Copy)]
pub struct GdiWindowCapture;

impl WindowCapture for GdiWindowCapture {
    fn is_window(&self, handle: WindowHandle) -> bool {
        is_window(handle)
    }

    fn capture(&self, handle: WindowHandle) -> Option<PixelFrame> {
        match capture_window_bgra(handle) {
            Ok(frame) => Some(frame),
            Err(e) => {
                tracing::trace!(%handle, "window capture failed: {e}");
                None
            }
        }
    }

    fn title(&self, handle: WindowHandle) -> Option<String> {
        window_text(handle)
    }
}

#[cfg(windows)]
fn is_window(handle: WindowHandle) -> bool {
    use windows::Win32::UI::WindowsAndMessaging::IsWindow;

    unsafe { IsWindow(super::enumerate::hwnd(handle)).as_bool() }
}

#[cfg(not(windows))]
fn is_window(_handle: WindowHandle) -> bool {
    false
}

#[cfg(windows)]
pub fn capture_window_bgra(handle: WindowHandle) -> Result<PixelFrame> {
    use windows::Win32::Foundation::RECT;
    use windows::Win32::Graphics::Gdi::{
        BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDIBits,
        GetWindowDC, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
        DIB_RGB_COLORS, HGDIOBJ, SRCCOPY,
    };
    use windows::Win32::UI::WindowsAndMessaging::GetWindowRect;

    let hwnd = super::enumerate::hwnd(handle);

    unsafe {
        let mut rect = RECT::default();
        GetWindowRect(hwnd, &mut rect).map_err(|e| anyhow!("GetWindowRect failed: {e}"))?;
        let width = rect.right - rect.left;
        let height = rect.bottom - rect.top;
        if width <= 0 || height <= 0 {
            return Err(anyhow!("window bounds are empty"));
        }

        let window_dc = GetWindowDC(hwnd);
        if window_dc.0.is_null() {
            return Err(anyhow!("GetWindowDC failed"));
        }
        let mem_dc = CreateCompatibleDC(window_dc);
        if mem_dc.0.is_null() {
            let _ = ReleaseDC(hwnd, window_dc);
            return Err(anyhow!("CreateCompatibleDC failed"));
        }

        let bmp = CreateCompatibleBitmap(window_dc, width, height);
        if bmp.0.is_null() {
            let _ = DeleteDC(mem_dc);
            let _ = ReleaseDC(hwnd, window_dc);
            return Err(anyhow!("CreateCompatibleBitmap failed"));
        }

        let old_obj = SelectObject(mem_dc, HGDIOBJ(bmp.0));
        let ok = BitBlt(mem_dc, 0, 0, width, height, window_dc, 0, 0, SRCCOPY).is_ok();
        if !ok {
            let _ = SelectObject(mem_dc, old_obj);
            let _ = DeleteObject(bmp);
            let _ = DeleteDC(mem_dc);
            let _ = ReleaseDC(hwnd, window_dc);
            return Err(anyhow!("BitBlt failed"));
        }

        let mut bmi = BITMAPINFO::default();
        bmi.bmiHeader = BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: width,
            // Negative height asks for a top-down bitmap.
            biHeight: -height,
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            ..Default::default()
        };

        let mut bgra = vec![0u8; (width as usize) * (height as usize) * 4];
        let rows = GetDIBits(
            mem_dc,
            bmp,
            0,
            height as u32,
            Some(bgra.as_mut_ptr() as *mut _),
            &mut bmi,
            DIB_RGB_COLORS,
        );

        let _ = SelectObject(mem_dc, old_obj);
        let _ = DeleteObject(bmp);
        let _ = DeleteDC(mem_dc);
        let _ = ReleaseDC(hwnd, window_dc);

        if rows == 0 {
            return Err(anyhow!("GetDIBits failed"));
        }

        // GDI leaves alpha undefined for most windows.
        for px in bgra.chunks_exact_mut(4) {
            px[3] = 255;
        }

        PixelFrame::new(width as u32, height as u32, PixelFormat::Bgra8, bgra)
    }
}

#[cfg(not(windows))]
pub fn capture_window_bgra(_handle: WindowHandle) -> Result<PixelFrame> {
    Err(anyhow!("window capture is only implemented for Windows"))
}
