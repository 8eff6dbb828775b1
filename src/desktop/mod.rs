//! Native desktop collaborators: top-level window enumeration and GDI window
//! capture. Both degrade to "nothing available" off Windows.

pub mod capture;
pub mod enumerate;

pub use capture::GdiWindowCapture;
pub use enumerate::{DesktopWindows, WindowEnumerator, WindowInfo};

/// Make window rectangles report physical pixels on mixed-DPI setups.
#[cfg(windows)]
pub fn enable_per_monitor_dpi_awareness() {
    use windows::Win32::UI::HiDpi::{
        SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
    };

    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

#[cfg(not(windows))]
pub fn enable_per_monitor_dpi_awareness() {}
