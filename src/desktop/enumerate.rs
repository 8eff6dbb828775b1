use crate::source::WindowHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub title: String,
}

/// Lists the top-level windows a user may pick for projection.
pub trait WindowEnumerator {
    fn list(&self) -> anyhow::Result<Vec<WindowInfo>>;
}

/// Visible, enabled, root, titled top-level windows other than the shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopWindows;

impl WindowEnumerator for DesktopWindows {
    fn list(&self) -> anyhow::Result<Vec<WindowInfo>> {
        enumerate_windows()
    }
}

#[cfg(windows)]
pub(crate) fn hwnd(handle: WindowHandle) -> windows::Win32::Foundation::HWND {
    windows::Win32::Foundation::HWND(handle.raw() as *mut core::ffi::c_void)
}

#[cfg(windows)]
pub(crate) fn window_text(handle: WindowHandle) -> Option<String> {
    use windows::Win32::UI::WindowsAndMessaging::{GetWindowTextLengthW, GetWindowTextW};

    unsafe {
        let hwnd = hwnd(handle);
        let len = GetWindowTextLengthW(hwnd);
        if len <= 0 {
            return None;
        }
        let mut buf = vec![0u16; len as usize + 1];
        let read = GetWindowTextW(hwnd, &mut buf);
        if read <= 0 {
            return None;
        }
        let title = String::from_utf16_lossy(&buf[..read as usize]);
        if title.trim().is_empty() {
            None
        } else {
            Some(title)
        }
    }
}

#[cfg(not(windows))]
pub(crate) fn window_text(_handle: WindowHandle) -> Option<String> {
    None
}

#[cfg(windows)]
fn enumerate_windows() -> anyhow::Result<Vec<WindowInfo>> {
    use anyhow::anyhow;
    use windows::Win32::Foundation::{BOOL, HWND, LPARAM};
    use windows::Win32::UI::WindowsAndMessaging::{
        EnumWindows, GetAncestor, GetShellWindow, GetWindowLongPtrW, IsWindowVisible, GA_ROOT,
        GWL_STYLE, WS_DISABLED,
    };

    unsafe extern "system" fn enum_cb(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let found = &mut *(lparam.0 as *mut Vec<WindowInfo>);
        if hwnd.0.is_null() || hwnd == GetShellWindow() || !IsWindowVisible(hwnd).as_bool() {
            return BOOL(1);
        }
        let style = GetWindowLongPtrW(hwnd, GWL_STYLE) as u32;
        if style & WS_DISABLED.0 != 0 {
            return BOOL(1);
        }
        if GetAncestor(hwnd, GA_ROOT) != hwnd {
            return BOOL(1);
        }
        let handle = WindowHandle::from_raw(hwnd.0 as isize);
        if let Some(title) = window_text(handle) {
            found.push(WindowInfo { handle, title });
        }
        BOOL(1)
    }

    let mut found: Vec<WindowInfo> = Vec::new();
    unsafe {
        let ptr = &mut found as *mut Vec<WindowInfo>;
        EnumWindows(Some(enum_cb), LPARAM(ptr as isize))
            .map_err(|e| anyhow!("EnumWindows failed: {e}"))?;
    }
    tracing::debug!(count = found.len(), "enumerated desktop windows");
    Ok(found)
}

#[cfg(not(windows))]
fn enumerate_windows() -> anyhow::Result<Vec<WindowInfo>> {
    Ok(Vec::new())
}
