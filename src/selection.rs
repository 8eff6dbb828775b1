//! The user's choice of sources, as edited by the desktop control form.

use crate::desktop::{WindowEnumerator, WindowInfo};
use crate::source::WindowHandle;
use std::collections::HashSet;
use url::Url;

/// What the user wants projected this step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub browser_urls: Vec<String>,
    pub windows: Vec<WindowHandle>,
    pub show_helper: bool,
}

pub trait SelectionProvider {
    fn snapshot(&self) -> SelectionSnapshot;
}

impl SelectionProvider for SelectionSnapshot {
    fn snapshot(&self) -> SelectionSnapshot {
        self.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserEntry {
    pub url: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEntry {
    pub info: WindowInfo,
    pub checked: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    browsers: Vec<BrowserEntry>,
    windows: Vec<WindowEntry>,
    pub show_helper: bool,
}

impl SelectionState {
    pub fn new(show_helper: bool) -> Self {
        Self {
            show_helper,
            ..Self::default()
        }
    }

    pub fn browsers(&self) -> &[BrowserEntry] {
        &self.browsers
    }

    pub fn windows(&self) -> &[WindowEntry] {
        &self.windows
    }

    /// Append `text` as a checked browser entry. Blank input is ignored.
    pub fn add_browser(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        tracing::debug!(url = text, "browser entry added");
        self.browsers.push(BrowserEntry {
            url: text.to_string(),
            checked: true,
        });
        true
    }

    pub fn set_browser_checked(&mut self, index: usize, checked: bool) {
        if let Some(entry) = self.browsers.get_mut(index) {
            entry.checked = checked;
        }
    }

    pub fn remove_browser(&mut self, index: usize) -> Option<BrowserEntry> {
        (index < self.browsers.len()).then(|| self.browsers.remove(index))
    }

    /// Replace the window list with a fresh enumeration. Windows that are
    /// still around keep their checked state.
    pub fn refresh_windows(&mut self, enumerator: &dyn WindowEnumerator) -> anyhow::Result<()> {
        let listed = enumerator.list()?;
        let checked: HashSet<WindowHandle> = self
            .windows
            .iter()
            .filter(|w| w.checked)
            .map(|w| w.info.handle)
            .collect();
        self.windows = listed
            .into_iter()
            .map(|info| WindowEntry {
                checked: checked.contains(&info.handle),
                info,
            })
            .collect();
        tracing::debug!(count = self.windows.len(), "window list refreshed");
        Ok(())
    }

    pub fn set_window_checked(&mut self, index: usize, checked: bool) {
        if let Some(entry) = self.windows.get_mut(index) {
            entry.checked = checked;
        }
    }
}

impl SelectionProvider for SelectionState {
    fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            browser_urls: self
                .browsers
                .iter()
                .filter(|b| b.checked)
                .map(|b| b.url.clone())
                .collect(),
            windows: self
                .windows
                .iter()
                .filter(|w| w.checked)
                .map(|w| w.info.handle)
                .collect(),
            show_helper: self.show_helper,
        }
    }
}

/// Canonical form of a user-typed address. Input without a scheme is
/// treated as `https`; anything that still fails to parse is kept as typed.
pub fn normalize_url(text: &str) -> String {
    let text = text.trim();
    let parsed = match Url::parse(text) {
        Ok(url) if url.has_host() || url.scheme() == "about" || url.scheme() == "file" => Ok(url),
        _ => Url::parse(&format!("https://{text}")),
    };
    match parsed {
        Ok(url) => url.to_string(),
        Err(_) => text.to_string(),
    }
}
