use crate::gesture::GestureConfig;
use crate::instance::Instance;
use crate::overlay::{OverlayRenderer, OverlayUi};
use crate::projection::Pose;
use crate::reconcile::{InstanceReconciler, ReconcileReport};
use crate::selection::{normalize_url, SelectionSnapshot};
use crate::settings::Settings;
use crate::source::{
    BrowserEngine, BrowserOptions, BrowserSource, SourceId, SurfaceSource, WindowCapture,
    WindowSource,
};
use std::collections::HashSet;
use std::sync::Arc;

pub const HELPER_PANEL_TITLE: &str = "OpenXR Window Manager";

/// Outcome of one reconciliation of both live sets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub browsers: ReconcileReport,
    pub windows: ReconcileReport,
}

/// Keeps the live overlays in line with the selection and renders them.
pub struct WindowManager {
    engine: Arc<dyn BrowserEngine>,
    capture: Arc<dyn WindowCapture>,
    browser_options: BrowserOptions,
    gesture: GestureConfig,
    spawn_pose: Pose,
    renderer: OverlayRenderer,
    browsers: InstanceReconciler,
    windows: InstanceReconciler,
}

impl WindowManager {
    pub fn new(
        engine: Arc<dyn BrowserEngine>,
        capture: Arc<dyn WindowCapture>,
        settings: &Settings,
    ) -> Self {
        Self {
            engine,
            capture,
            browser_options: settings.browser_options(),
            gesture: settings.gesture_config(),
            spawn_pose: settings.spawn_pose(),
            renderer: OverlayRenderer::new(settings.overlay_config()),
            browsers: InstanceReconciler::new(),
            windows: InstanceReconciler::new(),
        }
    }

    pub fn browsers(&self) -> &[Instance] {
        self.browsers.instances()
    }

    pub fn windows(&self) -> &[Instance] {
        self.windows.instances()
    }

    pub fn renderer(&self) -> &OverlayRenderer {
        &self.renderer
    }

    /// One render step: helper panel, reconciliation, then drawing and input.
    pub fn step(&mut self, selection: &SelectionSnapshot, ui: &mut dyn OverlayUi) -> StepReport {
        if selection.show_helper {
            ui.hint_panel(HELPER_PANEL_TITLE);
        }

        let report = self.reconcile(selection);

        self.renderer.render(ui, self.browsers.instances_mut());
        self.renderer.render(ui, self.windows.instances_mut());
        report
    }

    /// Reconcile both live sets against `selection` without drawing.
    pub fn reconcile(&mut self, selection: &SelectionSnapshot) -> StepReport {
        let mut seen = HashSet::new();
        let urls: Vec<SourceId> = selection
            .browser_urls
            .iter()
            .map(|u| normalize_url(u))
            .filter(|u| !u.is_empty() && seen.insert(u.clone()))
            .map(SourceId::Url)
            .collect();
        let handles: Vec<SourceId> = selection
            .windows
            .iter()
            .copied()
            .map(SourceId::Window)
            .collect();

        let (pose, gesture) = (self.spawn_pose, self.gesture);
        let engine = &self.engine;
        let options = &self.browser_options;
        let browsers = self.browsers.reconcile(&urls, |id| {
            let SourceId::Url(url) = id else {
                anyhow::bail!("{id} is not a browser source");
            };
            Instance::new(id.clone(), pose, gesture, |sink| {
                let source = BrowserSource::open(engine.as_ref(), url, options, sink)?;
                Ok(Box::new(source) as Box<dyn SurfaceSource>)
            })
        });

        let capture = &self.capture;
        let windows = self.windows.reconcile(&handles, |id| {
            let SourceId::Window(handle) = id else {
                anyhow::bail!("{id} is not a window source");
            };
            Instance::new(id.clone(), pose, gesture, |_sink| {
                let source = WindowSource::open(Arc::clone(capture), *handle)?;
                Ok(Box::new(source) as Box<dyn SurfaceSource>)
            })
        });

        StepReport { browsers, windows }
    }

    /// Release every live source.
    pub fn shutdown(&mut self) {
        tracing::info!(
            browsers = self.browsers.len(),
            windows = self.windows.len(),
            "releasing overlays"
        );
        self.browsers.clear();
        self.windows.clear();
    }
}

impl Drop for WindowManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
