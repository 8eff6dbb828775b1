//! Per-step drawing of live instances and routing of hand input into them.

use crate::frame::PixelFrame;
use crate::gesture::{GesturePhase, HandPress};
use crate::input_bridge;
use crate::instance::{Instance, InstanceId};
use crate::projection::{project, Panel, PanelBounds, Pose};
use crate::source::SourceKind;
use glam::Vec2;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    Back,
    Forward,
}

/// Immediate-mode layout, drawing and hand-tracking layer of the XR runtime.
///
/// Sizes and bounds are in metres, in the local space of the window opened
/// by the latest `window_begin`.
pub trait OverlayUi {
    /// Head-locked helper panel.
    fn hint_panel(&mut self, title: &str);

    /// Open a movable window. The layer may update `pose` when the user
    /// drags the window.
    fn window_begin(&mut self, id: InstanceId, title: &str, pose: &mut Pose, width: f32);

    fn window_end(&mut self);

    /// Back/forward affordances plus the current address.
    fn navigation_bar(&mut self, state: NavigationState, address: &str) -> Option<NavigationAction>;

    fn layout_remaining_width(&self) -> f32;

    fn reserve(&mut self, size: Vec2) -> PanelBounds;

    /// `generation` changes whenever `frame` has new contents.
    fn draw_frame(&mut self, id: InstanceId, frame: &Arc<PixelFrame>, generation: u64, bounds: &PanelBounds);

    /// Hands pressing into `volume` this step, in priority order.
    fn panel_presses(&mut self, id: InstanceId, volume: &PanelBounds) -> Vec<HandPress>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayConfig {
    /// Window width in metres.
    pub panel_width: f32,
    /// Height over width used until a source reports its own.
    pub default_aspect: f32,
    pub press_volume_offset: f32,
    pub press_volume_depth: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            panel_width: 0.6,
            default_aspect: 9.0 / 16.0,
            press_volume_offset: 0.01,
            press_volume_depth: 0.03,
        }
    }
}

#[derive(Debug, Default)]
pub struct OverlayRenderer {
    config: OverlayConfig,
}

impl OverlayRenderer {
    pub fn new(config: OverlayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn render(&self, ui: &mut dyn OverlayUi, instances: &mut [Instance]) {
        for instance in instances {
            self.render_instance(ui, instance);
        }
    }

    pub fn render_instance(&self, ui: &mut dyn OverlayUi, instance: &mut Instance) {
        instance.poll();

        // A window that has never been captured has nothing to show yet.
        if instance.source.kind() == SourceKind::Window && !instance.swapchain().has_frame() {
            return;
        }

        let id = instance.id();
        let title = instance.title();
        ui.window_begin(id, &title, &mut instance.pose, self.config.panel_width);

        if let Some(nav) = instance.source.navigation() {
            let state = NavigationState {
                can_go_back: nav.can_go_back(),
                can_go_forward: nav.can_go_forward(),
            };
            match ui.navigation_bar(state, &nav.address()) {
                Some(NavigationAction::Back) => nav.back(),
                Some(NavigationAction::Forward) => nav.forward(),
                None => {}
            }
        }

        let width = ui.layout_remaining_width();
        let aspect = instance
            .source
            .aspect_ratio()
            .unwrap_or(self.config.default_aspect);
        let bounds = ui.reserve(Vec2::new(width, width * aspect));

        let frame = instance.swapchain().read_current();
        let generation = instance.swapchain().generation();
        ui.draw_frame(id, &frame, generation, &bounds);

        self.route_input(ui, instance, &bounds);

        ui.window_end();
    }

    fn route_input(&self, ui: &mut dyn OverlayUi, instance: &mut Instance, bounds: &PanelBounds) {
        if instance.source.touch_input().is_none() {
            // Source lost its input channel mid-gesture; wind the gesture down.
            if instance.gesture.phase() != GesturePhase::Idle {
                let _ = instance.gesture.step(&[], |_| None);
            }
            return;
        }

        let volume = bounds.press_volume(
            self.config.press_volume_offset,
            self.config.press_volume_depth,
        );
        let presses = ui.panel_presses(instance.id(), &volume);
        let panel = Panel {
            pose: instance.pose,
            bounds: volume,
        };
        let size = instance.source.pixel_size();
        let event = instance.gesture.step(&presses, |press| {
            size.and_then(|size| project(&panel, press.fingertip, size))
        });
        if let Some(event) = event {
            input_bridge::forward(instance.source.as_ref(), &event);
        }
    }
}
