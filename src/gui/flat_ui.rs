use crate::frame::PixelFrame;
use crate::gesture::{Hand, HandPress};
use crate::instance::InstanceId;
use crate::overlay::{NavigationAction, NavigationState, OverlayUi};
use crate::projection::{unproject, Panel, PanelBounds, Pose};
use eframe::egui;
use glam::{Vec2, Vec3};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

const TITLE_BAR_M: f32 = 0.03;
const NAV_BAR_M: f32 = 0.035;
const PADDING_M: f32 = 0.01;
const MOUSE_RADIUS_PX: f32 = 1.0;

/// GPU textures for overlay frames, re-uploaded only when the swapchain
/// generation changes.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<InstanceId, (egui::TextureHandle, u64)>,
    touched: HashSet<InstanceId>,
}

impl TextureCache {
    pub fn begin_frame(&mut self) {
        self.touched.clear();
    }

    /// Free textures of instances that were not drawn since `begin_frame`.
    pub fn end_frame(&mut self) {
        let touched = &self.touched;
        self.textures.retain(|id, _| touched.contains(id));
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn texture(
        &mut self,
        ctx: &egui::Context,
        id: InstanceId,
        frame: &PixelFrame,
        generation: u64,
    ) -> egui::TextureId {
        self.touched.insert(id);
        if let Some((handle, seen)) = self.textures.get_mut(&id) {
            if *seen != generation {
                handle.set(color_image(frame), egui::TextureOptions::LINEAR);
                *seen = generation;
            }
            return handle.id();
        }
        let handle = ctx.load_texture(
            format!("overlay-{}", id.raw()),
            color_image(frame),
            egui::TextureOptions::LINEAR,
        );
        let tex_id = handle.id();
        self.textures.insert(id, (handle, generation));
        tex_id
    }
}

fn color_image(frame: &PixelFrame) -> egui::ColorImage {
    let (w, h) = frame.size();
    egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &frame.to_rgba8())
}

struct OpenWindow {
    id: InstanceId,
    pose: Pose,
    width: f32,
    // Local y of the next row; rows grow downwards from the title bar.
    cursor_y: f32,
    background: egui::layers::ShapeIdx,
}

/// Flat orthographic preview of the overlay scene inside an egui `Ui`.
///
/// The scene is viewed along -Z: world x maps to screen x and world y to
/// screen -y, scaled by `pixels_per_meter` around the centre of the canvas.
/// The mouse stands in for the right hand.
pub struct FlatOverlayUi<'a> {
    ui: &'a mut egui::Ui,
    painter: egui::Painter,
    textures: &'a mut TextureCache,
    origin: egui::Pos2,
    pixels_per_meter: f32,
    window: Option<OpenWindow>,
}

impl<'a> FlatOverlayUi<'a> {
    pub fn new(ui: &'a mut egui::Ui, textures: &'a mut TextureCache, pixels_per_meter: f32) -> Self {
        let canvas = ui.available_rect_before_wrap();
        let painter = ui.painter_at(canvas);
        painter.rect_filled(canvas, 0.0, egui::Color32::from_gray(24));
        Self {
            ui,
            painter,
            textures,
            origin: canvas.center(),
            pixels_per_meter,
            window: None,
        }
    }

    fn to_screen(&self, world: Vec3) -> egui::Pos2 {
        egui::pos2(
            self.origin.x + world.x * self.pixels_per_meter,
            self.origin.y - world.y * self.pixels_per_meter,
        )
    }

    fn local_rect(&self, pose: &Pose, a: Vec3, b: Vec3) -> egui::Rect {
        egui::Rect::from_two_pos(
            self.to_screen(pose.to_world(a)),
            self.to_screen(pose.to_world(b)),
        )
    }

    fn bounds_rect(&self, pose: &Pose, bounds: &PanelBounds) -> egui::Rect {
        let half = bounds.dimensions * 0.5;
        self.local_rect(
            pose,
            bounds.center + Vec3::new(-half.x, half.y, 0.0),
            bounds.center + Vec3::new(half.x, -half.y, 0.0),
        )
    }

    fn take_row(&mut self, height: f32) -> Option<egui::Rect> {
        let (pose, width, top) = {
            let window = self.window.as_mut()?;
            let top = window.cursor_y;
            window.cursor_y -= height + PADDING_M;
            (window.pose, window.width, top)
        };
        let inner = width * 0.5 - PADDING_M;
        Some(self.local_rect(
            &pose,
            Vec3::new(-inner, top, 0.0),
            Vec3::new(inner, top - height, 0.0),
        ))
    }
}

impl OverlayUi for FlatOverlayUi<'_> {
    fn hint_panel(&mut self, title: &str) {
        let anchor = self.painter.clip_rect().left_top() + egui::vec2(12.0, 12.0);
        let galley = self.painter.layout_no_wrap(
            title.to_owned(),
            egui::FontId::proportional(16.0),
            egui::Color32::WHITE,
        );
        let rect = egui::Rect::from_min_size(anchor, galley.size()).expand(8.0);
        self.painter
            .rect_filled(rect, 6.0, egui::Color32::from_rgba_unmultiplied(40, 60, 90, 220));
        self.painter.galley(anchor, galley, egui::Color32::WHITE);
    }

    fn window_begin(&mut self, id: InstanceId, title: &str, pose: &mut Pose, width: f32) {
        let half = width * 0.5;
        let bar = self.local_rect(
            pose,
            Vec3::new(-half, TITLE_BAR_M, 0.0),
            Vec3::new(half, 0.0, 0.0),
        );
        let response = self.ui.interact(
            bar,
            egui::Id::new(("xr-window", id.raw())),
            egui::Sense::drag(),
        );
        if response.dragged() {
            let delta = response.drag_delta() / self.pixels_per_meter;
            pose.position += Vec3::new(delta.x, -delta.y, 0.0);
        }

        let background = self.painter.add(egui::Shape::Noop);
        let bar = self.local_rect(
            pose,
            Vec3::new(-half, TITLE_BAR_M, 0.0),
            Vec3::new(half, 0.0, 0.0),
        );
        self.painter
            .rect_filled(bar, 4.0, egui::Color32::from_gray(70));
        self.painter.text(
            bar.left_center() + egui::vec2(6.0, 0.0),
            egui::Align2::LEFT_CENTER,
            title,
            egui::FontId::proportional(13.0),
            egui::Color32::WHITE,
        );

        self.window = Some(OpenWindow {
            id,
            pose: *pose,
            width,
            cursor_y: -PADDING_M,
            background,
        });
    }

    fn window_end(&mut self) {
        let Some(window) = self.window.take() else {
            return;
        };
        let half = window.width * 0.5;
        let body = self.local_rect(
            &window.pose,
            Vec3::new(-half, 0.0, 0.0),
            Vec3::new(half, window.cursor_y, 0.0),
        );
        self.painter.set(
            window.background,
            egui::Shape::rect_filled(body, 4.0, egui::Color32::from_gray(45)),
        );
    }

    fn navigation_bar(&mut self, state: NavigationState, address: &str) -> Option<NavigationAction> {
        let rect = self.take_row(NAV_BAR_M)?;
        let id = self.window.as_ref()?.id;
        let mut action = None;
        self.ui.allocate_ui_at_rect(rect, |ui| {
            ui.push_id(("xr-nav", id.raw()), |ui| {
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(state.can_go_back, egui::Button::new("Back"))
                        .clicked()
                    {
                        action = Some(NavigationAction::Back);
                    }
                    if ui
                        .add_enabled(state.can_go_forward, egui::Button::new("Forward"))
                        .clicked()
                    {
                        action = Some(NavigationAction::Forward);
                    }
                    ui.add(egui::Label::new(address).truncate(true));
                });
            });
        });
        action
    }

    fn layout_remaining_width(&self) -> f32 {
        self.window
            .as_ref()
            .map(|w| (w.width - 2.0 * PADDING_M).max(0.0))
            .unwrap_or(0.0)
    }

    fn reserve(&mut self, size: Vec2) -> PanelBounds {
        let Some(window) = self.window.as_mut() else {
            return PanelBounds::new(Vec3::ZERO, size.extend(0.0));
        };
        let center = Vec3::new(0.0, window.cursor_y - size.y * 0.5, 0.0);
        window.cursor_y -= size.y + PADDING_M;
        PanelBounds::new(center, size.extend(0.0))
    }

    fn draw_frame(&mut self, id: InstanceId, frame: &Arc<PixelFrame>, generation: u64, bounds: &PanelBounds) {
        let Some(pose) = self.window.as_ref().map(|w| w.pose) else {
            return;
        };
        let rect = self.bounds_rect(&pose, bounds);
        let texture = self
            .textures
            .texture(self.ui.ctx(), id, frame, generation);
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        self.painter
            .image(texture, rect, uv, egui::Color32::WHITE);
    }

    fn panel_presses(&mut self, _id: InstanceId, volume: &PanelBounds) -> Vec<HandPress> {
        let Some(pose) = self.window.as_ref().map(|w| w.pose) else {
            return Vec::new();
        };
        let rect = self.bounds_rect(&pose, volume);
        let (pos, origin, down) = self.ui.input(|i| {
            (
                i.pointer.interact_pos(),
                i.pointer.press_origin(),
                i.pointer.primary_down(),
            )
        });
        let (Some(pos), Some(origin)) = (pos, origin) else {
            return Vec::new();
        };
        // Only presses that began on this panel drive it, so a drag may
        // leave the panel without losing its gesture.
        if !down || !rect.contains(origin) || rect.width() <= 0.0 || rect.height() <= 0.0 {
            return Vec::new();
        }
        let normalized = Vec2::new(
            (pos.x - rect.min.x) / rect.width(),
            (pos.y - rect.min.y) / rect.height(),
        );
        let panel = Panel {
            pose,
            bounds: *volume,
        };
        vec![HandPress {
            hand: Hand::Right,
            fingertip: unproject(&panel, normalized),
            radius: MOUSE_RADIUS_PX,
        }]
    }
}
