//! Spatial-to-planar projection of a tracked fingertip onto an overlay panel.
//!
//! Conventions: panel-local space has +x to the right, +y up and +z towards
//! the viewer; the front face is the plane `z = center.z + depth / 2`.
//! Centred coordinates span [-1, 1] with the panel centre at (0, 0) and the
//! top-left corner at (-1, -1). Normalised coordinates span [0, 1] with the
//! origin at the top-left corner, x right, y down. Nothing is clamped.

use glam::{Quat, Vec2, Vec3};

/// Position and orientation of an overlay window in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// A pose `distance` metres in front of the viewer, facing back at them.
    pub fn in_front(distance: f32) -> Self {
        Self::new(Vec3::new(0.0, 0.0, -distance), Quat::IDENTITY)
    }

    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.orientation.inverse() * (world - self.position)
    }

    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }
}

/// Region reserved for a panel, in its window's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelBounds {
    pub center: Vec3,
    pub dimensions: Vec3,
}

impl PanelBounds {
    pub fn new(center: Vec3, dimensions: Vec3) -> Self {
        Self { center, dimensions }
    }

    /// Grow the bounds towards the viewer so a fingertip resting just in
    /// front of the surface still counts as touching it.
    pub fn press_volume(&self, offset: f32, depth: f32) -> Self {
        Self {
            center: self.center + Vec3::new(0.0, 0.0, offset),
            dimensions: self.dimensions + Vec3::new(0.0, 0.0, depth),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub pose: Pose,
    pub bounds: PanelBounds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Plane {
    point: Vec3,
    normal: Vec3,
}

impl Plane {
    fn signed_distance(&self, p: Vec3) -> f32 {
        (p - self.point).dot(self.normal)
    }

    fn closest(&self, p: Vec3) -> Vec3 {
        p - self.normal * self.signed_distance(p)
    }
}

/// Where a tracked point lands on a panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub centered: Vec2,
    pub normalized: Vec2,
    /// Normalised position scaled to the surface's native pixel size.
    pub pixel: Vec2,
    /// Signed distance from the front face, positive towards the viewer.
    pub distance: f32,
}

impl Projection {
    pub fn in_bounds(&self) -> bool {
        (0.0..=1.0).contains(&self.normalized.x) && (0.0..=1.0).contains(&self.normalized.y)
    }
}

/// Project a world-space point onto the panel's front face and express it in
/// the surface's pixel space. `None` for degenerate panels or surfaces.
pub fn project(panel: &Panel, world_point: Vec3, surface_size: (u32, u32)) -> Option<Projection> {
    let bounds = &panel.bounds;
    let dims = bounds.dimensions;
    let (width, height) = surface_size;
    if dims.x <= 0.0 || dims.y <= 0.0 || width == 0 || height == 0 {
        return None;
    }

    let local = panel.pose.to_local(world_point);
    let face = front_face(bounds);
    let on_face = face.closest(local);

    let offset = on_face - bounds.center;
    let centered = Vec2::new(offset.x / (dims.x * 0.5), -offset.y / (dims.y * 0.5));
    let normalized = (centered + Vec2::ONE) * 0.5;
    let pixel = normalized * Vec2::new(width as f32, height as f32);

    Some(Projection {
        centered,
        normalized,
        pixel,
        distance: face.signed_distance(local),
    })
}

/// World-space point on the front face for a normalised panel coordinate.
pub fn unproject(panel: &Panel, normalized: Vec2) -> Vec3 {
    let bounds = &panel.bounds;
    let half = bounds.dimensions * 0.5;
    let centered = normalized * 2.0 - Vec2::ONE;
    let local = bounds.center + Vec3::new(centered.x * half.x, -centered.y * half.y, half.z);
    panel.pose.to_world(local)
}

fn front_face(bounds: &PanelBounds) -> Plane {
    Plane {
        point: bounds.center + Vec3::Z * (bounds.dimensions.z * 0.5),
        normal: Vec3::Z,
    }
}
