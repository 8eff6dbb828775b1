use glam::{Quat, Vec2, Vec3};
use xr_window_manager::projection::{project, unproject, Panel, PanelBounds, Pose};

const EPS: f32 = 1e-4;

fn panel_at(pose: Pose) -> Panel {
    Panel {
        pose,
        bounds: PanelBounds::new(Vec3::ZERO, Vec3::new(0.6, 0.3375, 0.0)),
    }
}

fn close(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < EPS
}

#[test]
fn centre_projects_to_the_middle() {
    let panel = panel_at(Pose::in_front(0.5));
    let p = project(&panel, Vec3::new(0.0, 0.0, -0.5), (1920, 1080)).unwrap();

    assert!(close(p.centered, Vec2::ZERO));
    assert!(close(p.normalized, Vec2::new(0.5, 0.5)));
    assert!(close(p.pixel, Vec2::new(960.0, 540.0)));
    assert!(p.in_bounds());
}

#[test]
fn top_left_corner_is_the_origin() {
    let panel = panel_at(Pose::in_front(0.5));
    let corner = Vec3::new(-0.3, 0.16875, -0.5);
    let p = project(&panel, corner, (1920, 1080)).unwrap();

    assert!(close(p.centered, Vec2::new(-1.0, -1.0)));
    assert!(close(p.normalized, Vec2::ZERO));
    assert!(close(p.pixel, Vec2::ZERO));
}

#[test]
fn bottom_right_corner_is_full_size() {
    let panel = panel_at(Pose::in_front(0.5));
    let p = project(&panel, Vec3::new(0.3, -0.16875, -0.5), (100, 50)).unwrap();

    assert!(close(p.normalized, Vec2::ONE));
    assert!(close(p.pixel, Vec2::new(100.0, 50.0)));
}

#[test]
fn depth_does_not_move_the_point() {
    let panel = panel_at(Pose::in_front(0.5));
    let hovering = project(&panel, Vec3::new(0.15, 0.0, -0.45), (100, 50)).unwrap();
    let pushed = project(&panel, Vec3::new(0.15, 0.0, -0.52), (100, 50)).unwrap();

    assert!(close(hovering.normalized, pushed.normalized));
    assert!((hovering.distance - 0.05).abs() < EPS);
    assert!((pushed.distance + 0.02).abs() < EPS);
}

#[test]
fn points_off_the_panel_are_not_clamped() {
    let panel = panel_at(Pose::in_front(0.5));
    let p = project(&panel, Vec3::new(0.6, 0.0, -0.5), (100, 50)).unwrap();

    assert!(close(p.normalized, Vec2::new(1.5, 0.5)));
    assert!(!p.in_bounds());
}

#[test]
fn rotated_panel_uses_its_own_axes() {
    // Turned to face +X; the panel's right edge now points towards -Z.
    let pose = Pose::new(Vec3::new(1.0, 0.0, 0.0), Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
    let panel = panel_at(pose);
    let p = project(&panel, Vec3::new(1.0, 0.0, -0.3), (100, 50)).unwrap();

    assert!(close(p.normalized, Vec2::new(1.0, 0.5)));
}

#[test]
fn unproject_lands_back_on_the_same_pixel() {
    let pose = Pose::new(Vec3::new(0.2, 1.4, -0.7), Quat::from_rotation_x(-0.3));
    let panel = panel_at(pose);
    let target = Vec2::new(0.25, 0.8);

    let world = unproject(&panel, target);
    let p = project(&panel, world, (400, 300)).unwrap();

    assert!(close(p.normalized, target));
    assert!(p.distance.abs() < EPS);
}

#[test]
fn degenerate_inputs_yield_nothing() {
    let panel = panel_at(Pose::IDENTITY);
    assert!(project(&panel, Vec3::ZERO, (0, 50)).is_none());

    let flat = Panel {
        pose: Pose::IDENTITY,
        bounds: PanelBounds::new(Vec3::ZERO, Vec3::new(0.0, 0.3, 0.0)),
    };
    assert!(project(&flat, Vec3::ZERO, (100, 50)).is_none());
}
