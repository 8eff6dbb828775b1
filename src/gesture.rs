//! Per-panel touch gesture state machine.
//!
//! Driven once per render step by the set of hands currently pressing the
//! panel. The owning hand's fingertip is projected each step; start, move and
//! end events are emitted with dead-zone filtering on moves.

use crate::projection::Projection;
use glam::{Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

/// One hand satisfying the panel's press condition this step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPress {
    pub hand: Hand,
    pub fingertip: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
    pub radius_x: f32,
    pub radius_y: f32,
}

impl TouchPoint {
    fn at(pixel: Vec2, radius: f32) -> Self {
        Self {
            x: pixel.x,
            y: pixel.y,
            radius_x: radius,
            radius_y: radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub point: TouchPoint,
}

impl TouchEvent {
    pub fn position(&self) -> (f32, f32) {
        (self.point.x, self.point.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Started,
    Moving,
    /// Held only while the end event is built; the dispatcher is back to
    /// `Idle` before `step` returns, so `phase()` never reports it.
    Ended,
}

/// Dead-zone radii in surface pixels. `start_deadzone_px` is measured from
/// the press anchor, `move_deadzone_px` from the last emitted move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub start_deadzone_px: f32,
    pub move_deadzone_px: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            start_deadzone_px: 6.0,
            move_deadzone_px: 1.0,
        }
    }
}

#[derive(Debug)]
pub struct GestureDispatcher {
    config: GestureConfig,
    phase: GesturePhase,
    hand: Option<Hand>,
    anchor: Vec2,
    last: Vec2,
    radius: f32,
}

impl GestureDispatcher {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            phase: GesturePhase::Idle,
            hand: None,
            anchor: Vec2::ZERO,
            last: Vec2::ZERO,
            radius: 0.0,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Hand that owns the active gesture, if any.
    pub fn active_hand(&self) -> Option<Hand> {
        self.hand
    }

    pub fn anchor(&self) -> Option<Vec2> {
        self.hand.map(|_| self.anchor)
    }

    /// Advance one render step. `project` maps a pressing hand onto the
    /// panel; a point off the panel may continue a gesture but never starts
    /// one.
    pub fn step<F>(&mut self, presses: &[HandPress], mut project: F) -> Option<TouchEvent>
    where
        F: FnMut(&HandPress) -> Option<Projection>,
    {
        match (self.phase, self.hand) {
            (GesturePhase::Started | GesturePhase::Moving, Some(owner)) => {
                match presses.iter().find(|press| press.hand == owner) {
                    Some(press) => {
                        self.phase = GesturePhase::Moving;
                        let projection = project(press)?;
                        self.drag_to(projection.pixel, press.radius)
                    }
                    None => Some(self.finish()),
                }
            }
            _ => {
                self.reset();
                presses.iter().find_map(|press| {
                    let projection = project(press).filter(Projection::in_bounds)?;
                    Some(self.begin(press, projection.pixel))
                })
            }
        }
    }

    fn begin(&mut self, press: &HandPress, at: Vec2) -> TouchEvent {
        self.phase = GesturePhase::Started;
        self.hand = Some(press.hand);
        self.anchor = at;
        self.last = at;
        self.radius = press.radius;
        tracing::trace!(hand = ?press.hand, x = at.x, y = at.y, "touch start");
        TouchEvent {
            phase: TouchPhase::Start,
            point: TouchPoint::at(at, press.radius),
        }
    }

    fn drag_to(&mut self, at: Vec2, radius: f32) -> Option<TouchEvent> {
        let past_start = outside(at, self.anchor, self.config.start_deadzone_px);
        let past_last = outside(at, self.last, self.config.move_deadzone_px);
        if !(past_start && past_last) {
            return None;
        }
        self.last = at;
        self.radius = radius;
        Some(TouchEvent {
            phase: TouchPhase::Move,
            point: TouchPoint::at(at, radius),
        })
    }

    // The releasing fingertip may already be out of tracking range, so the
    // end event reuses the last emitted point.
    fn finish(&mut self) -> TouchEvent {
        self.phase = GesturePhase::Ended;
        let event = TouchEvent {
            phase: TouchPhase::End,
            point: TouchPoint::at(self.last, self.radius),
        };
        tracing::trace!(x = self.last.x, y = self.last.y, "touch end");
        self.reset();
        event
    }

    fn reset(&mut self) {
        self.phase = GesturePhase::Idle;
        self.hand = None;
    }
}

#[inline]
fn outside(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) >= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_is_inclusive_of_the_radius() {
        assert!(outside(Vec2::new(6.0, 0.0), Vec2::ZERO, 6.0));
        assert!(!outside(Vec2::new(5.9, 0.0), Vec2::ZERO, 6.0));
    }

    #[test]
    fn idle_without_presses_emits_nothing() {
        let mut dispatcher = GestureDispatcher::new(GestureConfig::default());
        assert_eq!(dispatcher.step(&[], |_| None), None);
        assert_eq!(dispatcher.phase(), GesturePhase::Idle);
    }

    #[test]
    fn release_passes_through_ended_back_to_idle() {
        let mut dispatcher = GestureDispatcher::new(GestureConfig::default());
        dispatcher.begin(
            &HandPress {
                hand: Hand::Left,
                fingertip: Vec3::ZERO,
                radius: 1.0,
            },
            Vec2::new(4.0, 2.0),
        );
        assert_eq!(dispatcher.phase(), GesturePhase::Started);

        let event = dispatcher.step(&[], |_| None).unwrap();
        assert_eq!(event.phase, TouchPhase::End);
        assert_eq!(dispatcher.phase(), GesturePhase::Idle);
        assert_eq!(dispatcher.anchor(), None);
    }
}
