//! 2-D pan/zoom camera with animated snaps and drag inertia.

use std::collections::VecDeque;

use foundation::math::Vec2;
use foundation::time::Millis;

pub const DEFAULT_MIN_SCALE: f64 = 0.05;
pub const DEFAULT_MAX_SCALE: f64 = 20.0;

/// Speed (world units per ms) below which inertia stops.
const VELOCITY_THRESHOLD: f64 = 0.001;

/// Drag samples kept for release velocity.
const VELOCITY_HISTORY_SIZE: usize = 5;

/// Samples older than this at release are ignored.
const VELOCITY_WINDOW_MS: f64 = 100.0;

/// An in-flight animated move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub from: Vec2,
    pub to: Vec2,
    pub start: Millis,
    pub duration_ms: f64,
}

impl Snap {
    fn position_at(&self, now: Millis) -> (Vec2, bool) {
        if self.duration_ms <= 0.0 {
            return (self.to, true);
        }
        let t = (now.since(self.start) / self.duration_ms).min(1.0);
        if t >= 1.0 {
            (self.to, true)
        } else {
            (self.from.lerp(self.to, ease_in_out_quad(t)), false)
        }
    }
}

pub fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

#[derive(Debug, Clone, Copy)]
struct DragSample {
    delta: Vec2,
    time: Millis,
}

/// Camera looking at the world plane.
///
/// `center` is the world point under the middle of the viewport and `scale`
/// is screen pixels per world unit.
#[derive(Debug, Clone)]
pub struct Camera2D {
    center: Vec2,
    scale: f64,
    viewport: Vec2,
    min_scale: f64,
    max_scale: f64,
    snap: Option<Snap>,
    /// World units per millisecond.
    velocity: Vec2,
    dragging: bool,
    drag_history: VecDeque<DragSample>,
}

impl Camera2D {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            center: Vec2::ZERO,
            scale: 1.0,
            viewport,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            snap: None,
            velocity: Vec2::ZERO,
            dragging: false,
            drag_history: VecDeque::with_capacity(VELOCITY_HISTORY_SIZE),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn snap(&self) -> Option<&Snap> {
        self.snap.as_ref()
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Sets the zoom limits and re-clamps the current scale.
    pub fn set_scale_limits(&mut self, min: f64, max: f64) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min_scale = min.max(f64::MIN_POSITIVE);
        self.max_scale = max.max(self.min_scale);
        self.scale = self.scale.clamp(self.min_scale, self.max_scale);
    }

    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.center).scale(self.scale) + self.viewport.scale(0.5)
    }

    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.viewport.scale(0.5)).scale(1.0 / self.scale) + self.center
    }

    /// Jumps to `center`, cancelling any motion.
    pub fn move_center(&mut self, center: Vec2) {
        self.interrupt();
        self.center = center;
    }

    /// Moves the view so the world follows a screen-space drag of `delta`.
    pub fn pan_by_screen(&mut self, delta: Vec2) {
        self.center = self.center - delta.scale(1.0 / self.scale);
    }

    /// Multiplies the scale by `factor` (clamped), keeping the world point
    /// under `anchor` fixed on screen.
    pub fn zoom_about(&mut self, anchor: Vec2, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let pinned = self.to_world(anchor);
        self.scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        self.center = pinned - (anchor - self.viewport.scale(0.5)).scale(1.0 / self.scale);
    }

    /// Starts an eased move to `target`, replacing any snap in flight.
    pub fn snap_to(&mut self, target: Vec2, duration_ms: f64, now: Millis) {
        self.velocity = Vec2::ZERO;
        self.snap = Some(Snap {
            from: self.center,
            to: target,
            start: now,
            duration_ms,
        });
    }

    /// Cancels the snap and inertia. Any new gesture calls this.
    pub fn interrupt(&mut self) {
        self.snap = None;
        self.velocity = Vec2::ZERO;
    }

    pub fn begin_drag(&mut self, now: Millis) {
        self.interrupt();
        self.dragging = true;
        self.drag_history.clear();
        self.drag_history.push_back(DragSample {
            delta: Vec2::ZERO,
            time: now,
        });
    }

    /// Pans by a screen-space pointer delta while dragging.
    pub fn drag_by(&mut self, delta: Vec2, now: Millis) {
        if !self.dragging {
            return;
        }
        self.pan_by_screen(delta);
        if self.drag_history.len() == VELOCITY_HISTORY_SIZE {
            self.drag_history.pop_front();
        }
        self.drag_history.push_back(DragSample {
            delta: delta.scale(-1.0 / self.scale),
            time: now,
        });
    }

    /// Ends the drag. With `kinetic`, the recent drag speed carries on as
    /// inertia.
    pub fn end_drag(&mut self, now: Millis, kinetic: bool) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.velocity = if kinetic {
            self.release_velocity(now)
        } else {
            Vec2::ZERO
        };
        self.drag_history.clear();
    }

    fn release_velocity(&self, now: Millis) -> Vec2 {
        let recent: Vec<_> = self
            .drag_history
            .iter()
            .filter(|s| now.since(s.time) <= VELOCITY_WINDOW_MS)
            .collect();
        let (Some(first), Some(last)) = (recent.first(), recent.last()) else {
            return Vec2::ZERO;
        };
        let elapsed = last.time.since(first.time);
        if elapsed <= 0.0 {
            return Vec2::ZERO;
        }
        let travelled = recent
            .iter()
            .skip(1)
            .fold(Vec2::ZERO, |acc, s| acc + s.delta);
        travelled.scale(1.0 / elapsed)
    }

    /// Steps the snap animation or inertia. Returns true if the centre moved.
    ///
    /// A snap that reaches its end lands exactly on the target and is cleared.
    /// `damping_per_s` is the exponential decay rate of inertia.
    pub fn advance(&mut self, now: Millis, dt_ms: f64, damping_per_s: f64) -> bool {
        let before = self.center;
        if let Some(snap) = self.snap {
            let (position, done) = snap.position_at(now);
            self.center = position;
            if done {
                self.snap = None;
            }
        } else if !self.dragging && self.velocity != Vec2::ZERO {
            self.center = self.center + self.velocity.scale(dt_ms);
            self.velocity = self
                .velocity
                .scale((-damping_per_s.max(0.0) * dt_ms / 1000.0).exp());
            if self.velocity.length() < VELOCITY_THRESHOLD {
                self.velocity = Vec2::ZERO;
            }
        }
        self.center != before
    }
}

#[cfg(test)]
mod tests {
    use super::{Camera2D, ease_in_out_quad};
    use foundation::math::Vec2;
    use foundation::time::Millis;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn projection_round_trips() {
        let mut camera = Camera2D::new(Vec2::new(800.0, 600.0));
        camera.move_center(Vec2::new(40.0, -20.0));
        camera.zoom_about(Vec2::new(400.0, 300.0), 2.0);
        assert_eq!(camera.to_screen(Vec2::new(40.0, -20.0)), Vec2::new(400.0, 300.0));
        let p = Vec2::new(13.0, 77.0);
        assert!(approx(camera.to_world(camera.to_screen(p)), p));
    }

    #[test]
    fn zoom_keeps_anchor_fixed_and_clamps() {
        let mut camera = Camera2D::new(Vec2::new(800.0, 600.0));
        let anchor = Vec2::new(100.0, 50.0);
        let before = camera.to_world(anchor);
        camera.zoom_about(anchor, 3.0);
        assert!(approx(camera.to_world(anchor), before));

        camera.zoom_about(anchor, 1000.0);
        assert_eq!(camera.scale(), super::DEFAULT_MAX_SCALE);
        camera.zoom_about(anchor, 1e-9);
        assert_eq!(camera.scale(), super::DEFAULT_MIN_SCALE);
    }

    #[test]
    fn pan_moves_world_with_pointer() {
        let mut camera = Camera2D::new(Vec2::new(100.0, 100.0));
        camera.zoom_about(Vec2::new(50.0, 50.0), 2.0);
        camera.pan_by_screen(Vec2::new(20.0, -10.0));
        assert_eq!(camera.center(), Vec2::new(-10.0, 5.0));
    }

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(0.5), 0.5);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        assert!(ease_in_out_quad(0.25) < 0.25);
    }

    #[test]
    fn snap_lands_exactly_and_clears() {
        let mut camera = Camera2D::new(Vec2::new(100.0, 100.0));
        let target = Vec2::new(20.0, 20.0);
        camera.snap_to(target, 500.0, Millis(1000.0));

        assert!(camera.advance(Millis(1250.0), 250.0, 4.0));
        assert!(approx(camera.center(), Vec2::new(10.0, 10.0)));
        assert!(camera.snap().is_some());

        camera.advance(Millis(1500.0), 250.0, 4.0);
        assert_eq!(camera.center(), target);
        assert!(camera.snap().is_none());

        camera.snap_to(Vec2::ZERO, 500.0, Millis(2000.0));
        camera.advance(Millis(2600.0), 600.0, 4.0);
        assert_eq!(camera.center(), Vec2::ZERO);
        assert!(camera.snap().is_none());
    }

    #[test]
    fn gesture_interrupts_snap() {
        let mut camera = Camera2D::new(Vec2::new(100.0, 100.0));
        camera.snap_to(Vec2::new(500.0, 0.0), 500.0, Millis(0.0));
        camera.advance(Millis(100.0), 100.0, 4.0);
        camera.begin_drag(Millis(100.0));
        assert!(camera.snap().is_none());
        let held = camera.center();
        camera.end_drag(Millis(120.0), false);
        assert!(!camera.advance(Millis(200.0), 80.0, 4.0));
        assert_eq!(camera.center(), held);
    }

    #[test]
    fn kinetic_release_coasts_and_decays() {
        let mut camera = Camera2D::new(Vec2::new(100.0, 100.0));
        camera.begin_drag(Millis(0.0));
        for i in 1..=4 {
            camera.drag_by(Vec2::new(-10.0, 0.0), Millis(i as f64 * 10.0));
        }
        camera.end_drag(Millis(40.0), true);
        assert!(approx(camera.velocity(), Vec2::new(1.0, 0.0)));

        let released_at = camera.center();
        assert!(camera.advance(Millis(56.0), 16.0, 4.0));
        assert!(camera.center().x > released_at.x);
        assert!(camera.velocity().x < 1.0);

        let mut now = 56.0;
        while camera.velocity() != Vec2::ZERO && now < 60_000.0 {
            now += 16.0;
            camera.advance(Millis(now), 16.0, 4.0);
        }
        assert_eq!(camera.velocity(), Vec2::ZERO);
    }
}
