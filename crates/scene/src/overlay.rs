use foundation::math::{Placement, Vec2};

use crate::camera::Camera2D;

/// A DOM element pinned to a world-space placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay<H> {
    pub handle: H,
    pub placement: Placement,
}

/// CSS `transform` for an overlay whose top-left corner projects to `screen`.
pub fn overlay_transform(screen: Vec2, rotation: f64, scale: f64) -> String {
    format!(
        "translate({}px, {}px) rotate({}rad) scale({})",
        screen.x, screen.y, rotation, scale
    )
}

/// Every overlay materialised this session, in creation order. Overlays are
/// never removed.
#[derive(Debug)]
pub struct OverlayRegistry<H> {
    overlays: Vec<Overlay<H>>,
}

impl<H> Default for OverlayRegistry<H> {
    fn default() -> Self {
        Self {
            overlays: Vec::new(),
        }
    }
}

impl<H> OverlayRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, handle: H, placement: Placement) {
        self.overlays.push(Overlay { handle, placement });
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay<H>> {
        self.overlays.iter()
    }

    /// Projects every overlay through `camera` and hands its transform to
    /// `apply`. No dirty tracking: all overlays are visited every call.
    pub fn sync(&self, camera: &Camera2D, mut apply: impl FnMut(&H, &str)) {
        let scale = camera.scale();
        for overlay in &self.overlays {
            let screen = camera.to_screen(overlay.placement.origin);
            let transform = overlay_transform(screen, overlay.placement.angle, scale);
            apply(&overlay.handle, &transform);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{OverlayRegistry, overlay_transform};
    use crate::camera::Camera2D;
    use foundation::math::{Placement, Vec2};
    use pretty_assertions::assert_eq;

    #[test]
    fn transform_string_format() {
        assert_eq!(
            overlay_transform(Vec2::new(12.5, -3.0), 0.25, 2.0),
            "translate(12.5px, -3px) rotate(0.25rad) scale(2)"
        );
    }

    #[test]
    fn sync_projects_through_camera() {
        let mut overlays = OverlayRegistry::new();
        overlays.add("a", Placement::new(Vec2::new(5.0, 5.0), 0.0));
        overlays.add("b", Placement::new(Vec2::new(-10.0, 0.0), 1.5));
        let camera = Camera2D::new(Vec2::new(200.0, 100.0));

        let mut out = Vec::new();
        overlays.sync(&camera, |h, t| out.push((*h, t.to_string())));
        assert_eq!(
            out,
            vec![
                ("a", "translate(105px, 55px) rotate(0rad) scale(1)".to_string()),
                ("b", "translate(90px, 50px) rotate(1.5rad) scale(1)".to_string()),
            ]
        );
    }

    #[test]
    fn resync_with_unchanged_camera_is_idempotent() {
        let mut overlays = OverlayRegistry::new();
        overlays.add(0usize, Placement::new(Vec2::new(3.25, 7.5), 0.1));
        let mut camera = Camera2D::new(Vec2::new(640.0, 480.0));
        camera.zoom_about(Vec2::new(10.0, 20.0), 1.7);

        let mut first = Vec::new();
        let mut second = Vec::new();
        overlays.sync(&camera, |_, t| first.push(t.to_string()));
        overlays.sync(&camera, |_, t| second.push(t.to_string()));
        assert_eq!(first, second);
    }
}
