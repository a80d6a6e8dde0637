use foundation::math::Vec2;

use crate::registry::WorldRegistry;

/// A new active world.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldChange {
    pub name: String,
    pub url: String,
}

/// Tracks which world the camera centre is in.
///
/// Resolution only runs when the centre moved since the previous call, or
/// after [`ActiveWorldTracker::invalidate`].
#[derive(Debug, Default)]
pub struct ActiveWorldTracker {
    last_center: Option<Vec2>,
    active_url: Option<String>,
}

impl ActiveWorldTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_url(&self) -> Option<&str> {
        self.active_url.as_deref()
    }

    /// Forces the next [`update`](Self::update) to resolve even if the camera
    /// has not moved. Called whenever the registry changes.
    pub fn invalidate(&mut self) {
        self.last_center = None;
    }

    /// Returns the newly active world when it differs by URL from the
    /// previous one.
    pub fn update(&mut self, center: Vec2, registry: &WorldRegistry) -> Option<WorldChange> {
        if self.last_center == Some(center) {
            return None;
        }
        self.last_center = Some(center);

        let world = registry.resolve(center)?;
        if self.active_url.as_deref() == Some(world.url.as_str()) {
            return None;
        }
        self.active_url = Some(world.url.clone());
        Some(WorldChange {
            name: world.name.clone(),
            url: world.url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ActiveWorldTracker, WorldChange};
    use crate::region::WorldRegion;
    use crate::registry::WorldRegistry;
    use foundation::math::Vec2;

    fn registry() -> WorldRegistry {
        let mut r = WorldRegistry::new();
        r.register(WorldRegion::main("Home", "/", Vec2::ZERO));
        r.register(WorldRegion::bounded(
            "Blog",
            "/blog.html",
            Vec2::new(100.0, 0.0),
            Vec2::new(50.0, 50.0),
        ));
        r
    }

    #[test]
    fn reports_changes_only() {
        let r = registry();
        let mut tracker = ActiveWorldTracker::new();
        assert_eq!(
            tracker.update(Vec2::ZERO, &r),
            Some(WorldChange {
                name: "Home".into(),
                url: "/".into()
            })
        );
        assert_eq!(tracker.update(Vec2::new(1.0, 1.0), &r), None);
        let change = tracker.update(Vec2::new(120.0, 10.0), &r).unwrap();
        assert_eq!(change.url, "/blog.html");
        assert_eq!(tracker.active_url(), Some("/blog.html"));
        assert_eq!(tracker.update(Vec2::new(-5.0, 0.0), &r).unwrap().name, "Home");
    }

    #[test]
    fn unchanged_center_skips_resolution_until_invalidated() {
        let mut r = WorldRegistry::new();
        r.register(WorldRegion::main("Home", "/", Vec2::ZERO));
        let mut tracker = ActiveWorldTracker::new();
        let center = Vec2::new(10.0, 10.0);
        assert!(tracker.update(center, &r).is_some());

        r.register(WorldRegion::bounded(
            "Late",
            "/late.html",
            Vec2::ZERO,
            Vec2::new(20.0, 20.0),
        ));
        assert_eq!(tracker.update(center, &r), None);

        tracker.invalidate();
        assert_eq!(tracker.update(center, &r).unwrap().url, "/late.html");
    }

    #[test]
    fn empty_registry_has_no_active_world() {
        let mut tracker = ActiveWorldTracker::new();
        assert_eq!(tracker.update(Vec2::ZERO, &WorldRegistry::new()), None);
        assert_eq!(tracker.active_url(), None);
    }
}
