use foundation::math::Vec2;
use serde::Serialize;

use crate::region::WorldRegion;

/// Every world loaded this session.
///
/// Bounded worlds are kept in registration order, which is also resolution
/// priority: the first bounded world containing a point wins, and the main
/// world catches everything else. Duplicate URLs are allowed.
#[derive(Debug, Default, Serialize)]
pub struct WorldRegistry {
    bounded: Vec<WorldRegion>,
    main: Option<WorldRegion>,
}

impl WorldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a world. An unbounded world replaces the current main world,
    /// which is returned.
    pub fn register(&mut self, region: WorldRegion) -> Option<WorldRegion> {
        if region.is_main() {
            self.main.replace(region)
        } else {
            self.bounded.push(region);
            None
        }
    }

    pub fn bounded(&self) -> &[WorldRegion] {
        &self.bounded
    }

    pub fn main(&self) -> Option<&WorldRegion> {
        self.main.as_ref()
    }

    pub fn len(&self) -> usize {
        self.bounded.len() + usize::from(self.main.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The world that owns `p`.
    pub fn resolve(&self, p: Vec2) -> Option<&WorldRegion> {
        self.bounded
            .iter()
            .find(|w| w.contains(p))
            .or(self.main.as_ref())
    }

    /// Registered position for the first world loaded from `url`.
    pub fn position_of(&self, url: &str) -> Option<Vec2> {
        self.bounded
            .iter()
            .chain(self.main.as_ref())
            .find(|w| w.url == url)
            .map(|w| w.position)
    }
}

#[cfg(test)]
mod tests {
    use super::WorldRegistry;
    use crate::region::WorldRegion;
    use foundation::math::Vec2;

    fn registry() -> WorldRegistry {
        let mut r = WorldRegistry::new();
        r.register(WorldRegion::main("home", "/", Vec2::ZERO));
        r.register(WorldRegion::bounded(
            "a",
            "/a.html",
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 100.0),
        ));
        r.register(WorldRegion::bounded(
            "b",
            "/b.html",
            Vec2::new(50.0, 50.0),
            Vec2::new(100.0, 100.0),
        ));
        r
    }

    #[test]
    fn first_registered_match_wins() {
        let r = registry();
        assert_eq!(r.resolve(Vec2::new(75.0, 75.0)).unwrap().url, "/a.html");
        assert_eq!(r.resolve(Vec2::new(125.0, 125.0)).unwrap().url, "/b.html");
    }

    #[test]
    fn falls_back_to_main_world() {
        let r = registry();
        assert_eq!(r.resolve(Vec2::new(-500.0, 3.0)).unwrap().url, "/");
        assert!(WorldRegistry::new().resolve(Vec2::ZERO).is_none());
    }

    #[test]
    fn resolution_is_deterministic_and_always_contains_center() {
        let r = registry();
        for x in (-50..=200).step_by(25) {
            for y in (-50..=200).step_by(25) {
                let p = Vec2::new(x as f64, y as f64);
                let first = r.resolve(p).unwrap();
                assert!(first.contains(p));
                assert_eq!(r.resolve(p), Some(first));
            }
        }
    }

    #[test]
    fn main_world_is_replaced_last_wins() {
        let mut r = registry();
        let previous = r.register(WorldRegion::main("other", "/other.html", Vec2::ZERO));
        assert_eq!(previous.unwrap().url, "/");
        assert_eq!(r.main().unwrap().url, "/other.html");
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn position_lookup_prefers_first_registration() {
        let mut r = registry();
        r.register(WorldRegion::bounded(
            "a again",
            "/a.html",
            Vec2::new(1000.0, 0.0),
            Vec2::new(10.0, 10.0),
        ));
        assert_eq!(r.position_of("/a.html"), Some(Vec2::new(50.0, 50.0)));
        assert_eq!(r.position_of("/"), Some(Vec2::ZERO));
        assert_eq!(r.position_of("/missing.html"), None);
    }
}
