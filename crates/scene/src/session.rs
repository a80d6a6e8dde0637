use foundation::math::{Placement, Vec2};
use foundation::time::Millis;
use runtime::event_bus::{EventBus, Severity};
use runtime::frame::Frame;

use crate::aside::AsideRegistry;
use crate::camera::Camera2D;
use crate::links;
use crate::overlay::OverlayRegistry;
use crate::region::WorldRegion;
use crate::registry::WorldRegistry;
use crate::resolver::{ActiveWorldTracker, WorldChange};
use crate::stage::Stage;

/// Everything one page session accumulates: the registries written by the
/// loader and read every tick by the overlay sync and active-world
/// resolution.
///
/// `H` is the host's handle for a DOM element.
#[derive(Debug)]
pub struct Session<H> {
    pub worlds: WorldRegistry,
    pub overlays: OverlayRegistry<H>,
    pub asides: AsideRegistry<H>,
    pub stage: Stage,
    pub tracker: ActiveWorldTracker,
    pub events: EventBus,
    frame: Option<Frame>,
}

impl<H> Default for Session<H> {
    fn default() -> Self {
        Self {
            worlds: WorldRegistry::new(),
            overlays: OverlayRegistry::new(),
            asides: AsideRegistry::new(),
            stage: Stage::new(),
            tracker: ActiveWorldTracker::new(),
            events: EventBus::new(),
            frame: None,
        }
    }
}

impl<H> Session<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_index(&self) -> u64 {
        self.frame.map_or(0, |f| f.index)
    }

    /// Logs through `log` and records the same diagnostic on the event bus.
    pub fn record(&mut self, severity: Severity, kind: &'static str, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Info => log::info!("{kind}: {message}"),
            Severity::Warn => log::warn!("{kind}: {message}"),
            Severity::Error => log::error!("{kind}: {message}"),
        }
        let frame_index = self.frame_index();
        self.events.emit(frame_index, severity, kind, message);
    }

    pub fn register_world(&mut self, region: WorldRegion) {
        let summary = match region.bounds() {
            Some(b) => format!(
                "{} ({}) bounded [{}, {}] to [{}, {}]",
                region.name, region.url, b.min.x, b.min.y, b.max.x, b.max.y
            ),
            None => format!("{} ({}) main", region.name, region.url),
        };
        if let Some(previous) = self.worlds.register(region) {
            self.record(
                Severity::Warn,
                "main_world_replaced",
                format!("main world {} replaced", previous.url),
            );
        }
        self.record(Severity::Info, "world_registered", summary);
        self.tracker.invalidate();
    }

    pub fn add_overlay(&mut self, handle: H, placement: Placement) {
        self.overlays.add(handle, placement);
    }

    pub fn add_aside(&mut self, handle: H, url: impl Into<String>) {
        self.asides.add(handle, url);
    }

    /// Camera destination for a click on `href`, looked up at click time.
    pub fn link_target(&self, href: &str) -> Vec2 {
        links::snap_target(&self.worlds, href)
    }

    /// Advances the frame counter.
    pub fn tick(&mut self, now: Millis) -> Frame {
        let frame = match self.frame {
            Some(previous) => previous.next(now),
            None => Frame::first(now),
        };
        self.frame = Some(frame);
        frame
    }

    pub fn sync_overlays(&self, camera: &Camera2D, apply: impl FnMut(&H, &str)) {
        self.overlays.sync(camera, apply);
    }

    /// Re-resolves the active world for `center`; returns it when it changed.
    pub fn resolve_active(&mut self, center: Vec2) -> Option<WorldChange> {
        let change = self.tracker.update(center, &self.worlds)?;
        self.record(
            Severity::Info,
            "active_world",
            format!("{} ({})", change.name, change.url),
        );
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::region::WorldRegion;
    use foundation::math::Vec2;
    use foundation::time::Millis;
    use runtime::event_bus::Severity;

    #[test]
    fn replacing_main_world_warns() {
        let mut session: Session<u32> = Session::new();
        session.register_world(WorldRegion::main("a", "/a.html", Vec2::ZERO));
        session.register_world(WorldRegion::main("b", "/b.html", Vec2::ZERO));

        assert_eq!(session.worlds.main().unwrap().url, "/b.html");
        let warnings: Vec<_> = session.events.of_kind("main_world_replaced").collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Warn);
        assert!(warnings[0].message.contains("/a.html"));
    }

    #[test]
    fn registration_reopens_resolution_for_static_camera() {
        let mut session: Session<u32> = Session::new();
        session.register_world(WorldRegion::main("home", "/", Vec2::ZERO));
        assert_eq!(session.resolve_active(Vec2::new(5.0, 5.0)).unwrap().url, "/");

        session.register_world(WorldRegion::bounded(
            "b",
            "/b.html",
            Vec2::ZERO,
            Vec2::new(10.0, 10.0),
        ));
        assert_eq!(
            session.resolve_active(Vec2::new(5.0, 5.0)).unwrap().url,
            "/b.html"
        );
        assert_eq!(session.events.of_kind("active_world").count(), 2);
    }

    #[test]
    fn tick_counts_frames() {
        let mut session: Session<u32> = Session::new();
        assert_eq!(session.tick(Millis(10.0)).index, 0);
        let frame = session.tick(Millis(26.0));
        assert_eq!(frame.index, 1);
        assert_eq!(frame.dt_ms, 16.0);
        session.record(Severity::Error, "test", "boom");
        assert_eq!(session.events.events()[0].frame_index, 1);
    }
}
