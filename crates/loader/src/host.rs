use formats::Element;
use foundation::math::Vec2;
use scene::Session;

/// Where loaded fragments materialise: owns the session and turns elements
/// into live nodes.
///
/// Implementations hold the session behind interior mutability. The loader
/// only borrows it inside [`SceneHost::with_session`] and never across an
/// await, so render ticks can read it while a fetch is pending.
pub trait SceneHost {
    type Handle;

    fn with_session<R>(&self, f: impl FnOnce(&mut Session<Self::Handle>) -> R) -> R;

    /// Creates the overlay node for `element`. `internal_links` lists the
    /// hrefs inside it that should become camera moves instead of
    /// navigation.
    fn materialize_overlay(&self, element: &Element, internal_links: &[String]) -> Option<Self::Handle>;

    /// Adds an `<aside>` from the fragment at `url` to the side panel
    /// container.
    fn attach_aside(&self, element: &Element, url: &str) -> Option<Self::Handle>;

    /// Appends a `<style>` to the document head.
    fn hoist_style(&self, element: &Element);

    /// Centres the camera on the top-level `<camera xy>`. Called once the
    /// root fragment has registered, before any nested fetch.
    fn center_camera(&self, center: Vec2);
}
