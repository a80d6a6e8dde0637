//! Link rewiring: internal hrefs become animated camera moves.

use foundation::math::Vec2;

use crate::registry::WorldRegistry;

/// Duration of the camera move triggered by an internal link.
pub const SNAP_DURATION_MS: f64 = 500.0;

/// True for hrefs that should be intercepted. Absolute URLs (with a scheme
/// or protocol-relative), fragment-only links and empty hrefs keep their
/// default behaviour.
pub fn is_internal_href(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("//") {
        return false;
    }
    let head = href.split(['/', '?', '#']).next().unwrap_or_default();
    !head.contains(':')
}

/// Where a click on `href` sends the camera. Unknown targets fall back to the
/// origin.
pub fn snap_target(registry: &WorldRegistry, href: &str) -> Vec2 {
    registry.position_of(href.trim()).unwrap_or(Vec2::ZERO)
}
