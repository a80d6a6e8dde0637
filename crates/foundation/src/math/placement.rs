use serde::{Deserialize, Serialize};

use super::Vec2;

/// Position plus orientation, the unit in which nested frames accumulate.
///
/// Frames compose by plain addition: a child placed at `xy`/`angle` inside a
/// parent frame gets `parent.origin + xy` and `parent.angle + angle`.
/// The parent rotation is not applied to the child offset.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub origin: Vec2,
    /// Radians, clockwise on screen.
    pub angle: f64,
}

impl Placement {
    pub const ORIGIN: Self = Self {
        origin: Vec2::ZERO,
        angle: 0.0,
    };

    pub const fn new(origin: Vec2, angle: f64) -> Self {
        Self { origin, angle }
    }

    pub fn then(self, local: Self) -> Self {
        Self {
            origin: self.origin + local.origin,
            angle: self.angle + local.angle,
        }
    }
}
