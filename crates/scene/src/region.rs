use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use serde::Serialize;

/// How much of the plane a world claims.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Extent {
    /// Rectangle declared with `size="<w> <h>"`.
    Bounded { bounds: Aabb2 },
    /// The main world: contains every point.
    Unbounded,
}

/// A named, positioned area of the canvas that corresponds to one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldRegion {
    /// Page title shown in the tab when this world is active.
    pub name: String,
    /// URL the fragment was loaded from; identity for active-world changes
    /// and link targets.
    pub url: String,
    /// Where links to this world send the camera.
    pub position: Vec2,
    pub extent: Extent,
}

impl WorldRegion {
    /// A bounded world occupying `origin..origin + size`, centred on its
    /// centroid.
    pub fn bounded(name: impl Into<String>, url: impl Into<String>, origin: Vec2, size: Vec2) -> Self {
        let bounds = Aabb2::from_origin_size(origin, size);
        Self {
            name: name.into(),
            url: url.into(),
            position: bounds.center(),
            extent: Extent::Bounded { bounds },
        }
    }

    /// The unbounded main world, positioned at its load offset.
    pub fn main(name: impl Into<String>, url: impl Into<String>, origin: Vec2) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            position: origin,
            extent: Extent::Unbounded,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        match &self.extent {
            Extent::Bounded { bounds } => bounds.contains(p),
            Extent::Unbounded => true,
        }
    }

    pub fn bounds(&self) -> Option<Aabb2> {
        match &self.extent {
            Extent::Bounded { bounds } => Some(*bounds),
            Extent::Unbounded => None,
        }
    }

    pub fn is_main(&self) -> bool {
        matches!(self.extent, Extent::Unbounded)
    }
}
