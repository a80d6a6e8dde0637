use foundation::math::Vec2;

/// Straight RGBA, each channel in `0..=1`.
pub type Rgba = [f32; 4];

pub const BOUNDARY_COLOR: Rgba = [1.0, 1.0, 1.0, 0.35];
pub const LABEL_COLOR: Rgba = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub enum Shape2D {
    /// Stroked rectangle whose top-left corner sits at the transform origin.
    Outline { size: Vec2, line_width: f64 },
    /// Filled circle centred on the transform origin.
    Disc { radius: f64 },
    /// Text whose top-left corner sits at the transform origin.
    Label { text: String, font_px: f64 },
}

/// Something drawn into the canvas scene beneath the DOM overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable2D {
    pub shape: Shape2D,
    pub color: Rgba,
}

impl Drawable2D {
    pub fn outline(size: Vec2) -> Self {
        Self {
            shape: Shape2D::Outline {
                size,
                line_width: 2.0,
            },
            color: BOUNDARY_COLOR,
        }
    }

    pub fn disc(radius: f64, color: Rgba) -> Self {
        Self {
            shape: Shape2D::Disc { radius },
            color,
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self {
            shape: Shape2D::Label {
                text: text.into(),
                font_px: 24.0,
            },
            color: LABEL_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Drawable2D, Shape2D};
    use foundation::math::Vec2;

    #[test]
    fn outline_uses_boundary_style() {
        let drawable = Drawable2D::outline(Vec2::new(2.0, 3.0));
        assert!(matches!(drawable.shape, Shape2D::Outline { .. }));
        assert_eq!(drawable.color, super::BOUNDARY_COLOR);
    }
}
