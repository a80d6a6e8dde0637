use foundation::math::{Placement, Vec2};

/// World-space position and rotation of a stage entity.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Radians, clockwise on screen.
    pub rotation: f64,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
        }
    }
}

impl From<Placement> for Transform {
    fn from(p: Placement) -> Self {
        Self {
            position: p.origin,
            rotation: p.angle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Transform;
    use foundation::math::{Placement, Vec2};

    #[test]
    fn identity_is_origin() {
        let transform = Transform::identity();
        assert_eq!(transform.position, Vec2::ZERO);
        assert_eq!(transform.rotation, 0.0);
    }

    #[test]
    fn from_placement_keeps_angle() {
        let t = Transform::from(Placement::new(Vec2::new(1.0, 2.0), 0.5));
        assert_eq!(t.position, Vec2::new(1.0, 2.0));
        assert_eq!(t.rotation, 0.5);
    }
}
