use crate::components::{Drawable2D, Transform};
use crate::entity::EntityId;
use foundation::handles::Handle;
use foundation::math::Placement;

/// Everything drawn on the 2-D canvas under the DOM overlays: world
/// boundaries, their labels, and shapes added by extensions.
///
/// Entities are never despawned within a session, so draw order is spawn
/// order.
#[derive(Debug, Default)]
pub struct Stage {
    next_index: u32,
    transforms: Vec<Option<Transform>>,
    drawables: Vec<Option<Drawable2D>>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId(Handle::new(self.next_index, 0));
        self.next_index += 1;
        self.ensure_capacity(id.index() as usize);
        id
    }

    /// Spawns an entity with both components set.
    pub fn add(&mut self, placement: Placement, drawable: Drawable2D) -> EntityId {
        let entity = self.spawn();
        self.set_transform(entity, placement.into());
        self.set_drawable(entity, drawable);
        entity
    }

    pub fn set_transform(&mut self, entity: EntityId, transform: Transform) {
        self.ensure_capacity(entity.index() as usize);
        self.transforms[entity.index() as usize] = Some(transform);
    }

    pub fn set_drawable(&mut self, entity: EntityId, drawable: Drawable2D) {
        self.ensure_capacity(entity.index() as usize);
        self.drawables[entity.index() as usize] = Some(drawable);
    }

    pub fn transform(&self, entity: EntityId) -> Option<Transform> {
        self.transforms.get(entity.index() as usize).and_then(|t| *t)
    }

    pub fn len(&self) -> usize {
        self.next_index as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0
    }

    /// Entities with both a transform and a drawable, in spawn order.
    pub fn drawables(&self) -> Vec<(EntityId, Transform, &Drawable2D)> {
        let mut out = Vec::new();
        for (idx, drawable) in self.drawables.iter().enumerate() {
            let Some(drawable) = drawable else { continue };
            let Some(transform) = self.transforms.get(idx).and_then(|t| *t) else {
                continue;
            };
            out.push((EntityId(Handle::new(idx as u32, 0)), transform, drawable));
        }
        out
    }

    fn ensure_capacity(&mut self, idx: usize) {
        if self.transforms.len() <= idx {
            let new_len = idx + 1;
            self.transforms.resize(new_len, None);
            self.drawables.resize(new_len, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Stage;
    use crate::components::{Drawable2D, Transform};
    use foundation::math::{Placement, Vec2};

    #[test]
    fn add_and_collect_drawables() {
        let mut stage = Stage::new();
        let entity = stage.add(
            Placement::new(Vec2::new(3.0, 4.0), 0.0),
            Drawable2D::outline(Vec2::new(1.0, 1.0)),
        );

        let drawables = stage.drawables();
        assert_eq!(drawables.len(), 1);
        assert_eq!(drawables[0].0, entity);
        assert_eq!(drawables[0].1.position, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn entities_without_drawable_are_skipped() {
        let mut stage = Stage::new();
        let bare = stage.spawn();
        stage.set_transform(bare, Transform::identity());
        let label = stage.add(Placement::ORIGIN, Drawable2D::label("hi"));

        let ids: Vec<_> = stage.drawables().iter().map(|d| d.0).collect();
        assert_eq!(ids, vec![label]);
        assert_eq!(stage.len(), 2);
    }

    #[test]
    fn draw_order_is_spawn_order() {
        let mut stage = Stage::new();
        let a = stage.add(Placement::ORIGIN, Drawable2D::label("a"));
        let b = stage.add(Placement::ORIGIN, Drawable2D::label("b"));
        let ids: Vec<_> = stage.drawables().iter().map(|d| d.0).collect();
        assert_eq!(ids, vec![a, b]);
    }
}
