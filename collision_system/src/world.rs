use crate::collider::PolygonCollider;
use crate::config::SystemConfig;
use crate::error::{CollisionError, CollisionResult};
use crate::object::{GameObject, ObjectId};
use crate::system::{CollisionSystem, SweepReport};
use common::shapes::Polygon;
use fxhash::FxHashMap;
use quadtree::ColliderId;
use std::sync::Arc;
use tracing::debug;

/// Owns the spawned objects and the collision system that indexes them, and
/// hands out object and collider ids.
pub struct World {
    next_object: u32,
    next_collider: u32,
    objects: FxHashMap<ObjectId, Arc<GameObject>>,
    collision: CollisionSystem,
}

impl World {
    pub fn new(config: SystemConfig) -> CollisionResult<Self> {
        Ok(Self {
            next_object: 0,
            next_collider: 0,
            objects: FxHashMap::default(),
            collision: CollisionSystem::new(config)?,
        })
    }

    /// Creates an object that is not yet part of the world.
    pub fn create_object(&mut self, name: &str, tags: &[&str]) -> Arc<GameObject> {
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        Arc::new(GameObject::new(id, name).with_tags(tags.iter().copied()))
    }

    pub fn attach_collider(
        &mut self,
        object: &Arc<GameObject>,
        polygon: Polygon,
        is_static: bool,
    ) -> Arc<PolygonCollider> {
        let id = ColliderId(self.next_collider);
        self.next_collider += 1;
        PolygonCollider::attach(id, object, polygon, is_static)
    }

    /// Adds `object` to the world, registering it for collision when it
    /// carries a collider.
    pub fn spawn(&mut self, object: Arc<GameObject>) -> CollisionResult<()> {
        if object.collider().is_some() {
            self.collision.register(&object)?;
        }
        debug!(object = %object.id(), name = object.name(), "spawn");
        self.objects.insert(object.id(), object);
        Ok(())
    }

    pub fn despawn(&mut self, id: ObjectId) -> CollisionResult<Arc<GameObject>> {
        let object = self.objects.remove(&id).ok_or(CollisionError::UnknownObject(id))?;
        if self.collision.is_registered(&object) {
            self.collision.unregister(&object)?;
        }
        debug!(object = %id, "despawn");
        Ok(object)
    }

    pub fn activate(&self, id: ObjectId) -> CollisionResult<()> {
        let object = self.spawned(id)?;
        if object.collider().is_none() && !self.collision.is_registered(object) {
            return Ok(());
        }
        self.collision.activate(object)
    }

    pub fn deactivate(&self, id: ObjectId) -> CollisionResult<()> {
        let object = self.spawned(id)?;
        if object.collider().is_none() && !self.collision.is_registered(object) {
            return Ok(());
        }
        self.collision.deactivate(object)
    }

    fn spawned(&self, id: ObjectId) -> CollisionResult<&Arc<GameObject>> {
        self.objects.get(&id).ok_or(CollisionError::UnknownObject(id))
    }

    pub fn object(&self, id: ObjectId) -> Option<Arc<GameObject>> {
        self.objects.get(&id).cloned()
    }

    pub fn objects(&self) -> impl Iterator<Item = &Arc<GameObject>> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn collision(&self) -> &CollisionSystem {
        &self.collision
    }

    /// Runs one simulation tick's index maintenance.
    pub fn tick(&self) -> SweepReport {
        self.collision.execute()
    }
}
