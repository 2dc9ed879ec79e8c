use crate::object::{GameObject, ObjectId};
use common::shapes::{Point, Polygon, Ray, Rectangle, Shape};
use parking_lot::RwLock;
use quadtree::{Collider, ColliderId};
use std::sync::{Arc, Weak};

/// Polygon collision shape owned by a game object. Physics moves the polygon
/// in place; the tree picks up the new bounding box on the next sweep.
pub struct PolygonCollider {
    id: ColliderId,
    owner: ObjectId,
    object: Weak<GameObject>,
    polygon: RwLock<Polygon>,
    is_static: bool,
}

impl PolygonCollider {
    pub fn new(
        id: ColliderId,
        object: &Arc<GameObject>,
        polygon: Polygon,
        is_static: bool,
    ) -> Self {
        Self {
            id,
            owner: object.id(),
            object: Arc::downgrade(object),
            polygon: RwLock::new(polygon),
            is_static,
        }
    }

    /// Builds a collider for `object` and attaches it as its collider component.
    pub fn attach(
        id: ColliderId,
        object: &Arc<GameObject>,
        polygon: Polygon,
        is_static: bool,
    ) -> Arc<PolygonCollider> {
        let collider = Arc::new(Self::new(id, object, polygon, is_static));
        object.attach(collider.clone());
        collider
    }

    pub fn owner_id(&self) -> ObjectId {
        self.owner
    }

    pub fn object(&self) -> Option<Arc<GameObject>> {
        self.object.upgrade()
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn polygon(&self) -> Polygon {
        self.polygon.read().clone()
    }

    pub fn set_position(&self, position: Point) {
        self.polygon.write().set_position(position);
    }

    pub fn translate(&self, dx: f32, dy: f32) {
        self.polygon.write().translate(dx, dy);
    }

    pub fn set_rotation(&self, rotation_deg: f32) {
        self.polygon.write().set_rotation_deg(rotation_deg);
    }

    pub fn name_is(&self, name: &str) -> bool {
        self.object().map_or(false, |object| object.name() == name)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.object().map_or(false, |object| object.has_tag(tag))
    }

    pub fn contains_point(&self, point: Point) -> bool {
        collisions::polygon_contains_point(&self.polygon.read(), point)
    }

    pub fn intersects_polygon(&self, polygon: &Polygon) -> bool {
        collisions::polygon_polygon(&self.polygon.read(), polygon)
    }

    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        collisions::ray_polygon(ray, &self.polygon.read())
    }
}

impl Collider for PolygonCollider {
    fn id(&self) -> ColliderId {
        self.id
    }

    fn bounding_box(&self) -> Rectangle {
        self.polygon.read().bounding_box()
    }

    fn anchor(&self) -> Point {
        self.polygon.read().position()
    }
}
