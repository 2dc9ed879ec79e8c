use crate::collider::PolygonCollider;
use crate::object::GameObject;
use crate::system::CollisionSystem;
use common::shapes::{Point, Polygon, Ray, Rectangle, Shape};
use quadtree::{Collider, QueryMode};
use std::sync::Arc;

// Point variants broad-phase with a zero-sized rectangle so colliders that
// drifted inside the loose margin are still found, then test the polygon.
impl CollisionSystem {
    fn candidates_at(&self, point: Point, mode: QueryMode) -> Vec<Arc<PolygonCollider>> {
        self.tree.query_rect(&Rectangle::new(point.x, point.y, 0.0, 0.0), mode)
    }

    pub fn collider_at_with<F>(
        &self,
        point: Point,
        mode: QueryMode,
        filter: F,
    ) -> Option<Arc<PolygonCollider>>
    where
        F: Fn(&PolygonCollider) -> bool,
    {
        self.candidates_at(point, mode)
            .into_iter()
            .find(|c| c.contains_point(point) && filter(c))
    }

    pub fn colliders_at_with<F>(
        &self,
        point: Point,
        mode: QueryMode,
        filter: F,
    ) -> Vec<Arc<PolygonCollider>>
    where
        F: Fn(&PolygonCollider) -> bool,
    {
        self.candidates_at(point, mode)
            .into_iter()
            .filter(|c| c.contains_point(point) && filter(c))
            .collect()
    }

    pub fn collider_at(&self, point: Point, mode: QueryMode) -> Option<Arc<PolygonCollider>> {
        self.collider_at_with(point, mode, |_| true)
    }

    pub fn colliders_at(&self, point: Point, mode: QueryMode) -> Vec<Arc<PolygonCollider>> {
        self.colliders_at_with(point, mode, |_| true)
    }

    pub fn collider_at_with_name(
        &self,
        point: Point,
        name: &str,
        mode: QueryMode,
    ) -> Option<Arc<PolygonCollider>> {
        self.collider_at_with(point, mode, |c| c.name_is(name))
    }

    pub fn colliders_at_with_name(
        &self,
        point: Point,
        name: &str,
        mode: QueryMode,
    ) -> Vec<Arc<PolygonCollider>> {
        self.colliders_at_with(point, mode, |c| c.name_is(name))
    }

    pub fn collider_at_with_tag(
        &self,
        point: Point,
        tag: &str,
        mode: QueryMode,
    ) -> Option<Arc<PolygonCollider>> {
        self.collider_at_with(point, mode, |c| c.has_tag(tag))
    }

    pub fn colliders_at_with_tag(
        &self,
        point: Point,
        tag: &str,
        mode: QueryMode,
    ) -> Vec<Arc<PolygonCollider>> {
        self.colliders_at_with(point, mode, |c| c.has_tag(tag))
    }

    pub fn object_at(&self, point: Point, mode: QueryMode) -> Option<Arc<GameObject>> {
        self.collider_at_with(point, mode, |c| c.object().is_some())
            .and_then(|c| c.object())
    }

    pub fn objects_at(&self, point: Point, mode: QueryMode) -> Vec<Arc<GameObject>> {
        self.colliders_at(point, mode)
            .iter()
            .filter_map(|c| c.object())
            .collect()
    }

    pub fn object_at_with_name(
        &self,
        point: Point,
        name: &str,
        mode: QueryMode,
    ) -> Option<Arc<GameObject>> {
        self.collider_at_with_name(point, name, mode)
            .and_then(|c| c.object())
    }

    pub fn has_any_object_at(&self, point: Point, mode: QueryMode) -> bool {
        self.object_at(point, mode).is_some()
    }

    pub fn has_object_at_with_name(&self, point: Point, name: &str, mode: QueryMode) -> bool {
        self.collider_at_with_name(point, name, mode).is_some()
    }

    pub fn has_object_at_with_tag(&self, point: Point, tag: &str, mode: QueryMode) -> bool {
        self.collider_at_with_tag(point, tag, mode).is_some()
    }

    /// True when some object at `point` carries every tag in `tags`.
    pub fn has_object_at_with_tags(&self, point: Point, tags: &[&str], mode: QueryMode) -> bool {
        self.objects_at(point, mode)
            .iter()
            .any(|object| object.has_tags(tags))
    }

    // Polygon variants: broad phase by the polygon's bounding box, then SAT.

    fn candidates_for(&self, polygon: &Polygon, mode: QueryMode) -> Vec<Arc<PolygonCollider>> {
        self.tree.query_rect(&polygon.bounding_box(), mode)
    }

    pub fn collider_at_polygon_with<F>(
        &self,
        polygon: &Polygon,
        mode: QueryMode,
        filter: F,
    ) -> Option<Arc<PolygonCollider>>
    where
        F: Fn(&PolygonCollider) -> bool,
    {
        self.candidates_for(polygon, mode)
            .into_iter()
            .find(|c| c.intersects_polygon(polygon) && filter(c))
    }

    pub fn colliders_at_polygon_with<F>(
        &self,
        polygon: &Polygon,
        mode: QueryMode,
        filter: F,
    ) -> Vec<Arc<PolygonCollider>>
    where
        F: Fn(&PolygonCollider) -> bool,
    {
        self.candidates_for(polygon, mode)
            .into_iter()
            .filter(|c| c.intersects_polygon(polygon) && filter(c))
            .collect()
    }

    pub fn collider_at_polygon(
        &self,
        polygon: &Polygon,
        mode: QueryMode,
    ) -> Option<Arc<PolygonCollider>> {
        self.collider_at_polygon_with(polygon, mode, |_| true)
    }

    pub fn colliders_at_polygon(
        &self,
        polygon: &Polygon,
        mode: QueryMode,
    ) -> Vec<Arc<PolygonCollider>> {
        self.colliders_at_polygon_with(polygon, mode, |_| true)
    }

    pub fn collider_at_polygon_with_name(
        &self,
        polygon: &Polygon,
        name: &str,
        mode: QueryMode,
    ) -> Option<Arc<PolygonCollider>> {
        self.collider_at_polygon_with(polygon, mode, |c| c.name_is(name))
    }

    pub fn collider_at_polygon_with_tag(
        &self,
        polygon: &Polygon,
        tag: &str,
        mode: QueryMode,
    ) -> Option<Arc<PolygonCollider>> {
        self.collider_at_polygon_with(polygon, mode, |c| c.has_tag(tag))
    }

    pub fn has_collider_at_polygon(&self, polygon: &Polygon, mode: QueryMode) -> bool {
        self.collider_at_polygon(polygon, mode).is_some()
    }

    pub fn has_collider_at_polygon_with_name(
        &self,
        polygon: &Polygon,
        name: &str,
        mode: QueryMode,
    ) -> bool {
        self.collider_at_polygon_with_name(polygon, name, mode).is_some()
    }

    pub fn has_collider_at_polygon_with_tag(
        &self,
        polygon: &Polygon,
        tag: &str,
        mode: QueryMode,
    ) -> bool {
        self.collider_at_polygon_with_tag(polygon, tag, mode).is_some()
    }

    /// Colliders whose bounding box intersects `rect`.
    pub fn colliders_in_rect(
        &self,
        rect: &Rectangle,
        mode: QueryMode,
    ) -> Vec<Arc<PolygonCollider>> {
        self.tree
            .query_rect(rect, mode)
            .into_iter()
            .filter(|c| c.bounding_box().intersects(rect))
            .collect()
    }

    pub fn colliders_on_ray(&self, ray: &Ray, mode: QueryMode) -> Vec<Arc<PolygonCollider>> {
        self.tree
            .query_ray(ray, mode)
            .into_iter()
            .filter(|c| c.intersects_ray(ray))
            .collect()
    }

    /// Broad-phase neighbours from the tree's point query, without narrowing.
    pub fn neighbors_at(&self, point: Point, mode: QueryMode) -> Vec<Arc<PolygonCollider>> {
        self.tree.query_point(point, mode)
    }

    pub fn neighbors_at_with<F>(
        &self,
        point: Point,
        mode: QueryMode,
        filter: F,
    ) -> Vec<Arc<PolygonCollider>>
    where
        F: Fn(&PolygonCollider) -> bool,
    {
        self.tree
            .query_point(point, mode)
            .into_iter()
            .filter(|c| filter(c))
            .collect()
    }

    /// Neighbours found at `collider`'s anchor, excluding `collider` itself.
    pub fn neighbors_of_collider(
        &self,
        collider: &PolygonCollider,
        mode: QueryMode,
    ) -> Vec<Arc<PolygonCollider>> {
        self.neighbors_of_collider_with(collider, mode, |_| true)
    }

    pub fn neighbors_of_collider_with<F>(
        &self,
        collider: &PolygonCollider,
        mode: QueryMode,
        filter: F,
    ) -> Vec<Arc<PolygonCollider>>
    where
        F: Fn(&PolygonCollider) -> bool,
    {
        let id = collider.id();
        self.neighbors_at_with(collider.anchor(), mode, |c| c.id() != id && filter(c))
    }
}
