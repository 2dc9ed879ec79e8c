use common::shapes::{Point, Polygon, Ray, Rectangle, Shape};
use nalgebra::{Isometry2, Point2, Vector2};
use parry2d::bounding_volume::Aabb;
use parry2d::query::{self, PointQuery, RayCast};
use parry2d::shape::ConvexPolygon;

/// Convex hull of a polygon's world vertices, or `None` when it is degenerate
/// (fewer than three non-collinear points).
pub fn to_convex(polygon: &Polygon) -> Option<ConvexPolygon> {
    let points: Vec<Point2<f32>> = polygon
        .world_vertices()
        .iter()
        .map(|v| Point2::new(v.x, v.y))
        .collect();
    ConvexPolygon::from_convex_hull(&points)
}

fn to_aabb(rect: &Rectangle) -> Aabb {
    Aabb::new(
        Point2::new(rect.left(), rect.top()),
        Point2::new(rect.right(), rect.bottom()),
    )
}

fn to_parry_ray(ray: &Ray) -> query::Ray {
    query::Ray::new(
        Point2::new(ray.origin.x, ray.origin.y),
        Vector2::new(ray.direction.x, ray.direction.y),
    )
}

// Separating-axis test; degenerate shapes fall back to their bounding boxes.
pub fn polygon_polygon(a: &Polygon, b: &Polygon) -> bool {
    let (Some(hull_a), Some(hull_b)) = (to_convex(a), to_convex(b)) else {
        return a.bounding_box().intersects(&b.bounding_box());
    };
    let identity = Isometry2::identity();
    query::intersection_test(&identity, &hull_a, &identity, &hull_b).unwrap_or(false)
}

pub fn polygon_contains_point(polygon: &Polygon, point: Point) -> bool {
    match to_convex(polygon) {
        Some(hull) => hull.contains_local_point(&Point2::new(point.x, point.y)),
        None => polygon.bounding_box().contains_point(point.x, point.y),
    }
}

pub fn ray_polygon(ray: &Ray, polygon: &Polygon) -> bool {
    let parry_ray = to_parry_ray(ray);
    match to_convex(polygon) {
        Some(hull) => hull.intersects_local_ray(&parry_ray, f32::MAX),
        None => to_aabb(&polygon.bounding_box()).intersects_local_ray(&parry_ray, f32::MAX),
    }
}
