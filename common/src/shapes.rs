use rand::Rng;
use std::fmt::Debug;

pub trait Shape: Debug {
    fn bounding_box(&self) -> Rectangle;
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    // Rotates around `pivot` by `radians`, counter-clockwise for y pointing up.
    pub fn rotate_around(&self, pivot: Point, radians: f32) -> Self {
        if radians == 0.0 {
            return *self;
        }
        let (sin, cos) = radians.sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Self {
            x: pivot.x + dx * cos - dy * sin,
            y: pivot.y + dx * sin + dy * cos,
        }
    }
}

/// Axis-aligned rectangle stored by its centre.
///
/// `top` is the smaller y edge and `bottom` the larger one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_left_top(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            x: left + width / 2.0,
            y: top + height / 2.0,
            width,
            height,
        }
    }

    pub fn from_min_max(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self::from_left_top(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn top_left(&self) -> (f32, f32) {
        (self.left(), self.top())
    }

    pub fn top_right(&self) -> (f32, f32) {
        (self.right(), self.top())
    }

    pub fn bottom_left(&self) -> (f32, f32) {
        (self.left(), self.bottom())
    }

    pub fn bottom_right(&self) -> (f32, f32) {
        (self.right(), self.bottom())
    }

    pub fn corners(&self) -> BoundingBox {
        BoundingBox::from_rectangle(self)
    }

    pub fn distance_to_point(&self, x: f32, y: f32) -> f32 {
        let dx = (x - self.x).abs() - self.width / 2.0;
        let dy = (y - self.y).abs() - self.height / 2.0;
        f32::max(dx, 0.0).powi(2) + f32::max(dy, 0.0).powi(2)
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    // Edges touching counts as intersecting.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.right() >= other.left()
            && self.left() <= other.right()
            && self.bottom() >= other.top()
            && self.top() <= other.bottom()
    }

    pub fn contains_rectangle(&self, inner: &Rectangle) -> bool {
        self.left() <= inner.left()
            && self.right() >= inner.right()
            && self.top() <= inner.top()
            && self.bottom() >= inner.bottom()
    }

    /// Grows the rectangle by `offset` on every side; negative values shrink it.
    pub fn expanded(&self, offset: f32) -> Rectangle {
        Rectangle {
            x: self.x,
            y: self.y,
            width: (self.width + offset * 2.0).max(0.0),
            height: (self.height + offset * 2.0).max(0.0),
        }
    }

    pub fn expand_to_include(&mut self, other: &Rectangle) {
        let left = f32::min(self.left(), other.left());
        let right = f32::max(self.right(), other.right());
        let top = f32::min(self.top(), other.top());
        let bottom = f32::max(self.bottom(), other.bottom());
        self.x = (left + right) / 2.0;
        self.y = (top + bottom) / 2.0;
        self.width = right - left;
        self.height = bottom - top;
    }

    pub fn to_polygon(&self) -> Polygon {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        Polygon::new(
            self.center(),
            vec![
                Point::new(-half_w, -half_h),
                Point::new(half_w, -half_h),
                Point::new(half_w, half_h),
                Point::new(-half_w, half_h),
            ],
        )
    }

    pub fn random_point_inside<R: Rng>(&self, margin: f32, rng: &mut R) -> Point {
        Point::new(
            self._safe_randf32(rng, self.left() + margin, self.right() - margin),
            self._safe_randf32(rng, self.top() + margin, self.bottom() - margin),
        )
    }

    fn _safe_randf32<R: Rng>(&self, rng: &mut R, min: f32, max: f32) -> f32 {
        if min > max {
            return min;
        }
        rng.gen_range(min..=max)
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }
}

impl Shape for Rectangle {
    fn bounding_box(&self) -> Rectangle {
        *self
    }
}

/// The four corners of an axis-aligned box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox(pub [Point; 4]);

impl BoundingBox {
    pub const TOP_LEFT: usize = 0;
    pub const TOP_RIGHT: usize = 1;
    pub const BOTTOM_LEFT: usize = 2;
    pub const BOTTOM_RIGHT: usize = 3;

    pub fn from_rectangle(rect: &Rectangle) -> Self {
        BoundingBox([
            Point::new(rect.left(), rect.top()),
            Point::new(rect.right(), rect.top()),
            Point::new(rect.left(), rect.bottom()),
            Point::new(rect.right(), rect.bottom()),
        ])
    }

    pub fn corners(&self) -> &[Point; 4] {
        &self.0
    }

    pub fn to_rectangle(&self) -> Rectangle {
        let tl = self.0[Self::TOP_LEFT];
        let br = self.0[Self::BOTTOM_RIGHT];
        Rectangle::from_min_max(tl.x, tl.y, br.x, br.y)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub direction: Point,
}

impl Ray {
    pub fn new(origin: Point, direction: Point) -> Self {
        Self { origin, direction }
    }

    pub fn through(origin: Point, target: Point) -> Self {
        Self {
            origin,
            direction: Point::new(target.x - origin.x, target.y - origin.y),
        }
    }

    pub fn point_at(&self, t: f32) -> Point {
        self.origin.offset(self.direction.x * t, self.direction.y * t)
    }
}

/// Convex polygon described by local vertices around an anchor `position`.
///
/// World vertices are `position + rotate(vertex - pivot, rotation) + pivot`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
    position: Point,
    pivot: Point,
    rotation_deg: f32,
}

impl Polygon {
    pub fn new(position: Point, vertices: Vec<Point>) -> Self {
        Self {
            vertices,
            position,
            pivot: Point::default(),
            rotation_deg: 0.0,
        }
    }

    pub fn with_rotation(
        position: Point,
        pivot: Point,
        rotation_deg: f32,
        vertices: Vec<Point>,
    ) -> Self {
        Self {
            vertices,
            position,
            pivot,
            rotation_deg,
        }
    }

    /// Axis-aligned box of `width` x `height` centred on `position`.
    pub fn rectangle(position: Point, width: f32, height: f32) -> Self {
        Rectangle::new(position.x, position.y, width, height).to_polygon()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.position = self.position.offset(dx, dy);
    }

    pub fn rotation_deg(&self) -> f32 {
        self.rotation_deg
    }

    pub fn set_rotation_deg(&mut self, rotation_deg: f32) {
        self.rotation_deg = rotation_deg;
    }

    pub fn local_vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn world_vertices(&self) -> Vec<Point> {
        let radians = self.rotation_deg.to_radians();
        self.vertices
            .iter()
            .map(|v| {
                v.rotate_around(self.pivot, radians)
                    .offset(self.position.x, self.position.y)
            })
            .collect()
    }
}

impl Shape for Polygon {
    fn bounding_box(&self) -> Rectangle {
        let vertices = self.world_vertices();
        let Some(first) = vertices.first() else {
            return Rectangle::new(self.position.x, self.position.y, 0.0, 0.0);
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for v in &vertices[1..] {
            min_x = min_x.min(v.x);
            min_y = min_y.min(v.y);
            max_x = max_x.max(v.x);
            max_y = max_y.max(v.y);
        }
        Rectangle::from_min_max(min_x, min_y, max_x, max_y)
    }
}
