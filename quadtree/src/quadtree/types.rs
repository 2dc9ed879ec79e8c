use common::shapes::{Point, Ray, Rectangle};
use smallvec::SmallVec;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u32);

impl fmt::Display for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collider #{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node #{}", self.0)
    }
}

/// What the tree needs from a collider. Geometry may change between calls;
/// the tree re-reads it on every placement and sweep.
pub trait Collider: Send + Sync {
    fn id(&self) -> ColliderId;
    fn bounding_box(&self) -> Rectangle;
    fn anchor(&self) -> Point {
        self.bounding_box().center()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryMode {
    ActiveOnly,
    InactiveOnly,
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemClass {
    Normal,
    Inline,
    Inactive,
}

/// Child slot of a split node. "North" is the +y half.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    NorthEast = 0,
    NorthWest = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthEast,
        Quadrant::NorthWest,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    // Points on the centre lines belong to the west/south side.
    #[inline(always)]
    pub fn of(center: Point, p: Point) -> Quadrant {
        match (p.x > center.x, p.y > center.y) {
            (true, true) => Quadrant::NorthEast,
            (false, true) => Quadrant::NorthWest,
            (false, false) => Quadrant::SouthWest,
            (true, false) => Quadrant::SouthEast,
        }
    }

    // Built from the parent's own edges and centre so siblings share them.
    pub fn child_area(self, area: &Rectangle) -> Rectangle {
        let (cx, cy) = (area.x, area.y);
        match self {
            Quadrant::NorthEast => Rectangle::from_min_max(cx, cy, area.right(), area.bottom()),
            Quadrant::NorthWest => Rectangle::from_min_max(area.left(), cy, cx, area.bottom()),
            Quadrant::SouthWest => Rectangle::from_min_max(area.left(), area.top(), cx, cy),
            Quadrant::SouthEast => Rectangle::from_min_max(cx, area.top(), area.right(), cy),
        }
    }
}

/// Where a bounding box lands relative to a node's four quadrants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Child(Quadrant),
    Overlap,
    Overflow,
}

/// Classifies `bb` against `area` by its four corners. Any corner outside
/// `area` makes it `Overflow`; corners in more than one quadrant make it
/// `Overlap`.
pub fn section_of(area: &Rectangle, bb: &Rectangle) -> Section {
    let corners = bb.corners();
    if corners
        .corners()
        .iter()
        .any(|corner| !area.contains_point(corner.x, corner.y))
    {
        return Section::Overflow;
    }
    quadrant_section(area, bb)
}

/// Like [`section_of`] but without the bounds check: only the quadrants of
/// `area`'s centre that the corners fall in are considered. Never `Overflow`.
pub fn quadrant_section(area: &Rectangle, bb: &Rectangle) -> Section {
    let center = area.center();
    let mut hit = [false; 4];
    for corner in bb.corners().corners() {
        hit[Quadrant::of(center, *corner) as usize] = true;
    }
    let mut found = None;
    for (i, quadrant) in Quadrant::ALL.iter().enumerate() {
        if hit[i] {
            if found.is_some() {
                return Section::Overlap;
            }
            found = Some(*quadrant);
        }
    }
    match found {
        Some(quadrant) => Section::Child(quadrant),
        None => Section::Overlap,
    }
}

pub(crate) type NodeStack = SmallVec<[NodeId; 64]>;

// Slab test against a closed rectangle for t >= 0.
pub(crate) fn ray_rect_raw(ray: &Ray, rect: &Rectangle) -> bool {
    let mut t_min = 0.0f32;
    let mut t_max = f32::INFINITY;
    let axes = [
        (ray.origin.x, ray.direction.x, rect.left(), rect.right()),
        (ray.origin.y, ray.direction.y, rect.top(), rect.bottom()),
    ];
    for (origin, dir, min, max) in axes {
        if dir == 0.0 {
            if origin < min || origin > max {
                return false;
            }
            continue;
        }
        let t1 = (min - origin) / dir;
        let t2 = (max - origin) / dir;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return false;
        }
    }
    true
}
