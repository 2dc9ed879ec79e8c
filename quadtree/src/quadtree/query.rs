use super::*;
use common::shapes::{Point, Ray, Rectangle};
use std::sync::Arc;

// Queries return broad-phase candidates: every collider stored in a visited
// node, in the sets selected by the mode. Callers narrow with exact tests.
impl<C: Collider> QuadTreeInner<C> {
    /// Descends through the single quadrant containing `point`, collecting
    /// every node on the path. A point outside the maintained area only sees
    /// the root.
    pub fn query_point(&self, point: Point, mode: QueryMode) -> Vec<Arc<C>> {
        let mut out = Vec::new();
        let Some(mut current) = self.root else {
            return out;
        };
        if !self.area.contains_point(point.x, point.y) {
            self.node(current).collect_into(mode, &mut out);
            return out;
        }
        loop {
            let node = self.node(current);
            node.collect_into(mode, &mut out);
            let Some(children) = node.children else {
                break;
            };
            current = children[Quadrant::of(node.area.center(), point) as usize];
        }
        out
    }

    pub fn query_rect(&self, rect: &Rectangle, mode: QueryMode) -> Vec<Arc<C>> {
        self.collect_where(mode, |area| area.intersects(rect))
    }

    pub fn query_ray(&self, ray: &Ray, mode: QueryMode) -> Vec<Arc<C>> {
        self.collect_where(mode, |area| ray_rect_raw(ray, area))
    }

    // The root is always collected so overflow items stay reachable. Children
    // are entered when `enter` accepts their loose area.
    fn collect_where(&self, mode: QueryMode, enter: impl Fn(&Rectangle) -> bool) -> Vec<Arc<C>> {
        let mut out = Vec::new();
        let Some(root) = self.root else {
            return out;
        };
        let mut stack = NodeStack::new();
        stack.push(root);
        while let Some(current) = stack.pop() {
            let node = self.node(current);
            node.collect_into(mode, &mut out);
            if let Some(children) = node.children {
                for child in children {
                    if enter(&self.node(child).area.expanded(self.loose_offset)) {
                        stack.push(child);
                    }
                }
            }
        }
        out
    }
}
