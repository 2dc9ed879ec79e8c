use crate::collider::PolygonCollider;
use crate::config::SystemConfig;
use crate::error::{CollisionError, CollisionResult};
use crate::object::{GameObject, ObjectId};
use quadtree::{
    quadrant_section, section_of, Collider, ColliderId, ItemClass, QuadTree, QuadTreeInner,
    QuadtreeError, Section,
};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub visited: usize,
    pub reinserted: usize,
}

/// Keeps the spatial index in step with the game objects registered with it.
pub struct CollisionSystem {
    pub(crate) tree: Arc<QuadTree<PolygonCollider>>,
}

impl CollisionSystem {
    pub fn new(config: SystemConfig) -> CollisionResult<Self> {
        let tree = QuadTree::new_with_config(config.area, config.index)?;
        Ok(Self {
            tree: Arc::new(tree),
        })
    }

    /// Shared handle for read-only consumers such as debug drawing.
    pub fn tree(&self) -> Arc<QuadTree<PolygonCollider>> {
        self.tree.clone()
    }

    /// Moves every collider that left its cell to where it now belongs.
    ///
    /// Normal items are kept while their bounding box stays inside the owning
    /// node's area grown by the loose offset. Below the root, inline items are
    /// kept while they stay inside that grown area and still straddle the
    /// node's centre. The root keeps inline items that overflow the maintained
    /// area, and straddling ones only once it has children. Inactive and static
    /// colliders are left alone. Failing colliders are all removed first and
    /// re-inserted after.
    ///
    /// Panics if the index refuses to move a collider it just reported, which
    /// means its lookup is corrupt.
    pub fn execute(&self) -> SweepReport {
        let mut tree = self.tree.lock();
        let loose_offset = tree.loose_offset();
        let mut report = SweepReport::default();
        let mut evicted = Vec::new();

        tree.traverse(|collider, node, class, _| {
            report.visited += 1;
            if collider.is_static() {
                return false;
            }
            let bb = collider.bounding_box();
            let loose = node.area().expanded(loose_offset);
            let keep = match class {
                ItemClass::Normal => loose.contains_rectangle(&bb),
                ItemClass::Inline if node.is_root() => match section_of(&node.area(), &bb) {
                    Section::Overflow => true,
                    Section::Overlap => !node.is_leaf(),
                    Section::Child(_) => false,
                },
                ItemClass::Inline => {
                    loose.contains_rectangle(&bb)
                        && quadrant_section(&node.area(), &bb) == Section::Overlap
                }
                ItemClass::Inactive => true,
            };
            if !keep {
                evicted.push(collider.id());
            }
            false
        });

        let mut moved = Vec::with_capacity(evicted.len());
        for id in evicted {
            match tree.delete(id) {
                Ok(collider) => moved.push(collider),
                Err(err) => panic!("sweep could not remove {id}: {err}"),
            }
        }
        for collider in moved {
            let id = collider.id();
            if let Err(err) = tree.insert(collider) {
                panic!("sweep could not re-insert {id}: {err}");
            }
            report.reinserted += 1;
        }

        debug!(visited = report.visited, reinserted = report.reinserted, "sweep");
        report
    }

    pub fn register(&self, object: &GameObject) -> CollisionResult<()> {
        let result = match object.collider() {
            Some(collider) => self.tree.insert(collider).map_err(CollisionError::from),
            None => Err(CollisionError::MissingCollider(object.id())),
        };
        logged("register", object.id(), result)
    }

    /// Removes the object's collider, found by owner so this still works after
    /// the collider component was detached from the object.
    pub fn unregister(&self, object: &GameObject) -> CollisionResult<Arc<PolygonCollider>> {
        let mut tree = self.tree.lock();
        let result = match find_by_owner(&tree, object.id()) {
            Some(id) => tree.delete(id).map_err(CollisionError::from),
            None => Err(CollisionError::NotRegistered(object.id())),
        };
        logged("unregister", object.id(), result)
    }

    pub fn activate(&self, object: &GameObject) -> CollisionResult<()> {
        let result = self
            .tracked_id(object)
            .and_then(|id| self.tree.activate(id).map_err(|err| not_registered(object, err)));
        logged("activate", object.id(), result)
    }

    pub fn deactivate(&self, object: &GameObject) -> CollisionResult<()> {
        let result = self
            .tracked_id(object)
            .and_then(|id| self.tree.deactivate(id).map_err(|err| not_registered(object, err)));
        logged("deactivate", object.id(), result)
    }

    pub fn is_registered(&self, object: &GameObject) -> bool {
        self.tracked_id(object).is_ok()
    }

    fn tracked_id(&self, object: &GameObject) -> CollisionResult<ColliderId> {
        if let Some(collider) = object.collider() {
            if self.tree.contains(collider.id()) {
                return Ok(collider.id());
            }
        }
        let tree = self.tree.lock();
        find_by_owner(&tree, object.id()).ok_or(CollisionError::NotRegistered(object.id()))
    }
}

fn find_by_owner(tree: &QuadTreeInner<PolygonCollider>, owner: ObjectId) -> Option<ColliderId> {
    let mut found = None;
    tree.traverse(|collider, _, _, _| {
        if collider.owner_id() == owner {
            found = Some(collider.id());
            return true;
        }
        false
    });
    found
}

fn not_registered(object: &GameObject, err: QuadtreeError) -> CollisionError {
    match err {
        QuadtreeError::UnknownCollider(_) => CollisionError::NotRegistered(object.id()),
        other => other.into(),
    }
}

fn logged<T>(op: &'static str, object: ObjectId, result: CollisionResult<T>) -> CollisionResult<T> {
    if let Err(err) = &result {
        warn!(%object, %err, "collision system {} failed", op);
    }
    result
}
