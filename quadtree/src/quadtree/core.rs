use super::*;
use crate::error::{QuadtreeError, QuadtreeResult};
use common::shapes::Rectangle;
use fxhash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, trace};

impl<C: Collider> QuadTreeInner<C> {
    pub fn new_with_config(area: Rectangle, config: Config) -> QuadtreeResult<Self> {
        if !(config.min_division >= Config::MIN_DIVISION_FLOOR) {
            return Err(QuadtreeError::MinDivisionTooSmall {
                min_division: config.min_division,
                min: Config::MIN_DIVISION_FLOOR,
            });
        }
        if !(area.width.is_finite() && area.height.is_finite())
            || area.width <= 0.0
            || area.height <= 0.0
        {
            return Err(QuadtreeError::InvalidArea {
                width: area.width,
                height: area.height,
            });
        }
        let loose_offset = if config.loose_offset > 0.0 {
            config.loose_offset
        } else {
            0.0
        };
        Ok(Self {
            area,
            load_factor: config.load_factor.max(1),
            min_division: config.min_division,
            loose_offset,
            root: None,
            nodes: Vec::with_capacity(config.node_pool_size),
            free_nodes: Vec::new(),
            lookup: FxHashMap::default(),
        })
    }

    pub fn new(area: Rectangle, load_factor: usize, min_division: f32) -> QuadtreeResult<Self> {
        Self::new_with_config(
            area,
            Config {
                load_factor,
                min_division,
                ..Config::default()
            },
        )
    }

    pub fn area(&self) -> Rectangle {
        self.area
    }

    pub fn load_factor(&self) -> usize {
        self.load_factor
    }

    pub fn min_division(&self) -> f32 {
        self.min_division
    }

    pub fn loose_offset(&self) -> f32 {
        self.loose_offset
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn insert(&mut self, collider: Arc<C>) -> QuadtreeResult<()> {
        let id = collider.id();
        if self.lookup.contains_key(&id) {
            return Err(QuadtreeError::AlreadyTracked(id));
        }
        self.insert_unchecked(collider);
        Ok(())
    }

    pub(crate) fn insert_unchecked(&mut self, collider: Arc<C>) {
        let root = self.ensure_root();
        let bb = collider.bounding_box();
        if section_of(&self.area, &bb) == Section::Overflow {
            debug!(id = %collider.id(), ?bb, "collider overflows maintained area");
            self.place(root, ItemClass::Inline, collider);
            return;
        }
        self.insert_from(root, collider, &bb);
    }

    // Below the root a box is routed by quadrant alone. The caller has already
    // checked it against the maintained area, and a closed bounds test
    // against a child area can miss by rounding.
    fn insert_from(&mut self, start: NodeId, collider: Arc<C>, bb: &Rectangle) {
        let mut current = start;
        loop {
            let node = self.node(current);
            let Some(children) = node.children else {
                trace!(id = %collider.id(), node = %current, "insert into leaf");
                self.place(current, ItemClass::Normal, collider);
                if self.node(current).can_split() {
                    self.split(current);
                }
                return;
            };
            match quadrant_section(&node.area, bb) {
                Section::Child(quadrant) => current = children[quadrant as usize],
                Section::Overlap | Section::Overflow => {
                    trace!(id = %collider.id(), node = %current, "overlap, insert inline");
                    self.place(current, ItemClass::Inline, collider);
                    return;
                }
            }
        }
    }

    fn split(&mut self, id: NodeId) {
        let (area, depth) = {
            let node = self.node(id);
            (node.area, node.depth)
        };
        let mut children = [id; 4];
        for quadrant in Quadrant::ALL {
            let child = self.alloc_node(quadrant.child_area(&area), Some(id), depth + 1);
            children[quadrant as usize] = child;
        }
        let items = {
            let node = self.node_mut(id);
            node.children = Some(children);
            std::mem::take(&mut node.items)
        };
        debug!(node = %id, ?area, items = items.len(), "split");
        for collider in items {
            let bb = collider.bounding_box();
            match section_of(&area, &bb) {
                Section::Child(quadrant) => {
                    self.insert_from(children[quadrant as usize], collider, &bb)
                }
                // Items that drifted past this cell wait inline for the next sweep.
                Section::Overlap | Section::Overflow => {
                    self.place(id, ItemClass::Inline, collider)
                }
            }
        }
    }
}
