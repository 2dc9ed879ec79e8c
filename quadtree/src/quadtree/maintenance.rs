use super::*;
use crate::error::{QuadtreeError, QuadtreeResult};
use std::sync::Arc;
use tracing::debug;

impl<C: Collider> QuadTreeInner<C> {
    fn owner_or_err(&self, id: ColliderId) -> QuadtreeResult<NodeId> {
        self.lookup
            .get(&id)
            .copied()
            .ok_or(QuadtreeError::UnknownCollider(id))
    }

    // The lookup entry must name a node that holds the collider.
    fn take_tracked(&mut self, node: NodeId, id: ColliderId) -> (ItemClass, Arc<C>) {
        match self.take_from(node, id) {
            Some(found) => found,
            None => panic!("lookup names {} for {} but the node does not hold it", node, id),
        }
    }

    pub fn delete(&mut self, id: ColliderId) -> QuadtreeResult<Arc<C>> {
        let node = self.owner_or_err(id)?;
        let (class, collider) = self.take_tracked(node, id);
        self.lookup.remove(&id);
        if class == ItemClass::Normal {
            self.try_merge(node);
        }
        Ok(collider)
    }

    /// Moves an active collider into its node's inactive set. Deactivating an
    /// inactive collider does nothing.
    pub fn deactivate(&mut self, id: ColliderId) -> QuadtreeResult<()> {
        let node = self.owner_or_err(id)?;
        let (class, collider) = self.take_tracked(node, id);
        self.place(node, ItemClass::Inactive, collider);
        if class == ItemClass::Normal {
            self.try_merge(node);
        }
        Ok(())
    }

    /// Re-inserts an inactive collider from the root so it lands wherever its
    /// current bounding box belongs. Activating an active collider does nothing.
    pub fn activate(&mut self, id: ColliderId) -> QuadtreeResult<()> {
        let node = self.owner_or_err(id)?;
        let (class, collider) = self.take_tracked(node, id);
        if class != ItemClass::Inactive {
            self.place(node, class, collider);
            return Ok(());
        }
        self.lookup.remove(&id);
        self.insert_unchecked(collider);
        Ok(())
    }

    /// Collapses the children of `node`'s parent back into it when they hold
    /// fewer than half a load factor of items between them and none of them
    /// is split.
    pub(crate) fn try_merge(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).parent else {
            return;
        };
        let Some(children) = self.node(parent).children else {
            return;
        };
        let mut total = 0;
        for child in children {
            let child = self.node(child);
            if child.children.is_some() {
                return;
            }
            total += child.items.len();
        }
        if total >= self.node(parent).load_factor / 2 {
            return;
        }

        for child in children {
            let (items, inline, inactive) = {
                let child = self.node_mut(child);
                (
                    std::mem::take(&mut child.items),
                    std::mem::take(&mut child.inline_items),
                    std::mem::take(&mut child.inactive_items),
                )
            };
            for collider in items.into_iter().chain(inline) {
                self.place(parent, ItemClass::Normal, collider);
            }
            for collider in inactive {
                self.place(parent, ItemClass::Inactive, collider);
            }
            self.free_node(child);
        }

        let (area, grandparent, inline) = {
            let parent_node = self.node_mut(parent);
            parent_node.children = None;
            (
                parent_node.area,
                parent_node.parent,
                std::mem::take(&mut parent_node.inline_items),
            )
        };
        let lifted = inline.len();
        match grandparent {
            Some(grandparent) => {
                for collider in inline {
                    self.place(grandparent, ItemClass::Inline, collider);
                }
            }
            // The root keeps its overflow inline; everything else becomes a leaf item.
            None => {
                for collider in inline {
                    let class = match section_of(&area, &collider.bounding_box()) {
                        Section::Overflow => ItemClass::Inline,
                        _ => ItemClass::Normal,
                    };
                    self.place(parent, class, collider);
                }
            }
        }
        debug!(node = %parent, ?area, items = total, lifted, "merge");
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_nodes.clear();
        self.lookup.clear();
        self.root = None;
    }
}
