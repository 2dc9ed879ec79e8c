use super::*;
use crate::error::{QuadtreeError, QuadtreeResult};
use common::shapes::Rectangle;
use std::sync::Arc;

impl<C: Collider> QuadTreeInner<C> {
    /// Visits every tracked collider depth-first: children in quadrant order,
    /// then the node's normal, inline and inactive sets. The callback gets the
    /// collider, its node, its class and its index within that class, and
    /// returns `true` to stop. Returns whether the traversal was stopped.
    pub fn traverse<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&Arc<C>, &Node<C>, ItemClass, usize) -> bool,
    {
        match self.root {
            Some(root) => self.traverse_node(root, &mut f),
            None => false,
        }
    }

    fn traverse_node<F>(&self, id: NodeId, f: &mut F) -> bool
    where
        F: FnMut(&Arc<C>, &Node<C>, ItemClass, usize) -> bool,
    {
        let node = self.node(id);
        if let Some(children) = node.children {
            for child in children {
                if self.traverse_node(child, f) {
                    return true;
                }
            }
        }
        let sets = [
            (ItemClass::Normal, &node.items),
            (ItemClass::Inline, &node.inline_items),
            (ItemClass::Inactive, &node.inactive_items),
        ];
        for (class, set) in sets {
            for (index, collider) in set.iter().enumerate() {
                if f(collider, node, class, index) {
                    return true;
                }
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    pub fn contains(&self, id: ColliderId) -> bool {
        self.lookup.contains_key(&id)
    }

    pub fn owner_of(&self, id: ColliderId) -> Option<NodeId> {
        self.lookup.get(&id).copied()
    }

    /// Class of the set currently holding `id`.
    pub fn class_of(&self, id: ColliderId) -> Option<ItemClass> {
        let node = self.node(self.owner_of(id)?);
        [
            (ItemClass::Normal, &node.items),
            (ItemClass::Inline, &node.inline_items),
            (ItemClass::Inactive, &node.inactive_items),
        ]
        .into_iter()
        .find(|(_, set)| set.iter().any(|c| c.id() == id))
        .map(|(class, _)| class)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_nodes.len()
    }

    pub fn node_areas(&self) -> Vec<Rectangle> {
        let mut areas = Vec::with_capacity(self.node_count());
        let Some(root) = self.root else {
            return areas;
        };
        let mut stack = NodeStack::new();
        stack.push(root);
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            areas.push(node.area);
            if let Some(children) = node.children {
                stack.extend(children);
            }
        }
        areas
    }

    /// Walks the live tree and checks that child links agree in both
    /// directions and that every stored collider is named by the lookup
    /// exactly once.
    pub fn check_invariants(&self) -> QuadtreeResult<()> {
        let fail = |msg: String| Err(QuadtreeError::InvariantViolation(msg));
        let Some(root) = self.root else {
            if !self.lookup.is_empty() {
                return fail(format!("{} lookup entries without a root", self.lookup.len()));
            }
            return Ok(());
        };
        if self.node(root).parent.is_some() {
            return fail(format!("root {} has a parent", root));
        }

        let mut stored = 0;
        let mut reachable = 0;
        let mut stack = NodeStack::new();
        stack.push(root);
        while let Some(id) = stack.pop() {
            reachable += 1;
            let node = self.node(id);
            if node.id != id {
                return fail(format!("{} stored in slot {}", node.id, id));
            }
            for set in [&node.items, &node.inline_items, &node.inactive_items] {
                for collider in set {
                    stored += 1;
                    let cid = collider.id();
                    match self.lookup.get(&cid) {
                        Some(owner) if *owner == id => {}
                        Some(owner) => {
                            return fail(format!("{cid} held by {id} but lookup names {owner}"));
                        }
                        None => return fail(format!("{cid} held by {id} has no lookup entry")),
                    }
                }
            }
            if let Some(children) = node.children {
                for child in children {
                    let child_node = self.node(child);
                    if child_node.parent != Some(id) {
                        return fail(format!("{} does not point back to parent {}", child, id));
                    }
                    if child_node.depth != node.depth + 1 {
                        return fail(format!(
                            "{} has depth {} under depth {}",
                            child, child_node.depth, node.depth
                        ));
                    }
                    stack.push(child);
                }
            }
        }
        if stored != self.lookup.len() {
            let entries = self.lookup.len();
            return fail(format!("{stored} colliders stored but {entries} lookup entries"));
        }
        if reachable != self.node_count() {
            let allocated = self.node_count();
            return fail(format!("{reachable} nodes reachable but {allocated} allocated"));
        }
        Ok(())
    }
}
