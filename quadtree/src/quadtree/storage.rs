use super::*;
use common::shapes::Rectangle;
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::sync::Arc;

pub struct Node<C: Collider> {
    pub(crate) id: NodeId,
    pub(crate) area: Rectangle,
    pub(crate) items: Vec<Arc<C>>,
    pub(crate) inline_items: Vec<Arc<C>>,
    pub(crate) inactive_items: Vec<Arc<C>>,
    pub(crate) children: Option<[NodeId; 4]>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) depth: u32,
    pub(crate) load_factor: usize,
    pub(crate) min_division: f32,
}

impl<C: Collider> Node<C> {
    pub(crate) fn new(
        id: NodeId,
        area: Rectangle,
        parent: Option<NodeId>,
        depth: u32,
        load_factor: usize,
        min_division: f32,
    ) -> Self {
        Self {
            id,
            area,
            items: Vec::new(),
            inline_items: Vec::new(),
            inactive_items: Vec::new(),
            children: None,
            parent,
            depth,
            load_factor,
            min_division,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn area(&self) -> Rectangle {
        self.area
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> Option<[NodeId; 4]> {
        self.children
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    #[inline(always)]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn items(&self) -> &[Arc<C>] {
        &self.items
    }

    pub fn inline_items(&self) -> &[Arc<C>] {
        &self.inline_items
    }

    pub fn inactive_items(&self) -> &[Arc<C>] {
        &self.inactive_items
    }

    pub fn item_count(&self) -> usize {
        self.items.len() + self.inline_items.len() + self.inactive_items.len()
    }

    #[inline(always)]
    pub(crate) fn can_split(&self) -> bool {
        self.items.len() > self.load_factor
            && self.area.width > self.min_division
            && self.area.height > self.min_division
    }

    pub(crate) fn class_mut(&mut self, class: ItemClass) -> &mut Vec<Arc<C>> {
        match class {
            ItemClass::Normal => &mut self.items,
            ItemClass::Inline => &mut self.inline_items,
            ItemClass::Inactive => &mut self.inactive_items,
        }
    }

    pub(crate) fn collect_into(&self, mode: QueryMode, out: &mut Vec<Arc<C>>) {
        match mode {
            QueryMode::ActiveOnly => {
                out.extend(self.items.iter().cloned());
                out.extend(self.inline_items.iter().cloned());
            }
            QueryMode::InactiveOnly => out.extend(self.inactive_items.iter().cloned()),
            QueryMode::All => {
                out.extend(self.items.iter().cloned());
                out.extend(self.inline_items.iter().cloned());
                out.extend(self.inactive_items.iter().cloned());
            }
        }
    }

    // Freed slots keep their allocation for reuse by the next split.
    pub(crate) fn reset(&mut self) {
        self.items.clear();
        self.inline_items.clear();
        self.inactive_items.clear();
        self.children = None;
        self.parent = None;
        self.depth = 0;
    }
}

pub struct QuadTree<C: Collider> {
    pub(crate) inner: Mutex<QuadTreeInner<C>>,
}

pub struct QuadTreeInner<C: Collider> {
    pub(crate) area: Rectangle,
    pub(crate) load_factor: usize,
    pub(crate) min_division: f32,
    pub(crate) loose_offset: f32,
    pub(crate) root: Option<NodeId>,
    pub(crate) nodes: Vec<Node<C>>,
    pub(crate) free_nodes: Vec<NodeId>,
    pub(crate) lookup: FxHashMap<ColliderId, NodeId>,
}

impl<C: Collider> QuadTreeInner<C> {
    #[inline(always)]
    pub fn node(&self, id: NodeId) -> &Node<C> {
        &self.nodes[id.index()]
    }

    #[inline(always)]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<C> {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn alloc_node(
        &mut self,
        area: Rectangle,
        parent: Option<NodeId>,
        depth: u32,
    ) -> NodeId {
        if let Some(id) = self.free_nodes.pop() {
            let (load_factor, min_division) = (self.load_factor, self.min_division);
            let node = self.node_mut(id);
            node.area = area;
            node.parent = parent;
            node.depth = depth;
            node.load_factor = load_factor;
            node.min_division = min_division;
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(
            id,
            area,
            parent,
            depth,
            self.load_factor,
            self.min_division,
        ));
        id
    }

    pub(crate) fn free_node(&mut self, id: NodeId) {
        self.node_mut(id).reset();
        self.free_nodes.push(id);
    }

    pub(crate) fn ensure_root(&mut self) -> NodeId {
        if let Some(root) = self.root {
            return root;
        }
        let root = self.alloc_node(self.area, None, 0);
        self.root = Some(root);
        root
    }

    // Places an existing collider into one of `node`'s sets and records ownership.
    #[inline(always)]
    pub(crate) fn place(&mut self, node: NodeId, class: ItemClass, collider: Arc<C>) {
        self.lookup.insert(collider.id(), node);
        self.node_mut(node).class_mut(class).push(collider);
    }

    /// Removes `id` from whichever set of `node` holds it.
    pub(crate) fn take_from(
        &mut self,
        node: NodeId,
        id: ColliderId,
    ) -> Option<(ItemClass, Arc<C>)> {
        let node = self.node_mut(node);
        for class in [ItemClass::Normal, ItemClass::Inline, ItemClass::Inactive] {
            let set = node.class_mut(class);
            if let Some(pos) = set.iter().position(|c| c.id() == id) {
                return Some((class, set.swap_remove(pos)));
            }
        }
        None
    }
}
