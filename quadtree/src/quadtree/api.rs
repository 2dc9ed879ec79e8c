use super::*;
use crate::error::QuadtreeResult;
use common::shapes::{Point, Ray, Rectangle};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

impl<C: Collider> QuadTree<C> {
    /// Fails when `min_division` is below 32 or `area` is empty.
    pub fn new(area: Rectangle, load_factor: usize, min_division: f32) -> QuadtreeResult<Self> {
        Ok(Self {
            inner: Mutex::new(QuadTreeInner::new(area, load_factor, min_division)?),
        })
    }

    pub fn new_with_config(area: Rectangle, config: Config) -> QuadtreeResult<Self> {
        Ok(Self {
            inner: Mutex::new(QuadTreeInner::new_with_config(area, config)?),
        })
    }

    /// Holds the tree lock for a multi-step exclusive phase.
    pub fn lock(&self) -> MutexGuard<'_, QuadTreeInner<C>> {
        self.inner.lock()
    }

    pub fn get_mut(&mut self) -> &mut QuadTreeInner<C> {
        self.inner.get_mut()
    }

    pub fn insert(&self, collider: Arc<C>) -> QuadtreeResult<()> {
        self.inner.lock().insert(collider)
    }

    pub fn delete(&self, id: ColliderId) -> QuadtreeResult<Arc<C>> {
        self.inner.lock().delete(id)
    }

    pub fn activate(&self, id: ColliderId) -> QuadtreeResult<()> {
        self.inner.lock().activate(id)
    }

    pub fn deactivate(&self, id: ColliderId) -> QuadtreeResult<()> {
        self.inner.lock().deactivate(id)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn query_point(&self, point: Point, mode: QueryMode) -> Vec<Arc<C>> {
        self.inner.lock().query_point(point, mode)
    }

    pub fn query_rect(&self, rect: &Rectangle, mode: QueryMode) -> Vec<Arc<C>> {
        self.inner.lock().query_rect(rect, mode)
    }

    pub fn query_ray(&self, ray: &Ray, mode: QueryMode) -> Vec<Arc<C>> {
        self.inner.lock().query_ray(ray, mode)
    }

    /// Lock-free traversal; `&mut self` proves nobody else can reach the tree.
    pub fn traverse<F>(&mut self, f: F) -> bool
    where
        F: FnMut(&Arc<C>, &Node<C>, ItemClass, usize) -> bool,
    {
        self.inner.get_mut().traverse(f)
    }

    /// Traversal for callers sharing the tree across threads. The callback
    /// runs with the lock held and must not call back into the tree.
    pub fn traverse_with_lock<F>(&self, f: F) -> bool
    where
        F: FnMut(&Arc<C>, &Node<C>, ItemClass, usize) -> bool,
    {
        self.inner.lock().traverse(f)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn contains(&self, id: ColliderId) -> bool {
        self.inner.lock().contains(id)
    }

    pub fn owner_of(&self, id: ColliderId) -> Option<NodeId> {
        self.inner.lock().owner_of(id)
    }

    pub fn class_of(&self, id: ColliderId) -> Option<ItemClass> {
        self.inner.lock().class_of(id)
    }

    pub fn node_count(&self) -> usize {
        self.inner.lock().node_count()
    }

    pub fn node_areas(&self) -> Vec<Rectangle> {
        self.inner.lock().node_areas()
    }

    pub fn check_invariants(&self) -> QuadtreeResult<()> {
        self.inner.lock().check_invariants()
    }

    pub fn area(&self) -> Rectangle {
        self.inner.lock().area()
    }

    pub fn loose_offset(&self) -> f32 {
        self.inner.lock().loose_offset()
    }
}
