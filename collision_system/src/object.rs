use crate::collider::PolygonCollider;
use fxhash::{FxHashMap, FxHashSet};
use parking_lot::RwLock;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object #{}", self.0)
    }
}

type ComponentMap = FxHashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// A named, tagged entity carrying at most one component of each type.
pub struct GameObject {
    id: ObjectId,
    name: String,
    tags: FxHashSet<String>,
    components: RwLock<ComponentMap>,
}

impl GameObject {
    pub fn new(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tags: FxHashSet::default(),
            components: RwLock::new(ComponentMap::default()),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &FxHashSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn has_tags(&self, tags: &[&str]) -> bool {
        tags.iter().all(|tag| self.tags.contains(*tag))
    }

    /// Stores `component`, returning the one of the same type it replaced.
    pub fn attach<T: Any + Send + Sync>(&self, component: Arc<T>) -> Option<Arc<T>> {
        self.components
            .write()
            .insert(TypeId::of::<T>(), component)
            .and_then(|old| old.downcast::<T>().ok())
    }

    pub fn component<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.components
            .read()
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|c| c.downcast::<T>().ok())
    }

    /// Like [`GameObject::component`] for callers that treat absence as a bug.
    ///
    /// # Panics
    /// Panics when the object carries no component of type `T`.
    pub fn require_component<T: Any + Send + Sync>(&self) -> Arc<T> {
        match self.component::<T>() {
            Some(component) => component,
            None => panic!("{} ({}) has no {} component", self.id, self.name, type_name::<T>()),
        }
    }

    pub fn detach_component<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.components
            .write()
            .remove(&TypeId::of::<T>())
            .and_then(|c| c.downcast::<T>().ok())
    }

    pub fn collider(&self) -> Option<Arc<PolygonCollider>> {
        self.component::<PolygonCollider>()
    }
}

impl fmt::Debug for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("components", &self.components.read().len())
            .finish()
    }
}
