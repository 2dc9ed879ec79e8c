use crate::object::ObjectId;
use quadtree::QuadtreeError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    #[error("{0} has no polygon collider")]
    MissingCollider(ObjectId),
    #[error("{0} is not registered with the collision system")]
    NotRegistered(ObjectId),
    #[error("{0} is not spawned in this world")]
    UnknownObject(ObjectId),
    #[error(transparent)]
    Index(#[from] QuadtreeError),
}

pub type CollisionResult<T> = Result<T, CollisionError>;
