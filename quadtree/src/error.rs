use crate::quadtree::ColliderId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuadtreeError {
    #[error("min_division must be at least {min} (min_division: {min_division})")]
    MinDivisionTooSmall { min_division: f32, min: f32 },
    #[error("maintained area must be finite and non-empty (width: {width}, height: {height})")]
    InvalidArea { width: f32, height: f32 },
    #[error("{0} is not tracked by the quadtree")]
    UnknownCollider(ColliderId),
    #[error("{0} is already tracked by the quadtree")]
    AlreadyTracked(ColliderId),
    #[error("quadtree invariant violated: {0}")]
    InvariantViolation(String),
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;
