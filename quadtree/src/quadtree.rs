//! Loose quadtree over shared collider handles.
//!
//! Each tracked collider lives in exactly one node, in one of three sets:
//! `items` (fits inside a single leaf), `inline_items` (straddles the centre
//! of an inner node, or lies outside the maintained area at the root) and
//! `inactive_items` (deactivated, still tracked). A reverse lookup from
//! collider id to owning node makes delete/activate/deactivate O(1).
//!
//! All mutation goes through a single `parking_lot::Mutex`. Holding the guard
//! returned by [`QuadTree::lock`] gives the caller an exclusive phase in which
//! it can traverse and mutate without re-locking.

mod api;
mod config;
mod core;
mod maintenance;
mod query;
mod storage;
mod traverse;
mod types;

pub use config::Config;
pub use storage::{Node, QuadTree, QuadTreeInner};
pub use types::{
    quadrant_section, section_of, Collider, ColliderId, ItemClass, NodeId, Quadrant, QueryMode,
    Section,
};

pub(crate) use types::*;
