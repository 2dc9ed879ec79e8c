pub mod error;
pub mod quadtree;

pub use error::{QuadtreeError, QuadtreeResult};
pub use quadtree::{
    quadrant_section, section_of, Collider, ColliderId, Config, ItemClass, Node, NodeId, QuadTree,
    QuadTreeInner, Quadrant, QueryMode, Section,
};
