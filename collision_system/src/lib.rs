pub mod collider;
pub mod config;
pub mod error;
pub mod object;
pub mod query;
pub mod system;
pub mod world;

pub use collider::PolygonCollider;
pub use config::SystemConfig;
pub use error::{CollisionError, CollisionResult};
pub use object::{GameObject, ObjectId};
pub use quadtree::QueryMode;
pub use system::{CollisionSystem, SweepReport};
pub use world::World;
