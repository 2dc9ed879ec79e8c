use common::shapes::Rectangle;
use quadtree::Config;

#[derive(Debug, Clone)]
pub struct SystemConfig {
    /// Region the index subdivides. Colliders outside it still work but are
    /// kept unsorted at the root.
    pub area: Rectangle,
    pub index: Config,
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            area: Rectangle::new(0.0, 0.0, 4096.0, 4096.0),
            index: Config::default(),
        }
    }
}
