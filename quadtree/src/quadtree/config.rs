#[derive(Debug, Clone)]
pub struct Config {
    /// Item count a leaf may hold before it tries to split.
    pub load_factor: usize,
    /// Leaves whose width or height is not above this never split.
    pub min_division: f32,
    /// Distance a collider may drift past its cell before the maintenance
    /// sweep evicts it.
    pub loose_offset: f32,
    pub node_pool_size: usize,
}

impl Config {
    pub const MIN_DIVISION_FLOOR: f32 = 32.0;
}

impl Default for Config {
    fn default() -> Self {
        Config {
            load_factor: 16,
            min_division: 64.0,
            loose_offset: 16.0,
            node_pool_size: 64,
        }
    }
}
