use std::time::Duration;

use super::coords::DEFAULT_TILE_SIZE_PX;
use super::flags::MissingFlagPolicy;

pub const DEFAULT_STEP_DURATION: Duration = Duration::from_millis(200);
pub const DEFAULT_MAX_PATH_STEPS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverworldConfig {
    pub tile_size_px: f32,
    /// Time to cross one tile, independent of path length.
    pub step_duration: Duration,
    pub max_path_steps: usize,
    pub missing_flag_policy: MissingFlagPolicy,
    /// Ring limit for the nearest-passable search; `None` searches the whole map.
    pub nearest_passable_max_radius: Option<u32>,
}

impl Default for OverworldConfig {
    fn default() -> Self {
        Self {
            tile_size_px: DEFAULT_TILE_SIZE_PX,
            step_duration: DEFAULT_STEP_DURATION,
            max_path_steps: DEFAULT_MAX_PATH_STEPS,
            missing_flag_policy: MissingFlagPolicy::default(),
            nearest_passable_max_radius: None,
        }
    }
}
