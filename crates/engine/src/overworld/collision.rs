use tracing::{info, warn};

use crate::content::{ContentLoadError, MapDataSource};

use super::coords::TileCoord;
use super::flags::{Direction, MissingFlagPolicy, TileFlags, DIRECTION_MASK};
use super::tilemap::TileMapStore;

/// Passability view over one map's tile grid.
///
/// An index that failed to load stays `NotReady`; every query then answers as
/// if nothing on the map were solid.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionIndex {
    map_id: String,
    policy: MissingFlagPolicy,
    store: Option<TileMapStore>,
}

impl CollisionIndex {
    pub fn initialize(
        source: &dyn MapDataSource,
        map_id: &str,
        policy: MissingFlagPolicy,
    ) -> Self {
        match load_store(source, map_id) {
            Ok(store) => {
                info!(
                    map_id,
                    width = store.width(),
                    height = store.height(),
                    layers = store.layer_count(),
                    flag_entries = store.flags().len(),
                    null_flag_entries = store.flags().null_entries(),
                    "collision_index_ready"
                );
                Self::from_store(map_id, store, policy)
            }
            Err(error) => {
                warn!(map_id, error = %error, "collision_index_not_ready");
                Self::not_ready(map_id, policy)
            }
        }
    }

    pub fn from_store(map_id: &str, store: TileMapStore, policy: MissingFlagPolicy) -> Self {
        Self {
            map_id: map_id.to_string(),
            policy,
            store: Some(store),
        }
    }

    pub fn not_ready(map_id: &str, policy: MissingFlagPolicy) -> Self {
        Self {
            map_id: map_id.to_string(),
            policy,
            store: None,
        }
    }

    pub fn map_id(&self) -> &str {
        &self.map_id
    }

    pub fn is_ready(&self) -> bool {
        self.store.is_some()
    }

    /// Grid size, `None` while not ready.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.store
            .as_ref()
            .map(|store| (store.width(), store.height()))
    }

    /// Topmost non-zero tile id; 0 off the map, on empty stacks and while not
    /// ready.
    pub fn tile_id(&self, tile: TileCoord) -> u32 {
        match &self.store {
            Some(store) => store.top_tile_at(tile),
            None => 0,
        }
    }

    pub fn tile_flag(&self, tile_id: u32) -> u16 {
        if tile_id == 0 {
            return 0;
        }
        self.store
            .as_ref()
            .and_then(|store| store.flags().get(tile_id))
            .unwrap_or_else(|| self.policy.default_flag())
    }

    pub fn is_passable(&self, tile: TileCoord) -> bool {
        let Some(store) = &self.store else {
            return true;
        };
        if !store.contains(tile) {
            return false;
        }
        let tile_id = store.top_tile_at(tile);
        if tile_id == 0 {
            return true;
        }
        self.tile_flag(tile_id) & DIRECTION_MASK == 0
    }

    /// Whether leaving `tile` towards `direction` is blocked by the flag of
    /// `tile` itself.
    pub fn is_direction_blocked(&self, tile: TileCoord, direction: Direction) -> bool {
        if self.store.is_none() {
            return false;
        }
        let tile_id = self.tile_id(tile);
        self.tile_flag(tile_id) & direction.bit() != 0
    }

    pub fn can_move_to(&self, from: TileCoord, to: TileCoord) -> bool {
        if !self.is_passable(to) {
            return false;
        }
        if self.store.is_none() || self.tile_id(from) == 0 {
            return true;
        }
        let dx = (to.x - from.x).signum();
        let dy = (to.y - from.y).signum();
        // Diagonal or multi-tile moves are checked against both axis bits.
        let blocked_x = Direction::from_delta(dx, 0)
            .is_some_and(|direction| self.is_direction_blocked(from, direction));
        let blocked_y = Direction::from_delta(0, dy)
            .is_some_and(|direction| self.is_direction_blocked(from, direction));
        !(blocked_x || blocked_y)
    }
}

fn load_store(source: &dyn MapDataSource, map_id: &str) -> Result<TileMapStore, ContentLoadError> {
    let entry = source.map_entry(map_id)?;
    let map = source.load_tile_map(map_id)?;
    let tileset = source.load_tileset(&entry.tileset)?;
    let flags = TileFlags::from_indexed(tileset.flags);
    Ok(TileMapStore::new(map.width, map.height, map.data, flags)?)
}
