use std::collections::HashMap;

use super::types::{ContentLoadError, MapEntry, TileMapDocument, TilesetDocument};

/// Data-loading collaborator consumed by the overworld.
pub trait MapDataSource {
    fn map_entry(&self, map_id: &str) -> Result<MapEntry, ContentLoadError>;

    fn load_tile_map(&self, map_id: &str) -> Result<TileMapDocument, ContentLoadError>;

    fn load_tileset(&self, tileset_id: &str) -> Result<TilesetDocument, ContentLoadError>;
}

/// Map data held in memory; used by tests and tools that build maps in code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMaps {
    entries: HashMap<String, MapEntry>,
    maps: HashMap<String, TileMapDocument>,
    tilesets: HashMap<String, TilesetDocument>,
}

impl InMemoryMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_map(mut self, entry: MapEntry, map: TileMapDocument) -> Self {
        self.maps.insert(entry.id.clone(), map);
        self.entries.insert(entry.id.clone(), entry);
        self
    }

    pub fn with_tileset(mut self, tileset_id: &str, tileset: TilesetDocument) -> Self {
        self.tilesets.insert(tileset_id.to_string(), tileset);
        self
    }
}

impl MapDataSource for InMemoryMaps {
    fn map_entry(&self, map_id: &str) -> Result<MapEntry, ContentLoadError> {
        self.entries
            .get(map_id)
            .cloned()
            .ok_or_else(|| ContentLoadError::UnknownMap {
                map_id: map_id.to_string(),
            })
    }

    fn load_tile_map(&self, map_id: &str) -> Result<TileMapDocument, ContentLoadError> {
        self.maps
            .get(map_id)
            .cloned()
            .ok_or_else(|| ContentLoadError::UnknownMap {
                map_id: map_id.to_string(),
            })
    }

    fn load_tileset(&self, tileset_id: &str) -> Result<TilesetDocument, ContentLoadError> {
        self.tilesets
            .get(tileset_id)
            .cloned()
            .ok_or_else(|| ContentLoadError::UnknownTileset {
                tileset_id: tileset_id.to_string(),
            })
    }
}
