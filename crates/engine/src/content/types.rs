use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::overworld::{Location, TileCoord, TilemapError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapCatalogDocument {
    pub maps: Vec<MapEntry>,
}

/// Catalog record for one map: which tileset it collides with, where the
/// avatar appears and which regions are interactive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub id: String,
    pub name: String,
    pub tileset: String,
    pub spawn: TileCoord,
    #[serde(default)]
    pub locations: Vec<Location>,
}

/// Decoded map grid; `data` is `layer_count * width * height` tile ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMapDocument {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u32>,
}

/// Tileset flags indexed by tile id. `null` marks an absent flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetDocument {
    pub flags: Vec<Option<u16>>,
}

#[derive(Debug, Error)]
pub enum ContentLoadError {
    #[error("failed to read content file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path} at {json_path}: {message}")]
    Parse {
        path: PathBuf,
        json_path: String,
        message: String,
    },
    #[error("map '{map_id}' is not in the catalog")]
    UnknownMap { map_id: String },
    #[error("map '{map_id}' is listed more than once in the catalog")]
    DuplicateMap { map_id: String },
    #[error("tileset '{tileset_id}' was not found")]
    UnknownTileset { tileset_id: String },
    #[error(transparent)]
    Tilemap(#[from] TilemapError),
}
