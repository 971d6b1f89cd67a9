use thiserror::Error;

use super::coords::TileCoord;
use super::flags::TileFlags;

/// Layered tile grid plus the flag table of its tileset.
///
/// Layer convention:
/// - `data` holds `layer_count` row-major planes of `width * height` tile ids.
/// - Layer 0 is the base floor; higher indices are drawn (and collide) on top.
/// - Tile id 0 means "nothing on this layer".
#[derive(Debug, Clone, PartialEq)]
pub struct TileMapStore {
    width: u32,
    height: u32,
    layer_count: usize,
    data: Vec<u32>,
    flags: TileFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TilemapError {
    #[error("tile map has an empty grid ({width}x{height}) but {data_len} tile ids")]
    EmptyGrid {
        width: u32,
        height: u32,
        data_len: usize,
    },
    #[error("tile data length {data_len} is not a multiple of the {cells}-cell layer size")]
    LayerSizeMismatch { cells: usize, data_len: usize },
}

impl TileMapStore {
    pub fn new(
        width: u32,
        height: u32,
        data: Vec<u32>,
        flags: TileFlags,
    ) -> Result<Self, TilemapError> {
        let cells = width as usize * height as usize;
        let data_len = data.len();
        if cells == 0 {
            if data_len != 0 {
                return Err(TilemapError::EmptyGrid {
                    width,
                    height,
                    data_len,
                });
            }
            return Ok(Self {
                width,
                height,
                layer_count: 0,
                data,
                flags,
            });
        }
        if data_len % cells != 0 {
            return Err(TilemapError::LayerSizeMismatch { cells, data_len });
        }
        Ok(Self {
            width,
            height,
            layer_count: data_len / cells,
            data,
            flags,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    pub fn flags(&self) -> &TileFlags {
        &self.flags
    }

    pub fn contains(&self, tile: TileCoord) -> bool {
        tile.x >= 0 && tile.y >= 0 && (tile.x as u32) < self.width && (tile.y as u32) < self.height
    }

    pub fn index_of(&self, tile: TileCoord) -> Option<usize> {
        if !self.contains(tile) {
            return None;
        }
        Some(tile.y as usize * self.width as usize + tile.x as usize)
    }

    pub fn tile_at_layer(&self, layer: usize, tile: TileCoord) -> Option<u32> {
        if layer >= self.layer_count {
            return None;
        }
        let cells = self.width as usize * self.height as usize;
        let index = self.index_of(tile)?;
        self.data.get(layer * cells + index).copied()
    }

    /// Topmost non-zero tile id at `tile`; 0 when every layer is empty or
    /// the coordinate is off the map.
    pub fn top_tile_at(&self, tile: TileCoord) -> u32 {
        (0..self.layer_count)
            .rev()
            .filter_map(|layer| self.tile_at_layer(layer, tile))
            .find(|&tile_id| tile_id != 0)
            .unwrap_or(0)
    }
}
