use serde::{Deserialize, Serialize};

pub const DEFAULT_TILE_SIZE_PX: f32 = 48.0;

// Tile-unit slack so that tile_to_pixel -> pixel_to_tile survives f32 rounding
// at tile edges.
const TILE_EDGE_EPSILON: f32 = 1.0e-3;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: Vec2, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        Vec2 {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }
}

/// Integer tile address. Signed so that off-map coordinates produced by taps
/// or neighbour arithmetic stay representable; validity is a map question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }
}

/// Measured size of the rendered map content, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentSize {
    pub width: f32,
    pub height: f32,
}

impl ContentSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub(crate) fn is_usable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Rectangle in content-relative fractions, each edge in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl NormalizedRect {
    pub fn to_pixels(&self, content: ContentSize) -> PixelRect {
        PixelRect {
            left: self.left * content.width,
            right: self.right * content.width,
            top: self.top * content.height,
            bottom: self.bottom * content.height,
        }
    }
}

impl PixelRect {
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// Converts between tile, pixel and content-fraction spaces for one map grid.
///
/// Pixel scale per axis is `content / grid` when the content size is usable
/// and the grid is known; otherwise the fixed tile size applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    grid_width: u32,
    grid_height: u32,
    tile_size_px: f32,
}

impl CoordinateMapper {
    pub fn new(grid_width: u32, grid_height: u32, tile_size_px: f32) -> Self {
        Self {
            grid_width,
            grid_height,
            tile_size_px,
        }
    }

    /// Mapper for a map whose grid is unknown; scales by the tile size only.
    pub fn unscaled(tile_size_px: f32) -> Self {
        Self::new(0, 0, tile_size_px)
    }

    pub fn scale(&self, content: ContentSize) -> Vec2 {
        if self.grid_width == 0 || self.grid_height == 0 || !content.is_usable() {
            return Vec2::new(self.tile_size_px, self.tile_size_px);
        }
        Vec2::new(
            content.width / self.grid_width as f32,
            content.height / self.grid_height as f32,
        )
    }

    pub fn tile_to_pixel(&self, tile: TileCoord, content: ContentSize) -> Vec2 {
        let scale = self.scale(content);
        Vec2::new(tile.x as f32 * scale.x, tile.y as f32 * scale.y)
    }

    pub fn pixel_to_tile(&self, pixel: Vec2, content: ContentSize) -> TileCoord {
        let scale = self.scale(content);
        TileCoord::new(
            to_tile_axis(pixel.x, scale.x),
            to_tile_axis(pixel.y, scale.y),
        )
    }

    pub fn tile_center(&self, tile: TileCoord, content: ContentSize) -> Vec2 {
        let scale = self.scale(content);
        let origin = self.tile_to_pixel(tile, content);
        Vec2::new(origin.x + scale.x * 0.5, origin.y + scale.y * 0.5)
    }

    /// Tile under the centre of a tile-sized footprint whose top-left corner is
    /// `pixel`. Used for avatar positions, which are stored as tile origins.
    pub fn footprint_tile(&self, pixel: Vec2, content: ContentSize) -> TileCoord {
        let scale = self.scale(content);
        self.pixel_to_tile(
            Vec2::new(pixel.x + scale.x * 0.5, pixel.y + scale.y * 0.5),
            content,
        )
    }
}

fn to_tile_axis(pixel: f32, scale: f32) -> i32 {
    if !pixel.is_finite() || scale <= 0.0 {
        return i32::MIN;
    }
    (pixel / scale + TILE_EDGE_EPSILON).floor() as i32
}
