use crate::components::TileType;
use bevy::prelude::*;

/// Fixed player start cell. `(1, 1)` is guaranteed Floor by the carver.
pub const START_CELL: (usize, usize) = (1, 1);

/// Square tri-state maze grid, row-major `size * size` tiles.
///
/// Out-of-bounds reads come back as `Wall` so callers can probe neighbors
/// without bounds arithmetic; the border ring of a generated grid is Wall
/// anyway.
#[derive(Resource, Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct MazeGrid {
    size: usize,
    tiles: Vec<u8>,
}

impl MazeGrid {
    pub fn filled(size: usize, tile: TileType) -> Self {
        Self {
            size,
            tiles: vec![tile as u8; size * size],
        }
    }

    /// Build a grid from wire-encoded tiles (0=Floor, 1=Wall, 2=Goal).
    pub fn from_tiles(size: usize, tiles: Vec<u8>) -> Result<Self, String> {
        if tiles.len() != size * size {
            return Err(format!(
                "tile array size {} doesn't match {}x{} grid",
                tiles.len(),
                size,
                size
            ));
        }
        Ok(Self { size, tiles })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    pub fn get(&self, x: i32, y: i32) -> TileType {
        if !self.in_bounds(x, y) {
            return TileType::Wall;
        }
        TileType::from_u8(self.tiles[y as usize * self.size + x as usize])
    }

    /// Tile under a continuous position (grid units).
    pub fn get_at(&self, x: f32, y: f32) -> TileType {
        self.get(x.floor() as i32, y.floor() as i32)
    }

    pub fn set(&mut self, x: i32, y: i32, tile: TileType) {
        if self.in_bounds(x, y) {
            self.tiles[y as usize * self.size + x as usize] = tile as u8;
        }
    }

    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == TileType::Wall
    }

    /// Wire-encoded tiles, row-major.
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    /// Scan for the goal cell. Accepted grids carry exactly one.
    pub fn goal(&self) -> Option<(usize, usize)> {
        self.tiles
            .iter()
            .position(|&t| t == TileType::Goal as u8)
            .map(|i| (i % self.size, i / self.size))
    }

    pub fn start(&self) -> (usize, usize) {
        START_CELL
    }

    /// Floor cells strictly inside the border, excluding the start cell.
    pub fn interior_floor_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for y in 1..self.size.saturating_sub(1) {
            for x in 1..self.size.saturating_sub(1) {
                if (x, y) != START_CELL && self.get(x as i32, y as i32) == TileType::Floor {
                    cells.push((x, y));
                }
            }
        }
        cells
    }
}
