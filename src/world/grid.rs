use glam::{Vec2, vec2};
use thiserror::Error;

/// One cell of the map.
pub type TileCode = u8;

pub const EMPTY: TileCode = 0;
/// Wall that explosions can remove.
pub const SOFT_WALL: TileCode = 1;
/// Border / pillar wall that survives explosions.
pub const HARD_WALL: TileCode = 2;
/// Spawn markers for players 1..=4. Empty for collision and rays.
pub const SPAWN_TILES: [TileCode; 4] = [9, 8, 7, 6];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GridError {
    #[error("map has no rows")]
    Empty,

    #[error("row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("unknown tile code {code} at ({x}, {y})")]
    UnknownTile { code: TileCode, x: usize, y: usize },
}

fn known_tile(code: TileCode) -> bool {
    matches!(code, EMPTY | SOFT_WALL | HARD_WALL) || SPAWN_TILES.contains(&code)
}

/// Row-major tile map.
///
/// Read-only for the whole render pass; wall destruction happens between
/// frames through `&mut self`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileCode>,
}

impl TileGrid {
    pub fn from_rows<R: AsRef<[TileCode]>>(rows: &[R]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(GridError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: y,
                    len: row.len(),
                    expected: width,
                });
            }
            for (x, &code) in row.iter().enumerate() {
                if !known_tile(code) {
                    return Err(GridError::UnknownTile { code, x, y });
                }
            }
            tiles.extend_from_slice(row);
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Tile code at `(x, y)`, `None` when off-grid.
    #[inline]
    pub fn tile_at(&self, x: i64, y: i64) -> Option<TileCode> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    /// Off-grid cells are not walls; rays stop there for other reasons.
    #[inline]
    pub fn is_wall(&self, x: i64, y: i64) -> bool {
        matches!(self.tile_at(x, y), Some(SOFT_WALL | HARD_WALL))
    }

    /// Cell containing the world-space `pos`, `None` when off-grid.
    pub fn world_to_grid(&self, pos: Vec2, tile_size: f32) -> Option<(usize, usize)> {
        if !pos.is_finite() {
            return None;
        }
        let x = (pos.x / tile_size).floor() as i64;
        let y = (pos.y / tile_size).floor() as i64;
        self.index(x, y)?;
        Some((x as usize, y as usize))
    }

    /// World-space centre of cell `(x, y)`.
    #[inline]
    pub fn cell_center(x: usize, y: usize, tile_size: f32) -> Vec2 {
        vec2((x as f32 + 0.5) * tile_size, (y as f32 + 0.5) * tile_size)
    }

    pub fn set_tile(&mut self, x: usize, y: usize, code: TileCode) -> Result<(), GridError> {
        if !known_tile(code) {
            return Err(GridError::UnknownTile { code, x, y });
        }
        if let Some(i) = self.index(x as i64, y as i64) {
            self.tiles[i] = code;
        }
        Ok(())
    }

    /// Clear a destructible wall. Returns whether anything changed.
    pub fn destroy_wall(&mut self, x: usize, y: usize) -> bool {
        match self.index(x as i64, y as i64) {
            Some(i) if self.tiles[i] == SOFT_WALL => {
                self.tiles[i] = EMPTY;
                true
            }
            _ => false,
        }
    }

    /// Centre of the spawn tile for player `slot` (1..=4).
    pub fn spawn_point(&self, slot: u8, tile_size: f32) -> Option<Vec2> {
        let marker = *SPAWN_TILES.get(usize::from(slot.checked_sub(1)?))?;
        let i = self.tiles.iter().position(|&t| t == marker)?;
        Some(Self::cell_center(i % self.width, i / self.width, tile_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> TileGrid {
        TileGrid::from_rows(&[[2, 2, 2], [2, 9, 1], [2, 2, 2]]).unwrap()
    }

    #[test]
    fn walls_and_spawns() {
        let g = small();
        assert!(g.is_wall(0, 0));
        assert!(g.is_wall(2, 1));
        assert!(!g.is_wall(1, 1), "spawn markers are open floor");
        assert!(!g.is_wall(-1, 0));
        assert_eq!(g.tile_at(3, 0), None);
        assert_eq!(g.spawn_point(1, 50.0), Some(vec2(75.0, 75.0)));
        assert_eq!(g.spawn_point(2, 50.0), None);
    }

    #[test]
    fn world_to_grid_rejects_off_grid() {
        let g = small();
        assert_eq!(g.world_to_grid(vec2(75.0, 60.0), 50.0), Some((1, 1)));
        assert_eq!(g.world_to_grid(vec2(-1.0, 60.0), 50.0), None);
        assert_eq!(g.world_to_grid(vec2(10.0, 150.0), 50.0), None);
        assert_eq!(g.world_to_grid(vec2(f32::NAN, 1.0), 50.0), None);
    }

    #[test]
    fn only_soft_walls_are_destructible() {
        let mut g = small();
        assert!(g.destroy_wall(2, 1));
        assert_eq!(g.tile_at(2, 1), Some(EMPTY));
        assert!(!g.destroy_wall(0, 0));
        assert!(!g.destroy_wall(9, 9));
    }

    #[test]
    fn rejects_ragged_and_unknown() {
        let rows: [&[u8]; 2] = [&[0, 0], &[0]];
        assert_eq!(
            TileGrid::from_rows(&rows).unwrap_err(),
            GridError::Ragged {
                row: 1,
                len: 1,
                expected: 2
            }
        );
        assert_eq!(
            TileGrid::from_rows(&[[0, 5]]).unwrap_err(),
            GridError::UnknownTile { code: 5, x: 1, y: 0 }
        );
        let none: [[u8; 0]; 0] = [];
        assert_eq!(TileGrid::from_rows(&none).unwrap_err(), GridError::Empty);
    }
}
