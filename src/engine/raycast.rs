//! Per-column grid DDA.
//!
//! Every ray walks horizontal and vertical grid lines independently; the
//! nearer wall of the two wins. Depth is measured in tiles and corrected
//! for fish-eye before it leaves this module.

use glam::Vec2;
use log::warn;

use crate::{
    config::{RenderConfig, Screen},
    world::{TileCode, TileGrid, Viewpoint},
};

/// Keeps the first ray off exact axis angles so neither `sin` nor `cos`
/// starts at zero.
const ANGLE_BIAS: f32 = 0.0001;

/// Result for one screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Perpendicular (fish-eye corrected) depth in tiles.
    pub depth: f32,
    pub sin: f32,
    pub cos: f32,
    /// Wall code that stopped the ray. `None` means no wall lies within
    /// `max_ray_steps` tiles (or the ray left the grid) and the column shows
    /// background at `depth == RayCaster::max_depth()`, which is never nearer
    /// than a real hit.
    pub tile: Option<TileCode>,
    /// Where along the wall face the ray landed, in `[0, 1)`.
    pub tex_offset: f32,
}

/// One axis' candidate hit.
#[derive(Clone, Copy, Debug)]
struct AxisHit {
    depth: f32,
    tile: TileCode,
    offset: f32,
}

/// Casts `ray_count` rays for a viewpoint.
#[derive(Clone, Debug)]
pub struct RayCaster {
    screen: Screen,
    tile_size: f32,
    max_steps: u32,
}

impl RayCaster {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            screen: config.screen(),
            tile_size: config.tile_size,
            max_steps: config.max_ray_steps,
        }
    }

    #[inline]
    pub fn ray_count(&self) -> usize {
        self.screen.ray_count
    }

    /// Depth reported for columns that hit nothing; no hit is farther.
    #[inline]
    pub fn max_depth(&self) -> f32 {
        self.max_steps as f32
    }

    /// Cast every column. `None` when the viewpoint is off the grid.
    pub fn cast(&self, vp: &Viewpoint, grid: &TileGrid) -> Option<Vec<RayHit>> {
        let mut out = Vec::with_capacity(self.ray_count());
        self.cast_into(vp, grid, &mut out).then_some(out)
    }

    /// Like [`cast`](Self::cast) but reuses `out`. On success `out` holds
    /// exactly `ray_count` hits; on failure it is left empty.
    pub fn cast_into(&self, vp: &Viewpoint, grid: &TileGrid, out: &mut Vec<RayHit>) -> bool {
        out.clear();

        let Some((cell_x, cell_y)) = grid.world_to_grid(vp.pos(), self.tile_size) else {
            warn!("viewpoint at {:?} is off the grid, nothing cast", vp.pos());
            return false;
        };
        let origin = vp.pos() / self.tile_size;
        let cell = (cell_x as i64, cell_y as i64);
        let facing = vp.facing_radians();
        let first = facing - self.screen.half_fov + ANGLE_BIAS;

        for i in 0..self.screen.ray_count {
            let angle = first + i as f32 * self.screen.ray_step;
            let (sin, cos) = angle.sin_cos();

            let horizontal = self.walk_rows(grid, origin, cell, sin, cos);
            let vertical = self.walk_columns(grid, origin, cell, sin, cos);

            let nearest = match (horizontal, vertical) {
                (Some(h), Some(v)) => Some(if v.depth < h.depth { v } else { h }),
                (h, v) => h.or(v),
            };

            let hit = match nearest {
                Some(hit) => RayHit {
                    depth: hit.depth * (facing - angle).cos(),
                    sin,
                    cos,
                    tile: Some(hit.tile),
                    tex_offset: hit.offset,
                },
                None => RayHit {
                    depth: self.max_depth(),
                    sin,
                    cos,
                    tile: None,
                    tex_offset: 0.0,
                },
            };
            out.push(hit);
        }
        true
    }

    /// Step across horizontal grid lines (constant y).
    fn walk_rows(
        &self,
        grid: &TileGrid,
        origin: Vec2,
        cell: (i64, i64),
        sin: f32,
        cos: f32,
    ) -> Option<AxisHit> {
        if sin == 0.0 {
            return None;
        }
        // moving down we test the row below each line, moving up the row above
        let (mut line, step, row_bias) = if sin > 0.0 {
            (cell.1 + 1, 1, 0)
        } else {
            (cell.1, -1, -1)
        };

        // a budget of n tiles crosses at most n + 1 lines on one axis
        for _ in 0..=self.max_steps {
            let depth = (line as f32 - origin.y) / sin;
            if depth > self.max_depth() {
                return None;
            }
            let x = origin.x + depth * cos;
            let col = x.floor() as i64;
            let tile = grid.tile_at(col, line + row_bias)?;
            if grid.is_wall(col, line + row_bias) {
                let frac = x - x.floor();
                let offset = if sin > 0.0 { 1.0 - frac } else { frac };
                return Some(AxisHit {
                    depth,
                    tile,
                    offset: wrap_unit(offset),
                });
            }
            line += step;
        }
        None
    }

    /// Step across vertical grid lines (constant x).
    fn walk_columns(
        &self,
        grid: &TileGrid,
        origin: Vec2,
        cell: (i64, i64),
        sin: f32,
        cos: f32,
    ) -> Option<AxisHit> {
        if cos == 0.0 {
            return None;
        }
        let (mut line, step, col_bias) = if cos > 0.0 {
            (cell.0 + 1, 1, 0)
        } else {
            (cell.0, -1, -1)
        };

        // a budget of n tiles crosses at most n + 1 lines on one axis
        for _ in 0..=self.max_steps {
            let depth = (line as f32 - origin.x) / cos;
            if depth > self.max_depth() {
                return None;
            }
            let y = origin.y + depth * sin;
            let row = y.floor() as i64;
            let tile = grid.tile_at(line + col_bias, row)?;
            if grid.is_wall(line + col_bias, row) {
                let frac = y - y.floor();
                let offset = if cos > 0.0 { frac } else { 1.0 - frac };
                return Some(AxisHit {
                    depth,
                    tile,
                    offset: wrap_unit(offset),
                });
            }
            line += step;
        }
        None
    }
}

/// Fold 1.0 (and float spill-over) back into `[0, 1)`.
#[inline]
fn wrap_unit(v: f32) -> f32 {
    if (0.0..1.0).contains(&v) { v } else { v.rem_euclid(1.0) % 1.0 }
}
