// Top-down debug view of the grid, players and dynamite.

use crate::{
    config::RenderConfig,
    engine::Rect,
    renderer::{DrawCommand, Rgba},
    sim::{Dynamite, Facing, Player, Position, Scene},
    world::{HARD_WALL, SOFT_WALL},
};

const SOFT_COLOR: Rgba = 0xFF_F4A460;
const HARD_COLOR: Rgba = 0xFF_8B4513;
const DYNAMITE_COLOR: Rgba = 0xFF_E02020;
const PLAYER_COLORS: [Rgba; 4] = [0xFF_3060FF, 0xFF_30C030, 0xFF_E0C020, 0xFF_C030C0];

/// Dots in the facing marker.
const MARKER_DOTS: usize = 4;

/// Fill commands for a map drawn at `scale` pixels per tile, origin at the
/// top-left of the screen.
pub fn draw_overview(scene: &Scene, config: &RenderConfig, scale: f32) -> Vec<DrawCommand> {
    let grid = scene.grid();
    let mut out = vec![DrawCommand::Fill {
        rect: Rect::new(
            0.0,
            0.0,
            grid.width() as f32 * scale,
            grid.height() as f32 * scale,
        ),
        color: config.floor_color,
    }];

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let color = match grid.tile_at(x as i64, y as i64) {
                Some(SOFT_WALL) => SOFT_COLOR,
                Some(HARD_WALL) => HARD_COLOR,
                _ => continue,
            };
            out.push(DrawCommand::Fill {
                rect: Rect::new(x as f32 * scale, y as f32 * scale, scale, scale),
                color,
            });
        }
    }

    // world units → overview pixels
    let k = scale / scene.tile_size();
    let dot = |c: glam::Vec2, size: f32, color: Rgba| DrawCommand::Fill {
        rect: Rect::new(c.x * k - size * 0.5, c.y * k - size * 0.5, size, size),
        color,
    };

    let world = scene.world();
    for (_, (pos, dynamite)) in world.query::<(&Position, &Dynamite)>().iter() {
        if dynamite.lit && pos.0.is_finite() {
            out.push(dot(pos.0, scale * 0.2, DYNAMITE_COLOR));
        }
    }

    for (_, (player, pos, facing)) in world.query::<(&Player, &Position, &Facing)>().iter() {
        if !player.alive || !pos.0.is_finite() {
            continue;
        }
        let color = PLAYER_COLORS[usize::from(player.slot.saturating_sub(1)) % PLAYER_COLORS.len()];
        out.push(dot(pos.0, scale * 0.3, color));

        let (s, c) = facing.0.to_radians().sin_cos();
        let dir = glam::vec2(c, s);
        let step = scene.tile_size() / MARKER_DOTS as f32;
        for i in 1..=MARKER_DOTS {
            out.push(dot(pos.0 + dir * step * i as f32, scale * 0.1, color));
        }
    }

    out
}
