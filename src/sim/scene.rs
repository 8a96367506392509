use glam::Vec2;
use hecs::{Entity, World};
use log::debug;

use super::components::{
    Dynamite, Explosion, Facing, Player, PlayerSprites, Position, Sprite, SpriteKind,
    StickTextures, Visible,
};
use crate::{
    engine::Rect,
    world::{TextureId, TileGrid, Viewpoint, normalize_degrees},
};

/// The shared world every viewport renders.
///
/// Rendering only ever borrows `&Scene`, so a frame cannot observe a
/// half-applied simulation step.
pub struct Scene {
    world: World,
    grid: TileGrid,
    tile_size: f32,
}

impl Scene {
    pub fn new(grid: TileGrid, tile_size: f32) -> Self {
        Self {
            world: World::new(),
            grid,
            tile_size,
        }
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[inline]
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    #[inline]
    pub fn grid_mut(&mut self) -> &mut TileGrid {
        &mut self.grid
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /* ---------------------------------------------------------------- */
    /* spawning                                                         */
    /* ---------------------------------------------------------------- */

    /// Spawn player `slot` (1..=4).
    ///
    /// # Panics
    /// If `slot` is outside 1..=4 or already taken.
    pub fn spawn_player(
        &mut self,
        slot: u8,
        pos: Vec2,
        facing: f32,
        sprites: PlayerSprites,
    ) -> Entity {
        assert!((1..=4).contains(&slot), "player slot {slot} outside 1..=4");
        assert!(self.player(slot).is_none(), "player slot {slot} already taken");
        debug!("spawning player {slot} at {pos:?}");
        self.world.spawn((
            Player {
                slot,
                score: 0,
                alive: true,
            },
            Position(pos),
            Facing(normalize_degrees(facing)),
            sprites,
            Visible(true),
        ))
    }

    /// Spawn player `slot` on its spawn tile. `None` when the map lacks one.
    pub fn spawn_player_at_start(
        &mut self,
        slot: u8,
        facing: f32,
        sprites: PlayerSprites,
    ) -> Option<Entity> {
        let pos = self.grid.spawn_point(slot, self.tile_size)?;
        Some(self.spawn_player(slot, pos, facing, sprites))
    }

    /// Lit bundle of `sticks` at `pos`.
    pub fn spawn_dynamite(
        &mut self,
        pos: Vec2,
        sticks: u8,
        textures: StickTextures,
        frame: Rect,
    ) -> Entity {
        self.world.spawn((
            Position(pos),
            Dynamite {
                sticks,
                textures,
                frame,
                lit: true,
            },
            Visible(true),
        ))
    }

    pub fn spawn_explosion(
        &mut self,
        cells: Vec<(usize, usize)>,
        texture: TextureId,
        frame: Rect,
    ) -> Entity {
        self.world.spawn((
            Explosion {
                cells,
                texture,
                frame,
            },
            Visible(true),
        ))
    }

    pub fn spawn_pickup(&mut self, pos: Vec2, texture: TextureId, frame: Rect) -> Entity {
        self.spawn_sprite(SpriteKind::Pickup, pos, texture, frame)
    }

    pub fn spawn_grave(&mut self, pos: Vec2, texture: TextureId, frame: Rect) -> Entity {
        self.spawn_sprite(SpriteKind::Grave, pos, texture, frame)
    }

    fn spawn_sprite(
        &mut self,
        kind: SpriteKind,
        pos: Vec2,
        texture: TextureId,
        frame: Rect,
    ) -> Entity {
        self.world.spawn((
            Position(pos),
            Sprite {
                kind,
                texture,
                frame,
            },
            Visible(true),
        ))
    }

    /* ---------------------------------------------------------------- */
    /* queries & updates                                                */
    /* ---------------------------------------------------------------- */

    /// Entity of player `slot`, if spawned.
    pub fn player(&self, slot: u8) -> Option<Entity> {
        self.world
            .query::<&Player>()
            .iter()
            .find(|(_, p)| p.slot == slot)
            .map(|(e, _)| e)
    }

    /// Snapshot of every player, ordered by slot.
    pub fn players(&self) -> Vec<(Entity, Player)> {
        let mut out: Vec<_> = self
            .world
            .query::<&Player>()
            .iter()
            .map(|(e, p)| (e, *p))
            .collect();
        out.sort_by_key(|(_, p)| p.slot);
        out
    }

    /// Eye of `entity`. `None` when it has no position or facing.
    pub fn viewpoint(&self, entity: Entity) -> Option<Viewpoint> {
        let mut q = self
            .world
            .query_one::<(&Position, &Facing)>(entity)
            .ok()?;
        let (pos, facing) = q.get()?;
        Some(Viewpoint::new(pos.0, facing.0))
    }

    pub fn set_visible(&mut self, entity: Entity, visible: bool) -> bool {
        match self.world.get::<&mut Visible>(entity) {
            Ok(mut v) => {
                v.0 = visible;
                true
            }
            Err(_) => false,
        }
    }

    pub fn add_score(&mut self, entity: Entity, points: u32) {
        if let Ok(mut p) = self.world.get::<&mut Player>(entity) {
            p.score = p.score.saturating_add(points);
        }
    }

    /// Mark a living player dead and leave a grave where they stood.
    /// Returns the grave, or `None` if `entity` was not a living player.
    pub fn kill_player(
        &mut self,
        entity: Entity,
        grave_texture: TextureId,
        frame: Rect,
    ) -> Option<Entity> {
        let pos = {
            let mut q = self
                .world
                .query_one::<(&mut Player, &Position)>(entity)
                .ok()?;
            let (player, pos) = q.get()?;
            if !player.alive {
                return None;
            }
            player.alive = false;
            debug!("player {} died at {:?}", player.slot, pos.0);
            pos.0
        };
        Some(self.spawn_grave(pos, grave_texture, frame))
    }
}
