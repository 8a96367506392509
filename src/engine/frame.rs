//! Whole-frame driver: scene snapshot in, draw commands out.
//!
//! For every viewport it casts the walls, projects every billboard the
//! viewer can see and hands the lot to the [`Compositor`]. The scene is
//! only borrowed immutably, so all viewports see one snapshot.

use hecs::Entity;
use log::{debug, trace, warn};

use super::{
    billboard::{Billboard, BillboardProjector, Look},
    compositor::{Compositor, OwnerStatus},
    layout::{LayoutError, SplitLayout, Viewport},
    raycast::{RayCaster, RayHit},
    types::{Rect, Renderable, RenderableKind},
};
use crate::{
    config::{ConfigError, RenderConfig, Screen},
    renderer::{DrawCommand, Renderer, RendererExt, Rgba, WHITE},
    sim::{
        Dynamite, Explosion, Facing, Player, PlayerSprites, Position, Scene, Sprite, SpriteKind,
        Visible,
    },
    world::{
        HARD_WALL, NO_TEXTURE, SOFT_WALL, TextureBank, TextureId, TileCode, TileGrid, Viewpoint,
    },
};

/// Keeps wall height finite for a zero-depth hit.
const DEPTH_GUARD: f32 = 1e-4;

const BLANK: Rgba = 0xFF_000000;

/// Wall texture per tile code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallTextures {
    pub soft: TextureId,
    pub hard: TextureId,
}

impl WallTextures {
    pub fn for_tile(&self, code: TileCode) -> TextureId {
        match code {
            SOFT_WALL => self.soft,
            HARD_WALL => self.hard,
            _ => NO_TEXTURE,
        }
    }
}

/// Which picture to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    /// One player's view over the whole screen.
    FullScreen { slot: u8 },
    /// Every player, laid out by player count.
    Split,
}

pub struct FrameRenderer {
    config: RenderConfig,
    screen: Screen,
    walls: WallTextures,
    caster: RayCaster,
    projector: BillboardProjector,
    compositor: Compositor,
    /// Reused while the player count stays the same.
    layout: Option<SplitLayout>,
    hits: Vec<RayHit>,
    records: Vec<Renderable>,
}

impl FrameRenderer {
    pub fn new(config: RenderConfig, walls: WallTextures) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            screen: config.screen(),
            caster: RayCaster::new(&config),
            projector: BillboardProjector::new(&config),
            compositor: Compositor::new(&config),
            config,
            walls,
            layout: None,
            hits: Vec::new(),
            records: Vec::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Layout for `players`, rebuilt only when the count changes.
    pub fn layout(&mut self, players: u8) -> Result<&SplitLayout, LayoutError> {
        let layout = match self.layout.take() {
            Some(l) if l.players() == players => l,
            _ => {
                let l = SplitLayout::new(players, self.screen.w, self.screen.h)?;
                debug!("split layout selected for {players} player(s)");
                l
            }
        };
        Ok(self.layout.insert(layout))
    }

    /// Build the draw list for one frame.
    pub fn build(
        &mut self,
        scene: &Scene,
        mode: ViewMode,
    ) -> Result<Vec<DrawCommand>, LayoutError> {
        let players = scene.players();
        let mut out = Vec::new();

        match mode {
            ViewMode::FullScreen { slot } => {
                let (entity, player) = players
                    .iter()
                    .find(|(_, p)| p.slot == slot)
                    .copied()
                    .ok_or(LayoutError::NoSuchViewport {
                        index: slot,
                        players: players.len() as u8,
                    })?;
                let viewport = *SplitLayout::new(1, self.screen.w, self.screen.h)?.viewport(1)?;
                self.render_view(scene, entity, player, &viewport, &mut out);
            }
            ViewMode::Split => {
                let count = u8::try_from(players.len()).unwrap_or(u8::MAX);
                let layout = self.layout(count)?.clone();
                for &(entity, player) in &players {
                    let Ok(viewport) = layout.viewport(player.slot) else {
                        warn!(
                            "player {} has no viewport in a {count}-player layout, not drawn",
                            player.slot
                        );
                        continue;
                    };
                    self.render_view(scene, entity, player, viewport, &mut out);
                }
                if let Some(blank) = layout.blank_region() {
                    out.push(DrawCommand::Fill {
                        rect: blank,
                        color: BLANK,
                    });
                }
                for line in layout.split_lines(self.config.split_line_thickness) {
                    out.push(DrawCommand::Fill {
                        rect: line,
                        color: self.config.split_line_color,
                    });
                }
            }
        }

        trace!("frame built: {} commands", out.len());
        Ok(out)
    }

    /// Build and rasterise one frame, handing the pixels to `submit`.
    pub fn draw<R, F>(
        &mut self,
        scene: &Scene,
        mode: ViewMode,
        bank: &TextureBank,
        renderer: &mut R,
        submit: F,
    ) -> Result<(), LayoutError>
    where
        R: Renderer,
        F: FnOnce(&[Rgba], usize, usize),
    {
        let cmds = self.build(scene, mode)?;
        renderer.draw_frame(
            self.config.screen_width as usize,
            self.config.screen_height as usize,
            &cmds,
            bank,
            submit,
        );
        Ok(())
    }

    fn render_view(
        &mut self,
        scene: &Scene,
        entity: Entity,
        player: Player,
        viewport: &Viewport,
        out: &mut Vec<DrawCommand>,
    ) {
        let owner = OwnerStatus {
            alive: player.alive,
            score: player.score,
        };
        self.records.clear();
        if player.alive {
            match scene.viewpoint(entity) {
                Some(vp) if is_sane(&vp) => self.gather(scene, entity, &vp),
                _ => warn!("player {} has no usable viewpoint, view skipped", player.slot),
            }
        }
        self.compositor.compose_into(viewport, &mut self.records, owner, out);
    }

    /// Full-screen records for `viewer`, unsorted.
    pub fn view_records(&mut self, scene: &Scene, viewer: Entity) -> Vec<Renderable> {
        self.records.clear();
        if let Some(vp) = scene.viewpoint(viewer).filter(is_sane) {
            self.gather(scene, viewer, &vp);
        }
        std::mem::take(&mut self.records)
    }

    /// Nothing is gathered for a viewer standing off the grid.
    fn gather(&mut self, scene: &Scene, viewer: Entity, vp: &Viewpoint) {
        if !self.gather_walls(scene.grid(), vp) {
            return;
        }
        let walls = self.records.len();
        self.gather_billboards(scene, viewer, vp);
        trace!(
            "viewer {:?}: {} wall strips, {} billboards",
            viewer,
            walls,
            self.records.len() - walls
        );
    }

    fn gather_walls(&mut self, grid: &TileGrid, vp: &Viewpoint) -> bool {
        if !self.caster.cast_into(vp, grid, &mut self.hits) {
            return false;
        }
        let tex_size = self.config.wall_texture_size as f32;
        let col_w = self.screen.column_w;
        for (i, hit) in self.hits.iter().enumerate() {
            let Some(code) = hit.tile else { continue };
            let h = self.screen.screen_distance / (hit.depth + DEPTH_GUARD);
            self.records.push(Renderable {
                kind: RenderableKind::Wall,
                texture: self.walls.for_tile(code),
                target: Rect::new(i as f32 * col_w, self.screen.half_h - h * 0.5, col_w, h),
                source: Rect::new(hit.tex_offset * (tex_size - col_w), 0.0, col_w, tex_size),
                depth: hit.depth,
                tint: WHITE,
                mirror: false,
            });
        }
        true
    }

    fn gather_billboards(&mut self, scene: &Scene, viewer: Entity, vp: &Viewpoint) {
        let world = scene.world();
        let grid = scene.grid();
        let styles = &self.config.sprites;
        let tile = scene.tile_size();
        let projector = &self.projector;
        let records = &mut self.records;
        // entities off the grid are not visible
        let mut push = |b: Billboard| {
            if grid.world_to_grid(b.position, tile).is_none() {
                return;
            }
            if let Some(r) = projector.project(vp, &b) {
                records.push(r);
            }
        };

        for (e, (player, pos, facing, sprites, vis)) in world
            .query::<(&Player, &Position, &Facing, &PlayerSprites, Option<&Visible>)>()
            .iter()
        {
            if e == viewer || !player.alive || !shown(vis) {
                continue;
            }
            if !pos.0.is_finite() || !facing.0.is_finite() {
                warn!("player {} has a non-finite pose, not drawn", player.slot);
                continue;
            }
            push(Billboard {
                position: pos.0,
                look: Look::Directional {
                    textures: sprites.textures,
                    facing: facing.0,
                },
                frame: sprites.frame,
                style: *styles.style(SpriteKind::Player),
                tint: WHITE,
            });
        }

        for (e, (pos, dynamite, vis)) in world
            .query::<(&Position, &Dynamite, Option<&Visible>)>()
            .iter()
        {
            if !dynamite.lit || !shown(vis) {
                continue;
            }
            if !pos.0.is_finite() {
                warn!("dynamite {e:?} has a non-finite position, not drawn");
                continue;
            }
            push(Billboard::flat(
                pos.0,
                dynamite.textures.for_size(dynamite.sticks),
                dynamite.frame,
                *styles.style(SpriteKind::Dynamite),
            ));
        }

        for (_, (explosion, vis)) in world.query::<(&Explosion, Option<&Visible>)>().iter() {
            if !shown(vis) {
                continue;
            }
            for &(x, y) in &explosion.cells {
                push(Billboard::flat(
                    TileGrid::cell_center(x, y, tile),
                    explosion.texture,
                    explosion.frame,
                    *styles.style(SpriteKind::Explosion),
                ));
            }
        }

        for (e, (pos, sprite, vis)) in world
            .query::<(&Position, &Sprite, Option<&Visible>)>()
            .iter()
        {
            if !shown(vis) {
                continue;
            }
            if !pos.0.is_finite() {
                warn!("{:?} {e:?} has a non-finite position, not drawn", sprite.kind);
                continue;
            }
            push(Billboard::flat(
                pos.0,
                sprite.texture,
                sprite.frame,
                *styles.style(sprite.kind),
            ));
        }
    }
}

#[inline]
fn shown(vis: Option<&Visible>) -> bool {
    vis.is_none_or(|v| v.0)
}

fn is_sane(vp: &Viewpoint) -> bool {
    vp.pos().is_finite() && vp.facing_degrees().is_finite()
}
