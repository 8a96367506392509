//! Point entity → screen-space billboard.
//!
//! One routine serves every entity kind; the kinds differ only in the
//! [`Billboard`] they hand in (texture choice, frame, [`SpriteStyle`]).

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::{
    config::{RenderConfig, Screen, SpriteStyle},
    engine::types::{Rect, Renderable, RenderableKind},
    renderer::{Rgba, WHITE},
    world::{TextureId, Viewpoint},
};

/// Wrap an angle difference into `(-π, π]`.
///
/// Values already in range are returned untouched, so normalizing twice is
/// the same as normalizing once.
pub fn normalize_angle_delta(raw: f32) -> f32 {
    if raw > -PI && raw <= PI {
        return raw;
    }
    let mut a = raw % TAU;
    if a <= -PI {
        a += TAU;
    }
    if a > PI {
        a -= TAU;
    }
    a
}

/// The eight-way textures of an asymmetric sprite. Only five are stored:
/// the three left-hand views are the right-hand ones mirrored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionalTextures {
    pub front: TextureId,
    pub back: TextureId,
    pub side: TextureId,
    pub side_front: TextureId,
    pub side_back: TextureId,
}

impl DirectionalTextures {
    /// Pick the view for an entity facing `their_facing` degrees as seen by
    /// a viewer facing `our_facing` degrees. Returns the texture and whether
    /// it must be drawn mirrored.
    pub fn select(&self, our_facing: f32, their_facing: f32) -> (TextureId, bool) {
        let relative = (their_facing - our_facing).to_radians().rem_euclid(TAU);
        // bucket k covers (k·τ/8 − τ/16, k·τ/8 + τ/16]
        let k = ((relative - TAU / 16.0) / (TAU / 8.0)).ceil() as i32;
        match k.rem_euclid(8) {
            0 => (self.back, false),
            1 => (self.side_back, false),
            2 => (self.side, false),
            3 => (self.side_front, false),
            4 => (self.front, false),
            5 => (self.side_front, true),
            6 => (self.side, true),
            _ => (self.side_back, true),
        }
    }
}

/// How the entity chooses its texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Look {
    /// Same texture from every side.
    Flat(TextureId),
    /// Texture and mirroring follow the entity's own facing (degrees).
    Directional {
        textures: DirectionalTextures,
        facing: f32,
    },
}

/// Everything the projector needs to know about one entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Billboard {
    /// World units.
    pub position: Vec2,
    pub look: Look,
    /// Source rectangle of the current animation frame.
    pub frame: Rect,
    pub style: SpriteStyle,
    pub tint: Rgba,
}

impl Billboard {
    pub fn flat(position: Vec2, texture: TextureId, frame: Rect, style: SpriteStyle) -> Self {
        Self {
            position,
            look: Look::Flat(texture),
            frame,
            style,
            tint: WHITE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BillboardProjector {
    screen: Screen,
    tile_size: f32,
    near_plane: f32,
}

impl BillboardProjector {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            screen: config.screen(),
            tile_size: config.tile_size,
            near_plane: config.near_plane,
        }
    }

    /// Project `b` for `vp`. `None` when the entity is behind, too close,
    /// entirely off either side of the screen, or has non-finite data.
    pub fn project(&self, vp: &Viewpoint, b: &Billboard) -> Option<Renderable> {
        if !b.position.is_finite() || !b.frame.is_finite() {
            return None;
        }

        let delta = b.position - vp.pos();
        let theta = delta.y.atan2(delta.x);
        let angle = normalize_angle_delta(theta - vp.facing_radians());

        // depth along the view axis, same measure the walls sort by
        let distance = delta.length() / self.tile_size;
        let depth = distance * angle.cos();
        if !(depth > self.near_plane) {
            return None;
        }

        let column = (self.screen.half_ray_count as f32 + angle / self.screen.ray_step).trunc();
        let screen_x = column * self.screen.column_w;

        let size = self.screen.screen_distance / depth * b.style.scale;
        let aspect = if b.style.keep_frame_aspect && b.frame.h > 0.0 {
            b.frame.w / b.frame.h
        } else {
            1.0
        };
        let w = size * aspect;
        let h = size;
        let half_w = w * 0.5;

        if screen_x + half_w <= 0.0 || screen_x - half_w >= self.screen.w {
            return None;
        }

        let (texture, mirror) = match b.look {
            Look::Flat(tex) => (tex, false),
            Look::Directional { textures, facing } => {
                if !facing.is_finite() {
                    return None;
                }
                textures.select(vp.facing_degrees(), facing)
            }
        };

        let drop = b.style.offset_px + h * b.style.offset_fraction;
        Some(Renderable {
            kind: RenderableKind::Sprite,
            texture,
            target: Rect::new(screen_x - half_w, self.screen.half_h - h * 0.5 + drop, w, h),
            source: b.frame,
            depth,
            tint: b.tint,
            mirror,
        })
    }
}
