use glam::Vec2;

use crate::{
    engine::{DirectionalTextures, Rect},
    world::TextureId,
};

/// World-space position in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Facing in degrees, `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facing(pub f32);

/// Hidden entities are kept in the world but never projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visible(pub bool);

/// Billboard families; each one has its own [`SpriteStyle`](crate::config::SpriteStyle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Player,
    Dynamite,
    Explosion,
    Pickup,
    Grave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    /// 1..=4, also the viewport index.
    pub slot: u8,
    pub score: u32,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSprites {
    pub textures: DirectionalTextures,
    pub frame: Rect,
}

/// Dynamite bundle textures, one per size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickTextures {
    pub one: TextureId,
    pub three: TextureId,
    pub five: TextureId,
}

impl StickTextures {
    /// Texture for a bundle of `sticks`.
    ///
    /// # Panics
    /// A bundle of zero sticks cannot exist; asking for one is a bug upstream.
    pub fn for_size(&self, sticks: u8) -> TextureId {
        assert!(sticks >= 1, "dynamite bundle with {sticks} sticks");
        match sticks {
            5.. => self.five,
            3..=4 => self.three,
            _ => self.one,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dynamite {
    pub sticks: u8,
    pub textures: StickTextures,
    pub frame: Rect,
    pub lit: bool,
}

/// Blast covering whole grid cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub cells: Vec<(usize, usize)>,
    pub texture: TextureId,
    pub frame: Rect,
}

/// Single-texture billboard (pickups, graves).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub texture: TextureId,
    pub frame: Rect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_buckets() {
        let t = StickTextures {
            one: 1,
            three: 3,
            five: 5,
        };
        assert_eq!(t.for_size(1), 1);
        assert_eq!(t.for_size(2), 1);
        assert_eq!(t.for_size(3), 3);
        assert_eq!(t.for_size(4), 3);
        assert_eq!(t.for_size(5), 5);
        assert_eq!(t.for_size(u8::MAX), 5);
    }

    #[test]
    #[should_panic(expected = "0 sticks")]
    fn empty_bundle_is_a_bug() {
        let t = StickTextures {
            one: 1,
            three: 3,
            five: 5,
        };
        t.for_size(0);
    }
}
