use glam::Vec2;

/// Wrap `deg` into `[0, 360)`.
#[inline]
pub fn normalize_degrees(deg: f32) -> f32 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negatives
    if d >= 360.0 { 0.0 } else { d }
}

/// A player's eye on the tile world.
///
/// * Position is in world units, the same space entities live in.
/// * Facing is in degrees, 0 = +X, growing towards +Y, always in `[0, 360)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewpoint {
    pos: Vec2,
    facing: f32,
}

impl Viewpoint {
    pub fn new(pos: Vec2, facing_degrees: f32) -> Self {
        Self {
            pos,
            facing: normalize_degrees(facing_degrees),
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn facing_degrees(&self) -> f32 {
        self.facing
    }

    #[inline]
    pub fn facing_radians(&self) -> f32 {
        self.facing.to_radians()
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector the viewpoint looks along.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.facing_radians().sin_cos();
        Vec2::new(c, s)
    }

    /// Unit vector to the viewer's right (screen +X).
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        self.forward().perp()
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units along the facing and `side` units to the right.
    pub fn step(&mut self, forward: f32, side: f32) {
        self.pos += self.forward() * forward + self.right() * side;
    }

    /// Turn by `delta` degrees (positive = towards screen right).
    pub fn turn(&mut self, delta: f32) {
        self.facing = normalize_degrees(self.facing + delta);
    }
}
