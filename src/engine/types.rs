use crate::{renderer::Rgba, world::TextureId};

/// Axis-aligned rectangle in pixels (screen) or texels (texture).
///
/// Kept in `f32` so clipping can trim source and target by the same
/// fraction without integer drift; backends round when they rasterise.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }

    /// True when the two rectangles share any area.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }
}

/// What produced a [`Renderable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableKind {
    /// One ray column of wall.
    Wall,
    /// A projected billboard.
    Sprite,
}

/// One textured quad waiting to be depth-sorted and composited.
///
/// Built and consumed within a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Renderable {
    pub kind: RenderableKind,
    pub texture: TextureId,
    /// Full-screen coordinates, before any split-screen remap.
    pub target: Rect,
    pub source: Rect,
    /// Camera-space depth in tiles, > 0. Only used for ordering.
    pub depth: f32,
    pub tint: Rgba,
    /// Draw the source flipped horizontally.
    pub mirror: bool,
}
