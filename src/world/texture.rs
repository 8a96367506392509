// Format-agnostic repository of textures.
// The pipeline and draw commands refer to textures through `TextureId` only.

use std::collections::HashMap;

use crate::renderer::Rgba;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
/// Alpha 0 is fully transparent; anything else is drawn opaque.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
}

/// Convenience checkerboard 8×8 (magenta/black), loud on purpose.
impl Default for Texture {
    fn default() -> Self {
        Texture::checker("CHECKER", 8, 8, 1, 0xFF_FF00FF, 0xFF_000000)
    }
}

impl Texture {
    pub fn solid(name: &str, w: usize, h: usize, colour: Rgba) -> Self {
        Texture {
            name: name.to_string(),
            w,
            h,
            pixels: vec![colour; w * h],
        }
    }

    /// Checkerboard with `cell`-sized squares.
    pub fn checker(name: &str, w: usize, h: usize, cell: usize, a: Rgba, b: Rgba) -> Self {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                pixels.push(if ((x / cell) ^ (y / cell)) & 1 == 0 { a } else { b });
            }
        }
        Texture {
            name: name.to_string(),
            w,
            h,
            pixels,
        }
    }

    /// Running-bond brick pattern, `rows` courses high.
    pub fn bricks(name: &str, size: usize, rows: usize, brick: Rgba, mortar: Rgba) -> Self {
        let course = (size / rows.max(1)).max(2);
        let brick_w = course * 2;
        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size {
            let row = y / course;
            let shift = if row % 2 == 0 { 0 } else { brick_w / 2 };
            for x in 0..size {
                let is_mortar = y % course == 0 || (x + shift) % brick_w == 0;
                pixels.push(if is_mortar { mortar } else { brick });
            }
        }
        Texture {
            name: name.to_string(),
            w: size,
            h: size,
            pixels,
        }
    }

    /// Texel at `(u, v)`; callers keep coordinates in range.
    #[inline]
    pub fn texel(&self, u: usize, v: usize) -> Rgba {
        self.pixels[v * self.w + u]
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// Pixel vector does not match the declared size.
    #[error("texture `{name}` has {got} pixels, expected {w}x{h}")]
    BadSize {
        name: String,
        w: usize,
        h: usize,
        got: usize,
    },
}

/// A format-agnostic cache of textures.
///
/// * Does **not** know about files or GPUs.
/// * Stores exactly one copy of every name.
/// * ID **0** is always the "missing" checkerboard.
///
/// Shared read-only by every viewport during a frame.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl Default for TextureBank {
    fn default() -> Self {
        Self::default_with_checker()
    }
}

impl TextureBank {
    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback. The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    /// Number of textures stored (including the "missing" one).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    }

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Fallback-safe query: unknown names resolve to the checkerboard id.
    pub fn id_or_missing(&self, name: &str) -> TextureId {
        self.id(name).unwrap_or(NO_TEXTURE)
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Like [`texture`](Self::texture) but never fails: bad ids draw the
    /// checkerboard.
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data
            .get(id as usize)
            .unwrap_or(&self.data[NO_TEXTURE as usize])
    }

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`) or the pixel
    ///   count is wrong (`BadSize`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        if tex.pixels.len() != tex.w * tex.h || tex.w == 0 || tex.h == 0 {
            return Err(TextureError::BadSize {
                name,
                w: tex.w,
                h: tex.h,
                got: tex.pixels.len(),
            });
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
