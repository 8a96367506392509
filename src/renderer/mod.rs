//! Rendering abstraction layer.
//!
//! *The pipeline never touches a pixel buffer directly.*
//! It produces a list of [`DrawCommand`]s (painter's order: back to front)
//! and hands them to a type that implements [`Renderer`].
//!
//! * Any 2D blitter can be a back-end; only [`software`] ships here.
//! * A blanket impl [`RendererExt`] adds `draw_frame` so call-sites stay
//!   short.

use crate::{engine::Rect, world::TextureBank};

mod font;
pub mod software;

pub use font::{GLYPH_H, GLYPH_W, text_width};
pub use software::Software;

/// Pixel format of every buffer and texture (0xAARRGGBB).
pub type Rgba = u32;

/// Neutral tint.
pub const WHITE: Rgba = 0xFF_FFFFFF;

/// One primitive for the back-end, already in final screen coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Solid rectangle.
    Fill { rect: Rect, color: Rgba },
    /// Copy `source` texels of `texture` into `target`, scaling as needed.
    Blit {
        texture: crate::world::TextureId,
        source: Rect,
        target: Rect,
        tint: Rgba,
        mirror: bool,
    },
    /// Overlay text, top-left anchored at `position` (x, y).
    Text {
        text: String,
        position: (f32, f32),
        color: Rgba,
    },
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window manager;
/// GPU back-ends can pass an empty slice because they never allocate one.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Rasterise one command into the internal buffer.
    fn draw(&mut self, cmd: &DrawCommand, bank: &TextureBank);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(
        &mut self,
        width: usize,
        height: usize,
        cmds: &[DrawCommand],
        bank: &TextureBank,
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        for c in cmds {
            self.draw(c, bank);
        }
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

/// Per-channel multiply of `color` by `tint`; alpha comes from `color`.
#[inline]
pub fn modulate(color: Rgba, tint: Rgba) -> Rgba {
    if tint == WHITE {
        return color;
    }
    let ch = |shift: u32| {
        let a = (color >> shift) & 0xFF;
        let b = (tint >> shift) & 0xFF;
        ((a * b + 127) / 255) << shift
    };
    (color & 0xFF00_0000) | ch(16) | ch(8) | ch(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modulate_channels() {
        assert_eq!(modulate(0xFF_123456, WHITE), 0xFF_123456);
        assert_eq!(modulate(0xFF_FFFFFF, 0xFF_FF0000), 0xFF_FF0000);
        assert_eq!(modulate(0x80_FF8000, 0xFF_808080), 0x80_804000);
    }
}
