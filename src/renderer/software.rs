//! ---------------------------------------------------------------------------
//! CPU back-end
//!
//! * Fills a `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Commands arrive in painter's order, so no Z-buffer is kept: each one
//!   simply overwrites what is under it.
//! * Blits are nearest-neighbour; texels with alpha 0 are skipped.
//! ---------------------------------------------------------------------------

use crate::{
    engine::Rect,
    renderer::{DrawCommand, Renderer, Rgba, font, modulate},
    world::{Texture, TextureBank},
};

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
    clear: Rgba,
    /// Screen pixels per font pixel.
    text_scale: usize,
}

impl Default for Software {
    fn default() -> Self {
        Self {
            scratch: Vec::new(),
            width: 0,
            height: 0,
            clear: 0xFF_000000,
            text_scale: 3,
        }
    }
}

impl Software {
    pub fn with_text_scale(mut self, scale: usize) -> Self {
        self.text_scale = scale.max(1);
        self
    }

    /// The buffer as of the last command (row-major, `width * height`).
    pub fn pixels(&self) -> &[Rgba] {
        &self.scratch
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.scratch[y * self.width + x])
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(self.clear);
    }

    fn draw(&mut self, cmd: &DrawCommand, bank: &TextureBank) {
        match cmd {
            DrawCommand::Fill { rect, color } => self.fill(rect, *color),
            DrawCommand::Blit {
                texture,
                source,
                target,
                tint,
                mirror,
            } => {
                let tex = bank.texture_or_missing(*texture);
                self.blit(tex, source, target, *tint, *mirror);
            }
            DrawCommand::Text {
                text,
                position,
                color,
            } => self.text(text, *position, *color),
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────── rasterisation ──────────────────────────────*/

/// Integer pixel span `[start, end)` covered by `[lo, hi)`, clamped to `0..max`.
#[inline]
fn span(lo: f32, hi: f32, max: usize) -> (usize, usize) {
    let a = lo.round().clamp(0.0, max as f32) as usize;
    let b = hi.round().clamp(0.0, max as f32) as usize;
    (a, b.max(a))
}

impl Software {
    fn fill(&mut self, rect: &Rect, color: Rgba) {
        if !rect.is_finite() || rect.is_empty() {
            return;
        }
        let (x0, x1) = span(rect.x, rect.right(), self.width);
        let (y0, y1) = span(rect.y, rect.bottom(), self.height);
        for y in y0..y1 {
            let row = y * self.width;
            self.scratch[row + x0..row + x1].fill(color);
        }
    }

    fn blit(&mut self, tex: &Texture, source: &Rect, target: &Rect, tint: Rgba, mirror: bool) {
        if !target.is_finite() || !source.is_finite() || target.is_empty() || source.is_empty()
        {
            return;
        }
        let (x0, x1) = span(target.x, target.right(), self.width);
        let (y0, y1) = span(target.y, target.bottom(), self.height);
        if x0 == x1 || y0 == y1 {
            return;
        }

        let su = source.w / target.w;
        let sv = source.h / target.h;
        let max_u = tex.w - 1;
        let max_v = tex.h - 1;

        // texel column per screen column, computed once
        let columns: Vec<usize> = (x0..x1)
            .map(|x| {
                let t = (x as f32 + 0.5 - target.x) * su;
                let u = if mirror {
                    source.right() - t
                } else {
                    source.x + t
                };
                (u.max(0.0) as usize).min(max_u)
            })
            .collect();

        for y in y0..y1 {
            let v = source.y + (y as f32 + 0.5 - target.y) * sv;
            let v = (v.max(0.0) as usize).min(max_v);
            let row = y * self.width;
            for (x, &u) in (x0..x1).zip(&columns) {
                let texel = tex.texel(u, v);
                if texel >> 24 == 0 {
                    continue;
                }
                self.scratch[row + x] = modulate(texel, tint);
            }
        }
    }

    fn text(&mut self, text: &str, (x, y): (f32, f32), color: Rgba) {
        let s = self.text_scale as f32;
        let mut pen_x = x;
        for c in text.chars() {
            let glyph = font::glyph(c);
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..font::GLYPH_W {
                    if bits & (0b100 >> col) != 0 {
                        let px = Rect::new(pen_x + col as f32 * s, y + row as f32 * s, s, s);
                        self.fill(&px, color);
                    }
                }
            }
            pen_x += font::ADVANCE as f32 * s;
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{RendererExt, WHITE};

    /* tiny helpers ---------------------------------------------------*/

    /// 2x1 texture: left texel red, right texel transparent.
    fn tiny_bank() -> (TextureBank, u16) {
        let mut bank = TextureBank::default_with_checker();
        let id = bank
            .insert(
                "HALF",
                Texture {
                    name: "HALF".into(),
                    w: 2,
                    h: 1,
                    pixels: vec![0xFF_FF0000, 0x00_00FF00],
                },
            )
            .unwrap();
        (bank, id)
    }

    fn blit(id: u16, mirror: bool, tint: Rgba) -> DrawCommand {
        DrawCommand::Blit {
            texture: id,
            source: Rect::new(0.0, 0.0, 2.0, 1.0),
            target: Rect::new(0.0, 0.0, 4.0, 2.0),
            tint,
            mirror,
        }
    }

    fn render(cmds: &[DrawCommand], bank: &TextureBank) -> Software {
        let mut sw = Software::default();
        sw.draw_frame(4, 4, cmds, bank, |fb, w, h| assert_eq!(fb.len(), w * h));
        sw
    }

    #[test]
    fn fill_is_clipped_to_the_buffer() {
        let bank = TextureBank::default();
        let sw = render(
            &[DrawCommand::Fill {
                rect: Rect::new(-10.0, 2.0, 100.0, 100.0),
                color: 0xFF_00FF00,
            }],
            &bank,
        );
        assert_eq!(sw.pixel(0, 1), Some(0xFF_000000));
        assert_eq!(sw.pixel(0, 2), Some(0xFF_00FF00));
        assert_eq!(sw.pixel(3, 3), Some(0xFF_00FF00));
    }

    #[test]
    fn blit_scales_and_skips_transparent_texels() {
        let (bank, id) = tiny_bank();
        let sw = render(&[blit(id, false, WHITE)], &bank);
        assert_eq!(sw.pixel(0, 0), Some(0xFF_FF0000));
        assert_eq!(sw.pixel(1, 1), Some(0xFF_FF0000));
        // right half was alpha 0: the clear colour shows through
        assert_eq!(sw.pixel(3, 0), Some(0xFF_000000));
        assert_eq!(sw.pixel(0, 2), Some(0xFF_000000));
    }

    #[test]
    fn mirror_flips_horizontally() {
        let (bank, id) = tiny_bank();
        let sw = render(&[blit(id, true, WHITE)], &bank);
        assert_eq!(sw.pixel(0, 0), Some(0xFF_000000));
        assert_eq!(sw.pixel(3, 0), Some(0xFF_FF0000));
    }

    #[test]
    fn tint_multiplies() {
        let (bank, id) = tiny_bank();
        let sw = render(&[blit(id, false, 0xFF_808080)], &bank);
        assert_eq!(sw.pixel(0, 0), Some(0xFF_800000));
    }

    #[test]
    fn unknown_texture_draws_checker() {
        let bank = TextureBank::default();
        let sw = render(&[blit(999, false, WHITE)], &bank);
        assert_eq!(sw.pixel(0, 0), Some(0xFF_FF00FF));
    }

    #[test]
    fn text_lights_glyph_pixels() {
        let bank = TextureBank::default();
        let mut sw = Software::default().with_text_scale(1);
        sw.draw_frame(
            8,
            8,
            &[DrawCommand::Text {
                text: "1".into(),
                position: (0.0, 0.0),
                color: WHITE,
            }],
            &bank,
            |_, _, _| {},
        );
        // "1" = .#. / ##. / .#. / .#. / ###
        assert_eq!(sw.pixel(1, 0), Some(WHITE));
        assert_eq!(sw.pixel(0, 0), Some(0xFF_000000));
        assert_eq!(sw.pixel(0, 1), Some(WHITE));
        assert_eq!(sw.pixel(2, 4), Some(WHITE));
        assert_eq!(sw.pixel(3, 0), Some(0xFF_000000));
    }
}
