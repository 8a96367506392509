//! Per-viewport painter's pass.
//!
//! One implementation covers every split layout; the layouts differ only in
//! the [`Viewport`] (region, divisors, clip edges) handed in.

use log::trace;

use super::{
    layout::{ClipEdges, Viewport},
    types::{Rect, Renderable},
};
use crate::{
    config::RenderConfig,
    renderer::{DrawCommand, Rgba},
};

/// What the overlay needs to know about a viewport's owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnerStatus {
    pub alive: bool,
    pub score: u32,
}

#[derive(Clone, Debug)]
pub struct Compositor {
    sky: Rgba,
    floor: Rgba,
    text: Rgba,
    score_margin: f32,
}

impl Compositor {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            sky: config.sky_color,
            floor: config.floor_color,
            text: config.text_color,
            score_margin: config.score_margin,
        }
    }

    /// Sort, remap and clip `records` into `viewport`, appending to `out`.
    ///
    /// `records` are in full-screen coordinates and are consumed (sorted in
    /// place). A dead owner gets the score line only.
    pub fn compose_into(
        &self,
        viewport: &Viewport,
        records: &mut [Renderable],
        owner: OwnerStatus,
        out: &mut Vec<DrawCommand>,
    ) {
        let region = viewport.region;

        if owner.alive {
            let half = region.h * 0.5;
            out.push(DrawCommand::Fill {
                rect: Rect::new(region.x, region.y, region.w, half),
                color: self.sky,
            });
            out.push(DrawCommand::Fill {
                rect: Rect::new(region.x, region.y + half, region.w, region.h - half),
                color: self.floor,
            });

            sort_far_to_near(records);

            let before = out.len();
            for r in records.iter() {
                let target = viewport.remap(&r.target);
                let Some((target, source)) =
                    clip_to_region(&region, viewport.clip, target, r.source, r.mirror)
                else {
                    continue;
                };
                out.push(DrawCommand::Blit {
                    texture: r.texture,
                    source,
                    target,
                    tint: r.tint,
                    mirror: r.mirror,
                });
            }
            trace!(
                "viewport {}: {} of {} records drawn",
                viewport.index,
                out.len() - before,
                records.len()
            );
        }

        out.push(DrawCommand::Text {
            text: format!("Score: {}", owner.score),
            position: (region.x + self.score_margin, region.y + self.score_margin),
            color: self.text,
        });
    }

    pub fn compose(
        &self,
        viewport: &Viewport,
        records: &mut [Renderable],
        owner: OwnerStatus,
    ) -> Vec<DrawCommand> {
        let mut out = Vec::with_capacity(records.len() + 3);
        self.compose_into(viewport, records, owner, &mut out);
        out
    }
}

/// Farthest first. Stable, so equal depths keep their gather order.
pub fn sort_far_to_near(records: &mut [Renderable]) {
    records.sort_by(|a, b| b.depth.total_cmp(&a.depth));
}

/// Trim `target` to `region` along the flagged edges, trimming `source` by
/// the same fraction so texels stay locked to pixels.
///
/// Returns `None` when nothing of `target` lies inside `region`. For a
/// mirrored record the source is read right-to-left, so horizontal cuts come
/// off the opposite end of the source.
pub fn clip_to_region(
    region: &Rect,
    edges: ClipEdges,
    target: Rect,
    source: Rect,
    mirror: bool,
) -> Option<(Rect, Rect)> {
    if !target.is_finite() || !region.overlaps(&target) {
        return None;
    }
    let (mut t, mut s) = (target, source);
    let sx = s.w / t.w;
    let sy = s.h / t.h;

    if edges.contains(ClipEdges::TOP) && t.y < region.y {
        let cut = region.y - t.y;
        t.y = region.y;
        t.h -= cut;
        s.y += cut * sy;
        s.h -= cut * sy;
    }
    if edges.contains(ClipEdges::BOTTOM) && t.bottom() > region.bottom() {
        let cut = t.bottom() - region.bottom();
        t.h -= cut;
        s.h -= cut * sy;
    }
    if edges.contains(ClipEdges::LEFT) && t.x < region.x {
        let cut = region.x - t.x;
        t.x = region.x;
        t.w -= cut;
        if !mirror {
            s.x += cut * sx;
        }
        s.w -= cut * sx;
    }
    if edges.contains(ClipEdges::RIGHT) && t.right() > region.right() {
        let cut = t.right() - region.right();
        t.w -= cut;
        if mirror {
            s.x += cut * sx;
        }
        s.w -= cut * sx;
    }

    (!t.is_empty()).then_some((t, s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{layout::SplitLayout, types::RenderableKind},
        renderer::WHITE,
    };

    const EPS: f32 = 1e-4;

    fn rec(texture: u16, depth: f32, target: Rect, source: Rect) -> Renderable {
        Renderable {
            kind: RenderableKind::Wall,
            texture,
            target,
            source,
            depth,
            tint: WHITE,
            mirror: false,
        }
    }

    fn blits(cmds: &[DrawCommand]) -> Vec<(u16, Rect, Rect, bool)> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCommand::Blit {
                    texture,
                    source,
                    target,
                    mirror,
                    ..
                } => Some((*texture, *source, *target, *mirror)),
                _ => None,
            })
            .collect()
    }

    fn alive(score: u32) -> OwnerStatus {
        OwnerStatus { alive: true, score }
    }

    fn compositor() -> Compositor {
        Compositor::new(&RenderConfig::default())
    }

    #[test]
    fn farthest_first_and_stable() {
        let layout = SplitLayout::new(1, 1600.0, 900.0).unwrap();
        let vp = layout.viewport(1).unwrap();
        let r = Rect::new(10.0, 10.0, 10.0, 10.0);
        let mut records = vec![
            rec(1, 2.0, r, r),
            rec(2, 9.0, r, r),
            rec(3, 2.0, r, r),
            rec(4, 5.5, r, r),
            rec(5, 2.0, r, r),
        ];
        let cmds = compositor().compose(vp, &mut records, alive(0));
        let order: Vec<u16> = blits(&cmds).iter().map(|b| b.0).collect();
        assert_eq!(order, [2, 4, 1, 3, 5]);
    }

    #[test]
    fn command_sequence_for_a_living_owner() {
        let layout = SplitLayout::new(2, 1600.0, 900.0).unwrap();
        let vp = layout.viewport(2).unwrap();
        let r = Rect::new(0.0, 400.0, 20.0, 100.0);
        let cmds = compositor().compose(vp, &mut [rec(1, 3.0, r, r)], alive(42));

        assert_eq!(cmds.len(), 4);
        assert_eq!(
            cmds[0],
            DrawCommand::Fill {
                rect: Rect::new(0.0, 450.0, 1600.0, 225.0),
                color: RenderConfig::default().sky_color,
            }
        );
        assert!(matches!(cmds[1], DrawCommand::Fill { .. }));
        assert!(matches!(cmds[2], DrawCommand::Blit { .. }));
        assert_eq!(
            cmds[3],
            DrawCommand::Text {
                text: "Score: 42".into(),
                position: (10.0, 460.0),
                color: RenderConfig::default().text_color,
            }
        );
    }

    #[test]
    fn dead_owner_keeps_only_the_score() {
        let layout = SplitLayout::new(4, 1600.0, 900.0).unwrap();
        let vp = layout.viewport(3).unwrap();
        let r = Rect::new(10.0, 10.0, 10.0, 10.0);
        let cmds = compositor().compose(
            vp,
            &mut [rec(1, 3.0, r, r)],
            OwnerStatus {
                alive: false,
                score: 7,
            },
        );
        assert_eq!(cmds.len(), 1);
        assert!(matches!(
            &cmds[0],
            DrawCommand::Text { text, position, .. } if text == "Score: 7" && *position == (10.0, 460.0)
        ));
    }

    #[test]
    fn strip_crossing_the_quadrant_seam_is_cut_exactly() {
        let layout = SplitLayout::new(4, 1600.0, 900.0).unwrap();
        let vp = layout.viewport(1).unwrap();
        // full-screen x 1500..1700 → 750..850 after halving, seam at 800
        let target = Rect::new(1500.0, 300.0, 200.0, 300.0);
        let source = Rect::new(40.0, 0.0, 20.0, 256.0);
        let cmds = compositor().compose(vp, &mut [rec(1, 3.0, target, source)], alive(0));
        let (_, s, t, _) = blits(&cmds)[0];

        assert!((t.x - 750.0).abs() < EPS);
        assert!((t.right() - 800.0).abs() < EPS, "{t:?}");
        assert!((s.x - 40.0).abs() < EPS);
        assert!((s.w - 10.0).abs() < EPS, "{s:?}");
        // not stretched: texels per pixel unchanged
        assert!((s.w / t.w - 20.0 / 100.0).abs() < EPS);
        assert!((s.h / t.h - 256.0 / 150.0).abs() < EPS);
    }

    #[test]
    fn right_quadrant_clips_on_its_left_edge() {
        let layout = SplitLayout::new(4, 1600.0, 900.0).unwrap();
        let vp = layout.viewport(2).unwrap();
        // 800 + (-40/2) = 780 .. 820
        let target = Rect::new(-40.0, 100.0, 80.0, 80.0);
        let source = Rect::new(0.0, 0.0, 64.0, 64.0);
        let (_, s, t, _) = blits(&compositor().compose(
            vp,
            &mut [rec(1, 3.0, target, source)],
            alive(0),
        ))[0];
        assert!((t.x - 800.0).abs() < EPS);
        assert!((t.w - 20.0).abs() < EPS);
        assert!((s.x - 32.0).abs() < EPS);
        assert!((s.w - 32.0).abs() < EPS);
    }

    #[test]
    fn tall_strip_is_trimmed_top_and_bottom() {
        let layout = SplitLayout::new(2, 1600.0, 900.0).unwrap();
        let vp = layout.viewport(2).unwrap();
        // wall twice the screen height, centred on the horizon
        let target = Rect::new(100.0, -450.0, 2.0, 1800.0);
        let source = Rect::new(0.0, 0.0, 2.0, 256.0);
        let (_, s, t, _) = blits(&compositor().compose(
            vp,
            &mut [rec(1, 0.6, target, source)],
            alive(0),
        ))[0];
        assert!((t.y - 450.0).abs() < EPS);
        assert!((t.h - 450.0).abs() < EPS);
        assert!((s.y - 64.0).abs() < 1e-3);
        assert!((s.h - 128.0).abs() < 1e-3);
    }

    #[test]
    fn mirrored_records_lose_the_opposite_source_end() {
        let region = Rect::new(0.0, 0.0, 100.0, 100.0);
        let target = Rect::new(80.0, 0.0, 40.0, 40.0);
        let source = Rect::new(0.0, 0.0, 40.0, 40.0);

        let (t, s) = clip_to_region(&region, ClipEdges::all(), target, source, false).unwrap();
        assert_eq!(t, Rect::new(80.0, 0.0, 20.0, 40.0));
        assert_eq!(s, Rect::new(0.0, 0.0, 20.0, 40.0));

        let (t, s) = clip_to_region(&region, ClipEdges::all(), target, source, true).unwrap();
        assert_eq!(t, Rect::new(80.0, 0.0, 20.0, 40.0));
        assert_eq!(s, Rect::new(20.0, 0.0, 20.0, 40.0));
    }

    #[test]
    fn records_outside_the_region_are_dropped() {
        let layout = SplitLayout::new(4, 1600.0, 900.0).unwrap();
        let vp = layout.viewport(1).unwrap();
        let r = Rect::new(1700.0, 100.0, 40.0, 40.0);
        let cmds = compositor().compose(vp, &mut [rec(1, 3.0, r, r)], alive(0));
        assert!(blits(&cmds).is_empty());

        assert!(
            clip_to_region(
                &Rect::new(0.0, 0.0, 10.0, 10.0),
                ClipEdges::empty(),
                Rect::new(f32::NAN, 0.0, 1.0, 1.0),
                Rect::new(0.0, 0.0, 1.0, 1.0),
                false
            )
            .is_none()
        );
    }

    #[test]
    fn unflagged_edges_are_left_alone() {
        let region = Rect::new(0.0, 0.0, 100.0, 100.0);
        let target = Rect::new(-10.0, -10.0, 40.0, 40.0);
        let source = Rect::new(0.0, 0.0, 4.0, 4.0);
        let (t, s) = clip_to_region(&region, ClipEdges::empty(), target, source, false).unwrap();
        assert_eq!((t, s), (target, source));
    }
}
