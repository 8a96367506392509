//! Split-screen geometry.
//!
//! A [`SplitLayout`] is a pure function of the player count: one
//! [`Viewport`] per player, each a sub-rectangle of the screen plus the
//! divisors that shrink full-screen coordinates into it and the edges the
//! compositor must clip against.

use bitflags::bitflags;
use smallvec::SmallVec;
use thiserror::Error;

use super::types::Rect;

pub const MAX_PLAYERS: u8 = 4;

bitflags! {
    /// Region edges that scaled draw records may cross and must be clipped
    /// against. Edges that coincide with the screen border are left to the
    /// back-end.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ClipEdges: u8 {
        const TOP    = 0b0001;
        const BOTTOM = 0b0010;
        const LEFT   = 0b0100;
        const RIGHT  = 0b1000;
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    #[error("split layout supports 1 to 4 players, got {0}")]
    PlayerCount(u8),

    #[error("viewport {index} does not exist in a {players}-player layout")]
    NoSuchViewport { index: u8, players: u8 },
}

/// Where one viewpoint's picture lands on the shared screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// 1-based, equals the owning player's slot.
    pub index: u8,
    /// Screen pixels.
    pub region: Rect,
    /// Full-screen coordinates are divided by these before the region
    /// origin is added.
    pub divisors: (f32, f32),
    pub clip: ClipEdges,
}

impl Viewport {
    /// Full-screen rectangle → this viewport's screen rectangle (unclipped).
    #[inline]
    pub fn remap(&self, r: &Rect) -> Rect {
        let (dx, dy) = self.divisors;
        Rect::new(
            self.region.x + r.x / dx,
            self.region.y + r.y / dy,
            r.w / dx,
            r.h / dy,
        )
    }

    /// Top-left corner in screen pixels.
    #[inline]
    pub fn origin(&self) -> (f32, f32) {
        (self.region.x, self.region.y)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SplitLayout {
    players: u8,
    screen_w: f32,
    screen_h: f32,
    viewports: SmallVec<[Viewport; 4]>,
}

impl SplitLayout {
    pub fn new(players: u8, screen_w: f32, screen_h: f32) -> Result<Self, LayoutError> {
        let (w, h) = (screen_w, screen_h);
        let (hw, hh) = (w * 0.5, h * 0.5);

        let viewports: SmallVec<[Viewport; 4]> = match players {
            1 => smallvec::smallvec![Viewport {
                index: 1,
                region: Rect::new(0.0, 0.0, w, h),
                divisors: (1.0, 1.0),
                clip: ClipEdges::empty(),
            }],
            2 => (0..2u8)
                .map(|i| Viewport {
                    index: i + 1,
                    region: Rect::new(0.0, f32::from(i) * hh, w, hh),
                    divisors: (1.0, 2.0),
                    clip: ClipEdges::TOP | ClipEdges::BOTTOM,
                })
                .collect(),
            3 | 4 => (0..players)
                .map(|i| Viewport {
                    index: i + 1,
                    region: Rect::new(f32::from(i % 2) * hw, f32::from(i / 2) * hh, hw, hh),
                    divisors: (2.0, 2.0),
                    clip: ClipEdges::all(),
                })
                .collect(),
            n => return Err(LayoutError::PlayerCount(n)),
        };

        Ok(Self {
            players,
            screen_w,
            screen_h,
            viewports,
        })
    }

    #[inline]
    pub fn players(&self) -> u8 {
        self.players
    }

    #[inline]
    pub fn viewports(&self) -> &[Viewport] {
        &self.viewports
    }

    pub fn viewport(&self, index: u8) -> Result<&Viewport, LayoutError> {
        self.viewports
            .iter()
            .find(|v| v.index == index)
            .ok_or(LayoutError::NoSuchViewport {
                index,
                players: self.players,
            })
    }

    /// The bottom-right quadrant nobody owns in three-player mode.
    pub fn blank_region(&self) -> Option<Rect> {
        (self.players == 3).then(|| {
            let (hw, hh) = (self.screen_w * 0.5, self.screen_h * 0.5);
            Rect::new(hw, hh, hw, hh)
        })
    }

    /// Divider bars, centred on the region seams: horizontal from two
    /// players up, vertical from three.
    pub fn split_lines(&self, thickness: f32) -> SmallVec<[Rect; 2]> {
        let mut lines = SmallVec::new();
        let half_t = thickness * 0.5;
        if self.players >= 2 {
            lines.push(Rect::new(
                0.0,
                self.screen_h * 0.5 - half_t,
                self.screen_w,
                thickness,
            ));
        }
        if self.players >= 3 {
            lines.push(Rect::new(
                self.screen_w * 0.5 - half_t,
                0.0,
                thickness,
                self.screen_h,
            ));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_count_is_checked() {
        assert_eq!(
            SplitLayout::new(0, 1600.0, 900.0).unwrap_err(),
            LayoutError::PlayerCount(0)
        );
        assert!(SplitLayout::new(5, 1600.0, 900.0).is_err());
    }

    #[test]
    fn single_covers_the_screen() {
        let l = SplitLayout::new(1, 1600.0, 900.0).unwrap();
        let v = l.viewport(1).unwrap();
        assert_eq!(v.region, Rect::new(0.0, 0.0, 1600.0, 900.0));
        assert!(v.clip.is_empty());
        assert!(l.split_lines(2.0).is_empty());
        assert_eq!(
            l.viewport(2).unwrap_err(),
            LayoutError::NoSuchViewport {
                index: 2,
                players: 1
            }
        );
    }

    #[test]
    fn two_players_stack_vertically() {
        let l = SplitLayout::new(2, 1600.0, 900.0).unwrap();
        let bottom = l.viewport(2).unwrap();
        assert_eq!(bottom.region, Rect::new(0.0, 450.0, 1600.0, 450.0));
        let r = bottom.remap(&Rect::new(100.0, 200.0, 40.0, 80.0));
        assert_eq!(r, Rect::new(100.0, 550.0, 40.0, 40.0));
        assert_eq!(l.split_lines(2.0).len(), 1);
    }

    #[test]
    fn quadrants_in_reading_order() {
        let l = SplitLayout::new(4, 1600.0, 900.0).unwrap();
        let origins: Vec<_> = l.viewports().iter().map(Viewport::origin).collect();
        assert_eq!(
            origins,
            [(0.0, 0.0), (800.0, 0.0), (0.0, 450.0), (800.0, 450.0)]
        );
        assert!(l.viewports().iter().all(|v| v.clip == ClipEdges::all()));
        assert!(l.blank_region().is_none());
    }

    #[test]
    fn three_players_leave_a_blank_quadrant() {
        let l = SplitLayout::new(3, 1600.0, 900.0).unwrap();
        assert_eq!(l.viewports().len(), 3);
        assert_eq!(l.blank_region(), Some(Rect::new(800.0, 450.0, 800.0, 450.0)));
        let lines = l.split_lines(4.0);
        assert_eq!(lines[0], Rect::new(0.0, 448.0, 1600.0, 4.0));
        assert_eq!(lines[1], Rect::new(798.0, 0.0, 4.0, 900.0));
    }
}
