//! The per-frame pipeline: ray caster and billboard projector feed the
//! compositor, [`FrameRenderer`] drives them for every viewport.

mod billboard;
mod compositor;
mod frame;
mod layout;
pub mod overview;
mod raycast;
mod types;

pub use billboard::{
    Billboard, BillboardProjector, DirectionalTextures, Look, normalize_angle_delta,
};
pub use compositor::{Compositor, OwnerStatus, clip_to_region, sort_far_to_near};
pub use frame::{FrameRenderer, ViewMode, WallTextures};
pub use layout::{ClipEdges, LayoutError, MAX_PLAYERS, SplitLayout, Viewport};
pub use raycast::{RayCaster, RayHit};
pub use types::{Rect, Renderable, RenderableKind};
