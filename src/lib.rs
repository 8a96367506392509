//! Split-screen pseudo-3D renderer for tile worlds.
//!
//! Per viewport and per frame: [`engine::RayCaster`] walks the grid for
//! wall strips, [`engine::BillboardProjector`] places every visible entity,
//! and [`engine::Compositor`] depth-sorts, remaps and clips the lot into
//! that viewport's screen region. The result is a flat list of
//! [`renderer::DrawCommand`]s for any 2D back-end.

pub mod config;
pub mod engine;
pub mod renderer;
pub mod sim;
pub mod world;
