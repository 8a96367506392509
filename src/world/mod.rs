mod grid;
pub mod maps;
mod texture;
mod viewpoint;

pub use grid::{EMPTY, GridError, HARD_WALL, SOFT_WALL, SPAWN_TILES, TileCode, TileGrid};

pub use viewpoint::{Viewpoint, normalize_degrees};

pub use texture::{NO_TEXTURE, Texture, TextureBank, TextureError, TextureId};
