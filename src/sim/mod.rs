mod components;
mod scene;
mod tic;

pub use components::{
    Dynamite, Explosion, Facing, Player, PlayerSprites, Position, Sprite, SpriteKind,
    StickTextures, Visible,
};
pub use scene::Scene;
pub use tic::{DT, SIM_FPS, TicRunner};
