//! Immutable render configuration.
//!
//! Built once and handed to the pipeline at construction; nothing reads
//! global settings. [`Screen`] holds the values derived from it, so
//! per-frame code never recomputes a `tan`.

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{renderer::Rgba, sim::SpriteKind};

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] io::Error),

    #[error("config is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/*──────────────────────────── Sprite styles ─────────────────────────*/

/// How one kind of billboard is sized and placed on screen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteStyle {
    /// Size of the billboard in tiles at depth 1.
    pub scale: f32,
    /// Scale the width by the source frame's aspect ratio instead of
    /// drawing a square.
    pub keep_frame_aspect: bool,
    /// Fixed downward shift in full-screen pixels.
    pub offset_px: f32,
    /// Downward shift as a fraction of the projected height.
    pub offset_fraction: f32,
}

impl Default for SpriteStyle {
    fn default() -> Self {
        Self {
            scale: 0.5,
            keep_frame_aspect: false,
            offset_px: 0.0,
            offset_fraction: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteStyles {
    pub player: SpriteStyle,
    pub dynamite: SpriteStyle,
    pub explosion: SpriteStyle,
    pub pickup: SpriteStyle,
    pub grave: SpriteStyle,
}

impl Default for SpriteStyles {
    fn default() -> Self {
        Self {
            player: SpriteStyle {
                scale: 0.8,
                offset_px: 25.0,
                ..SpriteStyle::default()
            },
            dynamite: SpriteStyle {
                scale: 0.8,
                keep_frame_aspect: true,
                offset_fraction: 0.3,
                ..SpriteStyle::default()
            },
            explosion: SpriteStyle {
                scale: 1.2,
                ..SpriteStyle::default()
            },
            pickup: SpriteStyle {
                scale: 0.4,
                ..SpriteStyle::default()
            },
            grave: SpriteStyle {
                scale: 0.6,
                offset_fraction: 0.15,
                ..SpriteStyle::default()
            },
        }
    }
}

impl SpriteStyles {
    pub fn style(&self, kind: SpriteKind) -> &SpriteStyle {
        match kind {
            SpriteKind::Player => &self.player,
            SpriteKind::Dynamite => &self.dynamite,
            SpriteKind::Explosion => &self.explosion,
            SpriteKind::Pickup => &self.pickup,
            SpriteKind::Grave => &self.grave,
        }
    }
}

/*──────────────────────────── RenderConfig ──────────────────────────*/

/// User-facing settings. Every field has a default, so an empty TOML
/// document is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub fov_degrees: f32,
    /// 0 means "half the screen width" (two-pixel columns).
    pub ray_count: u32,
    /// Distance in tiles a ray travels before it gives up.
    pub max_ray_steps: u32,
    /// World units per tile.
    pub tile_size: f32,
    /// Minimum billboard depth in tiles; anything at or closer is culled.
    pub near_plane: f32,
    /// Edge length of the square wall textures, in texels.
    pub wall_texture_size: u32,
    pub score_margin: f32,
    pub split_line_thickness: f32,
    pub sky_color: Rgba,
    pub floor_color: Rgba,
    pub split_line_color: Rgba,
    pub text_color: Rgba,
    pub sprites: SpriteStyles,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            screen_width: 1600,
            screen_height: 900,
            fov_degrees: 90.0,
            ray_count: 0,
            max_ray_steps: 30,
            tile_size: 50.0,
            near_plane: 0.5,
            wall_texture_size: 256,
            score_margin: 10.0,
            split_line_thickness: 2.0,
            sky_color: 0xFF_87CEEB,
            floor_color: 0xFF_362317,
            split_line_color: 0xFF_808080,
            text_color: 0xFF_FFFFFF,
            sprites: SpriteStyles::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let cfg: RenderConfig = toml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Ray count with the "0 = half width" default resolved.
    pub fn effective_ray_count(&self) -> u32 {
        if self.ray_count == 0 {
            (self.screen_width / 2).max(1)
        } else {
            self.ray_count
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError::invalid("screen", "width and height must be > 0"));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::invalid(
                "fov_degrees",
                format!("{} is outside (0, 180)", self.fov_degrees),
            ));
        }
        if self.effective_ray_count() > self.screen_width {
            return Err(ConfigError::invalid(
                "ray_count",
                "more rays than screen columns",
            ));
        }
        if self.max_ray_steps == 0 {
            return Err(ConfigError::invalid("max_ray_steps", "must be > 0"));
        }
        if !(self.tile_size > 0.0) {
            return Err(ConfigError::invalid("tile_size", "must be > 0"));
        }
        if !(self.near_plane > 0.0) {
            return Err(ConfigError::invalid("near_plane", "must be > 0"));
        }
        if self.wall_texture_size == 0 {
            return Err(ConfigError::invalid("wall_texture_size", "must be > 0"));
        }
        Ok(())
    }

    pub fn screen(&self) -> Screen {
        Screen::from_config(self)
    }
}

/*──────────────────────────── Screen ────────────────────────────────*/

/// Projection constants derived from a [`RenderConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub w: f32,
    pub h: f32,
    pub half_w: f32,
    pub half_h: f32,
    pub ray_count: usize,
    pub half_ray_count: usize,
    /// Screen pixels covered by one ray column; may be fractional so the
    /// columns always span the full width.
    pub column_w: f32,
    pub half_fov: f32,
    /// Angle between neighbouring rays, radians.
    pub ray_step: f32,
    /// Distance from the eye to the projection plane, pixels.
    pub screen_distance: f32,
}

impl Screen {
    pub fn from_config(cfg: &RenderConfig) -> Self {
        let w = cfg.screen_width as f32;
        let h = cfg.screen_height as f32;
        let ray_count = cfg.effective_ray_count() as usize;
        let fov = cfg.fov_degrees.to_radians();
        let half_fov = fov * 0.5;
        Self {
            w,
            h,
            half_w: w * 0.5,
            half_h: h * 0.5,
            ray_count,
            half_ray_count: ray_count / 2,
            column_w: w / ray_count as f32,
            half_fov,
            ray_step: fov / ray_count as f32,
            screen_distance: w * 0.5 / half_fov.tan(),
        }
    }
}
