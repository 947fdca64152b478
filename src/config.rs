use std::path::Path;

use anyhow::Context;
use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

use crate::actor::{CollisionProfile, Inset};
use crate::grid::TileIndex;

/// Tuning values for a play session. Every field has a default, so a config
/// file only needs the keys it wants to override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tile geometry and collision set
    pub grid: GridSpec,
    /// Player tuning
    pub player: PlayerConfig,
    /// Enemy tuning
    pub enemy: EnemyConfig,
    /// Window size
    pub screen: ScreenConfig,
    /// Editor tuning
    pub editor: EditorConfig,
}

impl GameConfig {
    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("Reading config file {}", path.display()))?;
        let cfg: GameConfig = serde_json::from_str(&txt)
            .with_context(|| format!("Parsing config file {}", path.display()))?;
        if cfg.grid.scale_factor == 0 || cfg.grid.tile_size == 0 {
            anyhow::bail!("Config {}: tile_size and scale_factor must be non-zero", path.display());
        }
        Ok(cfg)
    }
}

/// Geometry shared by the grid and every actor sprite. The tile size comes
/// from slicing the sprite sheet, not from the level file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Source tile edge in pixels
    pub tile_size: u32,
    /// Integer upscale applied when drawing
    pub scale_factor: u32,
    /// Number of tiles in the tileset; valid indices are `0..tile_count`
    pub tile_count: TileIndex,
    /// Tile indices that block movement in either layer
    pub solid_tiles: Vec<TileIndex>,
}

impl GridSpec {
    /// Edge of one on-screen cell, `tile_size * scale_factor`.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        (self.tile_size * self.scale_factor) as f32
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            tile_size: 32,
            scale_factor: 4,
            tile_count: 40,
            solid_tiles: (2..=22).chain(24..=38).collect(),
        }
    }
}

/// Start position, speed, animation and collision boxes of the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Spawn x in world pixels
    pub start_x: f32,
    /// Spawn y in world pixels
    pub start_y: f32,
    /// Pixels moved per tick along each held axis
    pub speed: f32,
    /// Ticks between frame advances
    pub animation_speed: u32,
    /// Frames in each facing's walk cycle
    pub frames_per_row: usize,
    /// Inset (x, y) of the box used when facing up or down
    pub front_back_inset: (f32, f32),
    /// Inset (x, y) of the box used when facing left or right
    pub side_inset: (f32, f32),
}

impl PlayerConfig {
    /// Spawn position.
    pub fn start(&self) -> Vec2 {
        vec2(self.start_x, self.start_y)
    }

    /// Collision boxes for a `cell`-sized sprite.
    pub fn profile(&self, cell: f32) -> CollisionProfile {
        CollisionProfile {
            side: Inset::symmetric(cell, self.side_inset.0, self.side_inset.1),
            front_back: Inset::symmetric(cell, self.front_back_inset.0, self.front_back_inset.1),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_x: 200.0,
            start_y: 200.0,
            speed: 11.0,
            animation_speed: 2,
            frames_per_row: 4,
            front_back_inset: (50.0, 50.0),
            side_inset: (30.0, 50.0),
        }
    }
}

/// Animation and collision settings shared by every enemy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Ticks between patrol frame advances
    pub animation_speed: u32,
    /// Frames in the patrol cycle
    pub patrol_frames: usize,
    /// Frames in the death sequence
    pub death_frames: usize,
    /// Inset (x, y) of the side box
    pub side_inset: (f32, f32),
}

impl EnemyConfig {
    /// Side box for a `cell`-sized sprite.
    pub fn profile(&self, cell: f32) -> Inset {
        Inset::symmetric(cell, self.side_inset.0, self.side_inset.1)
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            animation_speed: 10,
            patrol_frames: 6,
            death_frames: 6,
            side_inset: (50.0, 60.0),
        }
    }
}

/// Window size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
}

impl ScreenConfig {
    /// Width and height as a vector.
    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 800.0,
        }
    }
}

/// Editor layout and scrolling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Width of the tile palette on the right edge of the window
    pub panel_width: f32,
    /// Camera pixels per scroll step
    pub scroll_speed: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            panel_width: 200.0,
            scroll_speed: 20.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: GameConfig =
            serde_json::from_str(r#"{ "player": { "speed": 4.5 }, "grid": { "scale_factor": 2 } }"#)
                .expect("decode");
        assert_eq!(cfg.player.speed, 4.5);
        assert_eq!(cfg.player.animation_speed, 2);
        assert_eq!(cfg.grid.cell_size(), 64.0);
        assert_eq!(cfg.enemy.death_frames, 6);
    }

    #[test]
    fn default_solid_set_skips_empty_and_floor_tiles() {
        let spec = GridSpec::default();
        assert!(!spec.solid_tiles.contains(&0));
        assert!(!spec.solid_tiles.contains(&1));
        assert!(!spec.solid_tiles.contains(&23));
        assert!(spec.solid_tiles.contains(&38));
    }
}
