#![warn(missing_docs)]

//! Collision, movement and actor state core for a top-down tile game, plus
//! the level format and an editor model that feed it.
//!
//! One [`World::tick`] per rendered frame: the player moves against the
//! [`TileGrid`] and the patrolling enemies, each enemy updates and is checked
//! against the player, finished death sequences are dropped, and the
//! session's win flag is refreshed.

mod actor;
mod config;
mod editor;
mod enemy;
mod error;
mod geom;
mod grid;
mod loader {
    pub mod json_loader;
}
mod movement;
mod player;
pub mod render;
mod world;

pub use actor::{Actor, AnimationCursor, CollisionProfile, Direction, FrameRow, Inset};
pub use config::{EditorConfig, EnemyConfig, GameConfig, GridSpec, PlayerConfig, ScreenConfig};
pub use editor::{palette_slot, Brush, Editor};
pub use enemy::{Enemy, EnemySpawn, EnemyState, Facing};
pub use error::MapError;
pub use geom::overlaps;
pub use grid::{Layer, TileGrid, TileIndex, MAX_CELLS};
pub use loader::json_loader::{
    decode_level_str, encode_level, load_level_file, save_level_file, LevelData,
};
pub use movement::{patrol_step, resolve, Blocker, Contact, Obstacle, Resolution};
pub use player::{Intent, Player};
pub use world::{Mode, Session, TickReport, World};
