// src/loader/json_loader.rs
use crate::config::GridSpec;
use crate::enemy::EnemySpawn;
use crate::error::MapError;
use crate::grid::{Layer, TileGrid, TileIndex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Deserialize, Serialize)]
struct JsonLevel {
    width: usize,
    height: usize,
    tiles: Vec<Vec<TileIndex>>,
    foreground: Vec<Vec<TileIndex>>,
    #[serde(default)]
    enemies: Vec<JsonEnemy>,
}

#[derive(Deserialize, Serialize)]
struct JsonEnemy {
    x: f32,
    y: f32,
    speed: f32,
    #[serde(rename = "minX")]
    min_x: i32,
    #[serde(rename = "maxX")]
    max_x: i32,
}

/// A validated level: the grid plus where its enemies start.
#[derive(Debug, Clone)]
pub struct LevelData {
    /// Both tile layers
    pub grid: TileGrid,
    /// Enemy spawns in file order
    pub enemies: Vec<EnemySpawn>,
}

fn level_from_json(j: JsonLevel, spec: &GridSpec) -> Result<LevelData, MapError> {
    let enemies = j
        .enemies
        .iter()
        .enumerate()
        .map(|(i, e)| {
            if e.min_x > e.max_x {
                return Err(MapError::InvalidPatrolBounds {
                    enemy: i,
                    min_x: e.min_x,
                    max_x: e.max_x,
                });
            }
            Ok(EnemySpawn {
                x: e.x,
                y: e.y,
                speed: e.speed,
                min_x: e.min_x,
                max_x: e.max_x,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let grid = TileGrid::from_rows(j.width, j.height, &j.tiles, &j.foreground, spec)?;
    Ok(LevelData { grid, enemies })
}

/// Decodes and validates a level from a JSON string.
pub fn decode_level_str(json: &str, spec: &GridSpec) -> Result<LevelData, MapError> {
    let j: JsonLevel = serde_json::from_str(json)?;
    level_from_json(j, spec)
}

/// Reads a `.json` level file.
pub fn load_level_file(path: impl AsRef<Path>, spec: &GridSpec) -> Result<LevelData, MapError> {
    let p = path.as_ref();
    if p.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::UnsupportedFormat(p.display().to_string()));
    }

    let txt = std::fs::read_to_string(p).map_err(|source| MapError::Io {
        path: p.to_path_buf(),
        source,
    })?;
    let j: JsonLevel = serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: p.to_path_buf(),
        source,
    })?;

    let level = level_from_json(j, spec)?;
    info!(
        path = %p.display(),
        width = level.grid.width(),
        height = level.grid.height(),
        enemies = level.enemies.len(),
        "level loaded"
    );
    Ok(level)
}

/// Encodes the grid layers and enemy spawns as a level document.
pub fn encode_level(grid: &TileGrid, enemies: &[EnemySpawn]) -> Result<String, MapError> {
    let j = JsonLevel {
        width: grid.width(),
        height: grid.height(),
        tiles: grid.rows(Layer::Background).map(<[_]>::to_vec).collect(),
        foreground: grid.rows(Layer::Foreground).map(<[_]>::to_vec).collect(),
        enemies: enemies
            .iter()
            .map(|e| JsonEnemy {
                x: e.x,
                y: e.y,
                speed: e.speed,
                min_x: e.min_x,
                max_x: e.max_x,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&j)?)
}

/// Writes a level document to a `.json` path.
pub fn save_level_file(
    path: impl AsRef<Path>,
    grid: &TileGrid,
    enemies: &[EnemySpawn],
) -> Result<(), MapError> {
    let p = path.as_ref();
    if p.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::UnsupportedFormat(p.display().to_string()));
    }
    let txt = encode_level(grid, enemies)?;
    std::fs::write(p, txt).map_err(|source| MapError::Io {
        path: p.to_path_buf(),
        source,
    })?;
    info!(path = %p.display(), "level saved");
    Ok(())
}
