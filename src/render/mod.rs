//! Drawing adapter for macroquad. The core never calls into this; the demo
//! does, once per frame, after `World::tick`.

mod cull;

pub use cull::{follow_camera, visible_cells, CellRange};

use macroquad::prelude::*;

use crate::actor::Actor;
use crate::enemy::{Enemy, Facing};
use crate::grid::{Layer, TileGrid, TileIndex};
use crate::player::Player;
use crate::world::World;

/// A tileset image sliced into a regular grid.
pub struct TileSheet {
    /// The sheet image
    pub tex: Texture2D,
    /// Frames per sheet row
    pub cols: u32,
    /// Frame width in sheet pixels
    pub tile_w: f32,
    /// Frame height in sheet pixels
    pub tile_h: f32,
}

impl TileSheet {
    /// Slices `tex` into `tile_w x tile_h` frames, numbered row by row.
    pub fn new(tex: Texture2D, tile_w: f32, tile_h: f32) -> Self {
        tex.set_filter(FilterMode::Nearest);
        let cols = (tex.width() / tile_w.max(1.0)).max(1.0) as u32;
        Self {
            tex,
            cols,
            tile_w,
            tile_h,
        }
    }

    /// Source rectangle of frame `index`.
    pub fn source(&self, index: usize) -> Rect {
        frame_source(index, self.cols, self.tile_w, self.tile_h)
    }
}

fn frame_source(index: usize, cols: u32, tile_w: f32, tile_h: f32) -> Rect {
    let cols = cols.max(1) as usize;
    let col = (index % cols) as f32;
    let row = (index / cols) as f32;
    Rect::new(col * tile_w, row * tile_h, tile_w, tile_h)
}

/// Sheets for everything that gets drawn. Missing sheets fall back to
/// flat colours.
#[derive(Default)]
pub struct Sheets {
    /// Tileset for both layers
    pub tiles: Option<TileSheet>,
    /// Player walk cycles, one row per facing
    pub player: Option<TileSheet>,
    /// Enemy patrol cycle
    pub enemy: Option<TileSheet>,
    /// Enemy death sequence
    pub enemy_death: Option<TileSheet>,
}

fn fallback_colour(index: TileIndex, solid: bool) -> Color {
    if solid {
        Color::from_rgba(90, 70, 60, 255)
    } else {
        let shade = 120 + (index % 8) as u8 * 10;
        Color::from_rgba(60, shade, 80, 255)
    }
}

fn blit(
    sheet: Option<&TileSheet>,
    index: usize,
    pos: Vec2,
    size: f32,
    flip_x: bool,
    fallback: Color,
) {
    match sheet {
        Some(s) => draw_texture_ex(
            &s.tex,
            pos.x,
            pos.y,
            WHITE,
            DrawTextureParams {
                source: Some(s.source(index)),
                dest_size: Some(vec2(size, size)),
                flip_x,
                ..Default::default()
            },
        ),
        None => draw_rectangle(pos.x, pos.y, size, size, fallback),
    }
}

/// Draws one layer over `range`, shifted by `-camera`. Foreground cells
/// holding 0 are skipped.
pub fn draw_layer(
    grid: &TileGrid,
    layer: Layer,
    range: CellRange,
    camera: Vec2,
    sheet: Option<&TileSheet>,
) {
    let cell = grid.cell_size();
    for (col, row) in range.iter() {
        let Some(index) = grid.get(layer, col, row) else {
            continue;
        };
        if layer == Layer::Foreground && index == 0 {
            continue;
        }
        let pos = vec2(col as f32 * cell, row as f32 * cell) - camera;
        let fallback = fallback_colour(index, grid.is_solid_tile(index));
        blit(sheet, index as usize, pos, cell, false, fallback);
    }
}

/// Draws the player sprite and its collision box.
pub fn draw_player(player: &Player, cell: f32, camera: Vec2, sheet: Option<&TileSheet>) {
    let pos = player.position() - camera;
    let fallback = Color::from_rgba(240, 220, 120, 255);
    blit(sheet, player.frame(), pos, cell, false, fallback);
    let b = player.collision_box().offset(-camera);
    let colour = if player.facing().is_horizontal() {
        Color::from_rgba(255, 0, 0, 100)
    } else {
        Color::from_rgba(0, 0, 255, 100)
    };
    draw_rectangle(b.x, b.y, b.w, b.h, colour);
}

/// Draws a live or dying enemy; removed enemies are skipped.
pub fn draw_enemy(enemy: &Enemy, cell: f32, camera: Vec2, sheets: &Sheets) {
    if enemy.is_removed() {
        return;
    }
    let sheet = if enemy.is_dying() {
        sheets.enemy_death.as_ref()
    } else {
        sheets.enemy.as_ref()
    };
    let fallback = if enemy.is_dying() {
        Color::from_rgba(120, 120, 120, 255)
    } else {
        Color::from_rgba(200, 60, 60, 255)
    };
    let flip_x = enemy.facing() == Facing::Left;
    let pos = enemy.position() - camera;
    blit(sheet, enemy.frame(), pos, cell, flip_x, fallback);
    if enemy.is_patrolling() {
        let b = enemy.collision_box().offset(-camera);
        draw_rectangle(b.x, b.y, b.w, b.h, Color::from_rgba(255, 0, 0, 100));
    }
}

/// Background, actors, then foreground, seen through `camera`.
pub fn draw_world(world: &World, camera: Vec2, view: Vec2, sheets: &Sheets) {
    let grid = world.grid();
    let cell = grid.cell_size();
    let range = visible_cells(grid, camera, camera + view);

    draw_layer(grid, Layer::Background, range, camera, sheets.tiles.as_ref());
    draw_player(world.player(), cell, camera, sheets.player.as_ref());
    for enemy in world.enemies() {
        draw_enemy(enemy, cell, camera, sheets);
    }
    draw_layer(grid, Layer::Foreground, range, camera, sheets.tiles.as_ref());
}
