use std::path::Path;

use macroquad::prelude::*;
use tracing::debug;

use crate::config::EditorConfig;
use crate::enemy::EnemySpawn;
use crate::error::MapError;
use crate::grid::{Layer, TileGrid, TileIndex};
use crate::loader::json_loader::save_level_file;

const PALETTE_PER_ROW: usize = 4;
const PALETTE_TILE: f32 = 40.0;
const PALETTE_GAP: f32 = 10.0;
const PALETTE_TOP: f32 = 130.0;

/// Mouse buttons the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brush {
    /// Place the selected tile
    Paint,
    /// Reset the cell to 0
    Erase,
}

/// Editor state with no drawing attached: selected tile, active layer and
/// camera. The grid is only borrowed per call.
#[derive(Debug, Clone)]
pub struct Editor {
    cfg: EditorConfig,
    screen: Vec2,
    /// Tile placed by [`Brush::Paint`]
    pub selected: TileIndex,
    /// Layer that clicks edit
    pub layer: Layer,
    /// Top-left of the map view in world pixels
    pub camera: Vec2,
}

impl Editor {
    /// Editor for a window of `screen` pixels, with tile 0 on the background layer selected.
    pub fn new(cfg: EditorConfig, screen: Vec2) -> Self {
        Self {
            cfg,
            screen,
            selected: 0,
            layer: Layer::Background,
            camera: Vec2::ZERO,
        }
    }

    /// Width of the map area left of the palette panel.
    pub fn map_view_width(&self) -> f32 {
        (self.screen.x - self.cfg.panel_width).max(0.0)
    }

    /// Switches between background and foreground editing.
    pub fn toggle_layer(&mut self) {
        self.layer = self.layer.toggled();
        debug!(layer = %self.layer, "editing layer");
    }

    /// Selects a tile if the tileset has it.
    pub fn select(&mut self, index: TileIndex, grid: &TileGrid) -> bool {
        if index >= grid.tile_count() {
            return false;
        }
        self.selected = index;
        true
    }

    /// Moves the camera by `steps` scroll steps per axis and clamps it to the map.
    pub fn scroll(&mut self, steps: Vec2, grid: &TileGrid) {
        self.camera += steps * self.cfg.scroll_speed;
        self.clamp_camera(grid);
    }

    /// Keeps the view inside the map.
    pub fn clamp_camera(&mut self, grid: &TileGrid) {
        let max_x = (grid.width_in_pixels() - self.map_view_width()).max(0.0);
        let max_y = (grid.height_in_pixels() - self.screen.y).max(0.0);
        self.camera = vec2(self.camera.x.clamp(0.0, max_x), self.camera.y.clamp(0.0, max_y));
    }

    /// Returns to the top-left, e.g. after a new level is loaded.
    pub fn reset_camera(&mut self) {
        self.camera = Vec2::ZERO;
    }

    /// Grid cell under a screen position, `None` over the panel or off the map.
    pub fn cell_at(&self, screen: Vec2, grid: &TileGrid) -> Option<(usize, usize)> {
        if screen.x >= self.map_view_width() {
            return None;
        }
        let world = screen + self.camera;
        let (col, row) = (grid.cell_of(world.x), grid.cell_of(world.y));
        if col < 0 || row < 0 || col >= grid.width() as i64 || row >= grid.height() as i64 {
            return None;
        }
        Some((col as usize, row as usize))
    }

    /// Palette tile under a screen position.
    pub fn palette_tile_at(&self, screen: Vec2, grid: &TileGrid) -> Option<TileIndex> {
        let left = self.screen.x - self.cfg.panel_width + PALETTE_GAP;
        (0..grid.tile_count()).find(|&i| {
            let r = palette_slot(left, i as usize);
            r.contains(screen)
        })
    }

    /// Handles a click: paints or erases on the map, picks a tile on the
    /// panel. Returns true if the grid or the selection changed.
    pub fn click(
        &mut self,
        screen: Vec2,
        brush: Brush,
        grid: &mut TileGrid,
    ) -> Result<bool, MapError> {
        if screen.x >= self.map_view_width() {
            return Ok(match self.palette_tile_at(screen, grid) {
                Some(i) => self.select(i, grid),
                None => false,
            });
        }
        let Some((col, row)) = self.cell_at(screen, grid) else {
            return Ok(false);
        };
        let index = match brush {
            Brush::Paint => self.selected,
            Brush::Erase => 0,
        };
        let old = grid.set(self.layer, col, row, index)?;
        Ok(old != index)
    }

    /// Writes the grid and `enemies` as a level file.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        grid: &TileGrid,
        enemies: &[EnemySpawn],
    ) -> Result<(), MapError> {
        save_level_file(path, grid, enemies)
    }
}

/// Screen rect of palette slot `i` for a panel whose first column starts at `left`.
pub fn palette_slot(left: f32, i: usize) -> Rect {
    let col = (i % PALETTE_PER_ROW) as f32;
    let row = (i / PALETTE_PER_ROW) as f32;
    Rect::new(
        left + col * (PALETTE_TILE + PALETTE_GAP),
        PALETTE_TOP + row * (PALETTE_TILE + PALETTE_GAP),
        PALETTE_TILE,
        PALETTE_TILE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSpec;

    fn setup() -> (Editor, TileGrid) {
        // 128 px cells, 10x10 map: 1280 px square.
        let grid = TileGrid::new(10, 10, &GridSpec::default()).expect("grid");
        let editor = Editor::new(EditorConfig::default(), vec2(1000.0, 800.0));
        (editor, grid)
    }

    #[test]
    fn camera_clamps_to_map_minus_view() {
        let (mut ed, grid) = setup();
        ed.scroll(vec2(-3.0, -3.0), &grid);
        assert_eq!(ed.camera, Vec2::ZERO);
        ed.scroll(vec2(100.0, 100.0), &grid);
        assert_eq!(ed.camera, vec2(1280.0 - 800.0, 1280.0 - 800.0));
    }

    #[test]
    fn paint_and_erase_on_active_layer() {
        let (mut ed, mut grid) = setup();
        assert!(ed.select(7, &grid));
        assert!(ed.click(vec2(130.0, 5.0), Brush::Paint, &mut grid).expect("paint"));
        assert_eq!(grid.get(Layer::Background, 1, 0), Some(7));

        ed.toggle_layer();
        ed.click(vec2(130.0, 5.0), Brush::Paint, &mut grid).expect("paint");
        assert_eq!(grid.get(Layer::Foreground, 1, 0), Some(7));

        assert!(ed.click(vec2(130.0, 5.0), Brush::Erase, &mut grid).expect("erase"));
        assert_eq!(grid.get(Layer::Foreground, 1, 0), Some(0));
        assert_eq!(grid.get(Layer::Background, 1, 0), Some(7));
    }

    #[test]
    fn camera_offsets_the_painted_cell() {
        let (mut ed, mut grid) = setup();
        ed.select(3, &grid);
        ed.scroll(vec2(13.0, 0.0), &grid); // 260 px
        ed.click(vec2(10.0, 10.0), Brush::Paint, &mut grid).expect("paint");
        assert_eq!(grid.get(Layer::Background, 2, 0), Some(3));
    }

    #[test]
    fn panel_click_selects_palette_tile() {
        let (mut ed, mut grid) = setup();
        // Panel starts at x = 800; slot 5 is column 1, row 1.
        let slot = palette_slot(810.0, 5);
        assert!(ed
            .click(slot.point() + vec2(2.0, 2.0), Brush::Paint, &mut grid)
            .expect("select"));
        assert_eq!(ed.selected, 5);
        assert!(!ed.click(vec2(805.0, 10.0), Brush::Paint, &mut grid).expect("miss"));
        assert_eq!(ed.selected, 5);
    }

    #[test]
    fn cannot_select_past_tileset() {
        let (mut ed, grid) = setup();
        assert!(!ed.select(40, &grid));
        assert_eq!(ed.selected, 0);
    }
}
