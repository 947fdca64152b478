use std::collections::HashSet;
use std::fmt;

use macroquad::prelude::*;
use tracing::warn;

use crate::config::GridSpec;
use crate::error::MapError;

/// Index into the tileset. Foreground cells use 0 for "no tile".
pub type TileIndex = u32;

/// Largest number of cells a layer may hold.
pub const MAX_CELLS: usize = 1 << 24;

/// One of the two tile layers of a [`TileGrid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Drawn under the actors
    Background,
    /// Drawn over the actors, 0 cells are skipped
    Foreground,
}

impl Layer {
    /// The other layer.
    pub fn toggled(self) -> Self {
        match self {
            Layer::Background => Layer::Foreground,
            Layer::Foreground => Layer::Background,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Background => write!(f, "background"),
            Layer::Foreground => write!(f, "foreground"),
        }
    }
}

/// Two equally sized tile layers plus the set of tiles that block movement.
///
/// Cells are stored row-major. Both layers always share `width x height`,
/// and neither dimension is ever zero.
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: usize,
    height: usize,
    background: Vec<TileIndex>,
    foreground: Vec<TileIndex>,
    solid: HashSet<TileIndex>,
    tile_count: TileIndex,
    cell: f32,
}

impl TileGrid {
    /// An all-zero grid.
    pub fn new(width: usize, height: usize, spec: &GridSpec) -> Result<Self, MapError> {
        let len = cell_count(width, height)?;
        Ok(Self::with_layers(width, height, vec![0; len], vec![0; len], spec))
    }

    /// Builds a grid from row-major rows, validating dimensions and indices.
    pub fn from_rows(
        width: usize,
        height: usize,
        background: &[Vec<TileIndex>],
        foreground: &[Vec<TileIndex>],
        spec: &GridSpec,
    ) -> Result<Self, MapError> {
        cell_count(width, height)?;
        let bg = flatten_layer(Layer::Background, width, height, background, spec.tile_count)?;
        let fg = flatten_layer(Layer::Foreground, width, height, foreground, spec.tile_count)?;
        Ok(Self::with_layers(width, height, bg, fg, spec))
    }

    fn with_layers(
        width: usize,
        height: usize,
        background: Vec<TileIndex>,
        foreground: Vec<TileIndex>,
        spec: &GridSpec,
    ) -> Self {
        let solid: HashSet<TileIndex> = spec.solid_tiles.iter().copied().collect();
        if solid.contains(&0) {
            warn!("tile 0 is marked solid; empty foreground cells will block movement");
        }
        Self {
            width,
            height,
            background,
            foreground,
            solid,
            tile_count: spec.tile_count,
            cell: spec.cell_size(),
        }
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Edge of one cell in world pixels.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell
    }

    /// Number of tiles in the tileset.
    pub fn tile_count(&self) -> TileIndex {
        self.tile_count
    }

    /// Map width in world pixels.
    pub fn width_in_pixels(&self) -> f32 {
        self.width as f32 * self.cell
    }

    /// Map height in world pixels.
    pub fn height_in_pixels(&self) -> f32 {
        self.height as f32 * self.cell
    }

    /// True if `index` blocks movement.
    #[inline]
    pub fn is_solid_tile(&self, index: TileIndex) -> bool {
        self.solid.contains(&index)
    }

    fn layer(&self, layer: Layer) -> &[TileIndex] {
        match layer {
            Layer::Background => &self.background,
            Layer::Foreground => &self.foreground,
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut Vec<TileIndex> {
        match layer {
            Layer::Background => &mut self.background,
            Layer::Foreground => &mut self.foreground,
        }
    }

    /// Tile at a cell, `None` outside the grid.
    #[inline]
    pub fn get(&self, layer: Layer, col: usize, row: usize) -> Option<TileIndex> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.layer(layer)[row * self.width + col])
    }

    /// Writes one cell and returns the index it replaced.
    pub fn set(
        &mut self,
        layer: Layer,
        col: usize,
        row: usize,
        index: TileIndex,
    ) -> Result<TileIndex, MapError> {
        if col >= self.width || row >= self.height {
            return Err(MapError::CellOutOfBounds {
                col,
                row,
                width: self.width,
                height: self.height,
            });
        }
        if index >= self.tile_count {
            return Err(MapError::InvalidTileIndex {
                layer,
                col,
                row,
                index,
                tile_count: self.tile_count,
            });
        }
        let w = self.width;
        let slot = &mut self.layer_mut(layer)[row * w + col];
        Ok(std::mem::replace(slot, index))
    }

    /// Rows of one layer, top to bottom.
    pub fn rows(&self, layer: Layer) -> impl Iterator<Item = &[TileIndex]> + '_ {
        self.layer(layer).chunks(self.width)
    }

    /// Swaps in new layers for a level change. Nothing changes on error.
    pub fn replace_layers(
        &mut self,
        width: usize,
        height: usize,
        background: &[Vec<TileIndex>],
        foreground: &[Vec<TileIndex>],
    ) -> Result<(), MapError> {
        cell_count(width, height)?;
        let bg = flatten_layer(Layer::Background, width, height, background, self.tile_count)?;
        let fg = flatten_layer(Layer::Foreground, width, height, foreground, self.tile_count)?;
        self.width = width;
        self.height = height;
        self.background = bg;
        self.foreground = fg;
        Ok(())
    }

    /// Resizes both layers, keeping the top-left overlap and filling new
    /// cells with 0.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), MapError> {
        let len = cell_count(width, height)?;
        let resize_layer = |old: &[TileIndex], old_w: usize, old_h: usize| {
            let mut out = vec![0; len];
            for row in 0..height.min(old_h) {
                for col in 0..width.min(old_w) {
                    out[row * width + col] = old[row * old_w + col];
                }
            }
            out
        };
        self.background = resize_layer(&self.background, self.width, self.height);
        self.foreground = resize_layer(&self.foreground, self.width, self.height);
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Cell containing a world-space coordinate. Negative coordinates map to
    /// negative cells.
    #[inline]
    pub fn cell_of(&self, v: f32) -> i64 {
        (v / self.cell).floor() as i64
    }

    /// True if any cell touched by the rectangle holds a solid tile in either
    /// layer.
    ///
    /// Every cell from the top-left corner's cell to the bottom-right
    /// corner's cell (inclusive) is checked. Cells outside the grid never
    /// block. The test runs against the destination rectangle only, so a
    /// fast enough actor can step over a one-cell wall.
    pub fn is_solid(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        let (cx0, cy0) = (self.cell_of(x), self.cell_of(y));
        let (cx1, cy1) = (self.cell_of(x + w), self.cell_of(y + h));

        let col_min = cx0.max(0);
        let row_min = cy0.max(0);
        let col_max = cx1.min(self.width as i64 - 1);
        let row_max = cy1.min(self.height as i64 - 1);

        for row in row_min..=row_max {
            for col in col_min..=col_max {
                let i = row as usize * self.width + col as usize;
                if self.solid.contains(&self.background[i])
                    || self.solid.contains(&self.foreground[i])
                {
                    return true;
                }
            }
        }
        false
    }

    /// [`TileGrid::is_solid`] for a rect.
    #[inline]
    pub fn is_solid_rect(&self, r: &Rect) -> bool {
        self.is_solid(r.x, r.y, r.w, r.h)
    }
}

/// Cells per layer for `width x height`, rejecting empty and oversized grids.
fn cell_count(width: usize, height: usize) -> Result<usize, MapError> {
    if width == 0 || height == 0 {
        return Err(MapError::EmptyGrid);
    }
    match width.checked_mul(height) {
        Some(n) if n <= MAX_CELLS => Ok(n),
        _ => Err(MapError::GridTooLarge {
            width,
            height,
            max: MAX_CELLS,
        }),
    }
}

fn flatten_layer(
    layer: Layer,
    width: usize,
    height: usize,
    rows: &[Vec<TileIndex>],
    tile_count: TileIndex,
) -> Result<Vec<TileIndex>, MapError> {
    if rows.len() != height {
        return Err(MapError::InvalidLayerSize {
            layer,
            what: "rows".to_owned(),
            expected: height,
            actual: rows.len(),
        });
    }
    if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(MapError::InvalidLayerSize {
            layer,
            what: format!("columns in row {row}"),
            expected: width,
            actual: cells.len(),
        });
    }
    let mut out = Vec::with_capacity(rows.iter().map(Vec::len).sum());
    for (row, cells) in rows.iter().enumerate() {
        for (col, &index) in cells.iter().enumerate() {
            if index >= tile_count {
                return Err(MapError::InvalidTileIndex {
                    layer,
                    col,
                    row,
                    index,
                    tile_count,
                });
            }
        }
        out.extend_from_slice(cells);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> GridSpec {
        GridSpec {
            tile_size: 16,
            scale_factor: 2,
            tile_count: 10,
            solid_tiles: vec![5, 6],
        }
    }

    fn grid_3x3() -> TileGrid {
        let bg = vec![vec![1, 1, 1], vec![1, 5, 1], vec![1, 1, 1]];
        let fg = vec![vec![0, 0, 6], vec![0, 0, 0], vec![0, 0, 0]];
        TileGrid::from_rows(3, 3, &bg, &fg, &spec()).expect("valid grid")
    }

    #[test]
    fn solid_in_either_layer_blocks() {
        let g = grid_3x3();
        assert!(g.is_solid(40.0, 40.0, 4.0, 4.0)); // background centre
        assert!(g.is_solid(70.0, 2.0, 4.0, 4.0)); // foreground corner
        assert!(!g.is_solid(2.0, 2.0, 20.0, 20.0));
    }

    #[test]
    fn query_spanning_cells_checks_every_cell() {
        let g = grid_3x3();
        // From cell (0,0) to (1,1): touches the solid centre.
        assert!(g.is_solid(10.0, 10.0, 30.0, 30.0));
    }

    #[test]
    fn right_edge_lands_on_cell_boundary() {
        let g = grid_3x3();
        // x + w == 32 is the first pixel of column 1, row 1 holds tile 5.
        assert!(g.is_solid(0.0, 40.0, 32.0, 1.0));
        assert!(!g.is_solid(0.0, 40.0, 31.9, 1.0));
    }

    #[test]
    fn out_of_bounds_portion_is_ignored() {
        let g = grid_3x3();
        assert!(!g.is_solid(-10.0, 2.0, 30.0, 4.0));
        assert!(g.is_solid(-10.0, 40.0, 45.0, 4.0));
        assert!(!g.is_solid(-500.0, -500.0, 10.0, 10.0));
        assert!(!g.is_solid(1000.0, 1000.0, 10.0, 10.0));
    }

    #[test]
    fn set_rejects_bad_cells_and_indices() {
        let mut g = grid_3x3();
        assert_eq!(g.set(Layer::Foreground, 0, 0, 3).expect("in range"), 0);
        assert_eq!(g.get(Layer::Foreground, 0, 0), Some(3));
        assert!(matches!(
            g.set(Layer::Background, 3, 0, 1),
            Err(MapError::CellOutOfBounds { col: 3, .. })
        ));
        assert!(matches!(
            g.set(Layer::Background, 0, 0, 10),
            Err(MapError::InvalidTileIndex { index: 10, .. })
        ));
    }

    #[test]
    fn resize_keeps_overlap() {
        let mut g = grid_3x3();
        g.resize(2, 4).expect("resize");
        assert_eq!(g.width(), 2);
        assert_eq!(g.get(Layer::Background, 1, 1), Some(5));
        assert_eq!(g.get(Layer::Background, 0, 3), Some(0));
        assert_eq!(g.get(Layer::Foreground, 2, 0), None);
        assert!(matches!(g.resize(0, 4), Err(MapError::EmptyGrid)));
    }

    #[test]
    fn mismatched_layers_fail_fast() {
        let bg = vec![vec![1, 1], vec![1, 1]];
        let fg = vec![vec![0, 0], vec![0]];
        let err = TileGrid::from_rows(2, 2, &bg, &fg, &spec()).unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidLayerSize {
                layer: Layer::Foreground,
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn declared_width_larger_than_rows_is_an_error() {
        let huge = 1usize << 62;
        let err = TileGrid::from_rows(huge, 1, &[vec![1]], &[vec![0]], &spec()).unwrap_err();
        assert!(matches!(err, MapError::GridTooLarge { .. }));

        let err = TileGrid::from_rows(1 << 20, 1, &[vec![1]], &[vec![0]], &spec()).unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidLayerSize {
                layer: Layer::Background,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn oversized_grids_are_rejected_without_allocating() {
        assert!(matches!(
            TileGrid::new(usize::MAX, 2, &spec()),
            Err(MapError::GridTooLarge { .. })
        ));
        let mut g = grid_3x3();
        assert!(matches!(
            g.resize(1_000_000, 1_000_000),
            Err(MapError::GridTooLarge {
                width: 1_000_000,
                ..
            })
        ));
        assert_eq!((g.width(), g.height()), (3, 3));
    }

    #[test]
    fn replace_layers_is_all_or_nothing() {
        let mut g = grid_3x3();
        let bad = vec![vec![1, 99]];
        assert!(g.replace_layers(2, 1, &bad, &[vec![0, 0]]).is_err());
        assert_eq!(g.width(), 3);
        g.replace_layers(2, 1, &[vec![5, 1]], &[vec![0, 0]]).expect("valid");
        assert_eq!(g.height(), 1);
        assert!(g.is_solid(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn solid_zero_is_kept_as_configured() {
        let mut s = spec();
        s.solid_tiles.push(0);
        let g = TileGrid::new(2, 2, &s).expect("grid");
        // Empty foreground cells now block; this is the configured behaviour.
        assert!(g.is_solid(1.0, 1.0, 1.0, 1.0));
    }
}
