use crate::grid::TileGrid;
use macroquad::prelude::*;

const CULL_MARGIN_CELLS: i64 = 1;

/// Inclusive range of grid cells to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    /// First visible column
    pub col_min: usize,
    /// First visible row
    pub row_min: usize,
    /// Last visible column, inclusive
    pub col_max: usize,
    /// Last visible row, inclusive
    pub row_max: usize,
}

impl CellRange {
    /// Every `(col, row)` in the range, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> {
        let (c0, c1) = (self.col_min, self.col_max);
        (self.row_min..=self.row_max).flat_map(move |row| (c0..=c1).map(move |col| (col, row)))
    }
}

/// Cells covered by the world-space view, padded by one cell and clamped to
/// the grid.
pub fn visible_cells(grid: &TileGrid, view_min: Vec2, view_max: Vec2) -> CellRange {
    let mut cx_min = grid.cell_of(view_min.x);
    let mut cy_min = grid.cell_of(view_min.y);
    let mut cx_max = grid.cell_of(view_max.x);
    let mut cy_max = grid.cell_of(view_max.y);

    if cx_min > cx_max {
        std::mem::swap(&mut cx_min, &mut cx_max);
    }
    if cy_min > cy_max {
        std::mem::swap(&mut cy_min, &mut cy_max);
    }

    let last_col = grid.width() as i64 - 1;
    let last_row = grid.height() as i64 - 1;
    CellRange {
        col_min: (cx_min - CULL_MARGIN_CELLS).clamp(0, last_col) as usize,
        row_min: (cy_min - CULL_MARGIN_CELLS).clamp(0, last_row) as usize,
        col_max: (cx_max + CULL_MARGIN_CELLS).clamp(0, last_col) as usize,
        row_max: (cy_max + CULL_MARGIN_CELLS).clamp(0, last_row) as usize,
    }
}

/// Camera top-left that centres `target` without showing anything past the
/// map edges. Maps smaller than the view pin the camera at the origin.
pub fn follow_camera(target: Vec2, view: Vec2, map: Vec2) -> Vec2 {
    let max = (map - view).max(Vec2::ZERO);
    (target - view / 2.0).clamp(Vec2::ZERO, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSpec;

    fn grid() -> TileGrid {
        // 128 px cells
        TileGrid::new(20, 10, &GridSpec::default()).expect("grid")
    }

    #[test]
    fn visible_cells_pads_and_clamps() {
        let g = grid();
        let r = visible_cells(&g, vec2(300.0, 0.0), vec2(700.0, 400.0));
        assert_eq!(
            r,
            CellRange {
                col_min: 1,
                row_min: 0,
                col_max: 6,
                row_max: 4
            }
        );
        let all = visible_cells(&g, vec2(-1000.0, -1000.0), vec2(9000.0, 9000.0));
        assert_eq!((all.col_max, all.row_max), (19, 9));
        assert_eq!(r.iter().count(), 6 * 5);
    }

    #[test]
    fn camera_follows_inside_map() {
        let view = vec2(1000.0, 800.0);
        let map = vec2(2560.0, 1280.0);
        assert_eq!(follow_camera(vec2(200.0, 200.0), view, map), Vec2::ZERO);
        assert_eq!(follow_camera(vec2(1200.0, 700.0), view, map), vec2(700.0, 300.0));
        assert_eq!(follow_camera(vec2(2500.0, 1250.0), view, map), vec2(1560.0, 480.0));
        assert_eq!(follow_camera(vec2(50.0, 50.0), view, vec2(300.0, 300.0)), Vec2::ZERO);
    }
}
