use std::{io, path::PathBuf};

use thiserror::Error;

use crate::grid::{Layer, TileIndex};

/// Errors raised while loading, validating or editing level data.
#[derive(Debug, Error)]
pub enum MapError {
    /// File I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that was being read or written
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
    /// JSON decode error for a level file
    #[error("failed to parse level file {path}: {source}")]
    Json {
        /// File that failed to decode
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
    /// JSON decode or encode error for in-memory level data
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Unsupported file format (non-JSON)
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    /// Width or height of the grid is zero
    #[error("map dimensions must be non-zero")]
    EmptyGrid,
    /// Declared dimensions exceed the largest supported grid
    #[error("map of {width}x{height} cells exceeds the limit of {max} cells")]
    GridTooLarge {
        /// Declared width in cells
        width: usize,
        /// Declared height in cells
        height: usize,
        /// Largest cell count per layer
        max: usize,
    },
    /// A layer's rows do not match the declared map dimensions
    #[error("invalid size for {layer} layer: expected {expected} {what}, got {actual}")]
    InvalidLayerSize {
        /// Layer that failed validation
        layer: Layer,
        /// `"rows"` or `"columns in row N"`
        what: String,
        /// Declared size
        expected: usize,
        /// Size found in the data
        actual: usize,
    },
    /// A cell holds an index that the tileset does not have
    #[error("tile index {index} at ({col}, {row}) in {layer} layer is outside tileset of {tile_count} tiles")]
    InvalidTileIndex {
        /// Layer holding the cell
        layer: Layer,
        /// Column of the cell
        col: usize,
        /// Row of the cell
        row: usize,
        /// Offending index
        index: TileIndex,
        /// Number of tiles in the tileset
        tile_count: TileIndex,
    },
    /// An enemy record with `minX > maxX`
    #[error("enemy {enemy} has inverted patrol bounds: minX {min_x} > maxX {max_x}")]
    InvalidPatrolBounds {
        /// Position of the record in the `enemies` array
        enemy: usize,
        /// Declared left bound
        min_x: i32,
        /// Declared right bound
        max_x: i32,
    },
    /// Cell coordinates outside the grid
    #[error("cell ({col}, {row}) is outside the {width}x{height} grid")]
    CellOutOfBounds {
        /// Requested column
        col: usize,
        /// Requested row
        row: usize,
        /// Grid width in cells
        width: usize,
        /// Grid height in cells
        height: usize,
    },
}
