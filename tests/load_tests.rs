// tests/load_tests.rs

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use macroquad::prelude::vec2;
use tile_skirmish::{
    decode_level_str, encode_level, load_level_file, Brush, Editor, EditorConfig, EnemySpawn,
    GridSpec, Layer, MapError, TileGrid,
};

fn temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("tile_skirmish_it_{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn sample_grid(spec: &GridSpec) -> TileGrid {
    let mut grid = TileGrid::new(4, 3, spec).expect("grid");
    grid.set(Layer::Background, 0, 0, 2).unwrap(); // solid
    grid.set(Layer::Background, 3, 2, 1).unwrap();
    grid.set(Layer::Foreground, 1, 2, 23).unwrap(); // decoration
    grid
}

#[test]
fn layers_survive_encode_and_decode() -> anyhow::Result<()> {
    let spec = GridSpec::default();
    let grid = sample_grid(&spec);
    let spawns = vec![EnemySpawn {
        x: 400.0,
        y: 450.0,
        speed: 2.0,
        min_x: 300,
        max_x: 500,
    }];

    let txt = encode_level(&grid, &spawns)?;
    let back = decode_level_str(&txt, &spec)?;

    assert_eq!((back.grid.width(), back.grid.height()), (4, 3));
    for layer in [Layer::Background, Layer::Foreground] {
        let a: Vec<_> = grid.rows(layer).collect();
        let b: Vec<_> = back.grid.rows(layer).collect();
        assert_eq!(a, b, "{layer} layer");
    }
    assert!(back.grid.is_solid(0.0, 0.0, 1.0, 1.0));
    assert_eq!(back.enemies, spawns);
    Ok(())
}

#[test]
fn editor_save_round_trips_through_file() -> anyhow::Result<()> {
    let spec = GridSpec::default();
    let mut grid = sample_grid(&spec);
    let mut editor = Editor::new(EditorConfig::default(), vec2(1000.0, 800.0));

    editor.select(7, &grid);
    editor.toggle_layer();
    editor.click(vec2(260.0, 10.0), Brush::Paint, &mut grid)?;

    let path = temp_dir().join("edited.json");
    editor.save(&path, &grid, &[])?;
    let back = load_level_file(&path, &spec)?;

    assert_eq!(back.grid.get(Layer::Foreground, 2, 0), Some(7));
    assert_eq!(back.grid.get(Layer::Background, 2, 0), Some(0));
    assert!(back.enemies.is_empty());
    Ok(())
}

#[test]
fn mismatched_row_length_is_rejected() {
    let json = r#"{
      "width": 2, "height": 2,
      "tiles": [[1, 1], [1, 1]],
      "foreground": [[0, 0], [0, 0, 0]]
    }"#;
    let err = decode_level_str(json, &GridSpec::default()).unwrap_err();
    match err {
        MapError::InvalidLayerSize {
            layer,
            expected,
            actual,
            ..
        } => {
            assert_eq!(layer, Layer::Foreground);
            assert_eq!((expected, actual), (2, 3));
        }
        other => panic!("expected InvalidLayerSize, got {:?}", other),
    }
}

#[test]
fn missing_rows_are_rejected() {
    let json = r#"{ "width": 1, "height": 2, "tiles": [[1]], "foreground": [[0], [0]] }"#;
    let err = decode_level_str(json, &GridSpec::default()).unwrap_err();
    assert!(matches!(
        err,
        MapError::InvalidLayerSize {
            layer: Layer::Background,
            expected: 2,
            actual: 1,
            ..
        }
    ));
}

#[test]
fn unknown_keys_are_ignored() {
    let json = r#"{ "width": 1, "height": 1, "tiles": [[1]], "foreground": [[0]], "music": "x" }"#;
    assert!(decode_level_str(json, &GridSpec::default()).is_ok());
}
