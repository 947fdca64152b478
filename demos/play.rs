use anyhow::Context;
use macroquad::prelude::*;
use tile_skirmish::render::{draw_layer, follow_camera, visible_cells, Sheets, TileSheet};
use tile_skirmish::{
    load_level_file, Actor, palette_slot, Brush, Direction, Editor, EnemySpawn, GameConfig, Layer,
    LevelData, Mode, Session, TileGrid, World,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const LEVEL_PATH: &str = "assets/map.json";
const CONFIG_PATH: &str = "assets/config.json";
const TILES_PATH: &str = "assets/tiles.png";
const PLAYER_PATH: &str = "assets/player.png";
const ENEMY_PATH: &str = "assets/enemy.png";
const ENEMY_DEATH_PATH: &str = "assets/enemy_death.png";

fn window_conf() -> Conf {
    let screen = GameConfig::default().screen;
    Conf {
        window_title: "Tile Skirmish".into(),
        window_width: screen.width as i32,
        window_height: screen.height as i32,
        ..Default::default()
    }
}

const KEYS: [(KeyCode, Direction); 8] = [
    (KeyCode::W, Direction::Up),
    (KeyCode::S, Direction::Down),
    (KeyCode::A, Direction::Left),
    (KeyCode::D, Direction::Right),
    (KeyCode::Up, Direction::Up),
    (KeyCode::Down, Direction::Down),
    (KeyCode::Left, Direction::Left),
    (KeyCode::Right, Direction::Right),
];

/// Walled room with a few pillars and two enemies, used when no level file
/// is around.
fn fallback_level(cfg: &GameConfig) -> anyhow::Result<LevelData> {
    let (w, h) = (16, 12);
    let mut grid = TileGrid::new(w, h, &cfg.grid)?;
    for row in 0..h {
        for col in 0..w {
            let edge = row == 0 || col == 0 || row == h - 1 || col == w - 1;
            let pillar = row % 4 == 2 && col % 5 == 3;
            grid.set(Layer::Background, col, row, if edge || pillar { 2 } else { 1 })?;
        }
    }
    Ok(LevelData {
        grid,
        enemies: vec![
            EnemySpawn {
                x: 400.0,
                y: 450.0,
                speed: 2.0,
                min_x: 300,
                max_x: 500,
            },
            EnemySpawn {
                x: 900.0,
                y: 700.0,
                speed: 3.0,
                min_x: 700,
                max_x: 1200,
            },
        ],
    })
}

fn load_level(cfg: &GameConfig) -> anyhow::Result<LevelData> {
    if std::path::Path::new(LEVEL_PATH).exists() {
        load_level_file(LEVEL_PATH, &cfg.grid)
            .with_context(|| format!("Loading level {LEVEL_PATH}"))
    } else {
        info!("{LEVEL_PATH} not found, using built-in room");
        fallback_level(cfg)
    }
}

/// Loads one sprite sheet, or `None` so drawing falls back to flat colours.
async fn load_sheet(path: &str, tile: f32) -> Option<TileSheet> {
    match load_texture(path).await {
        Ok(tex) => {
            info!(path, "sheet loaded");
            Some(TileSheet::new(tex, tile, tile))
        }
        Err(e) => {
            warn!(path, "sheet not loaded, drawing flat colours: {e:?}");
            None
        }
    }
}

async fn load_sheets(cfg: &GameConfig) -> Sheets {
    let tile = cfg.grid.tile_size as f32;
    Sheets {
        tiles: load_sheet(TILES_PATH, tile).await,
        player: load_sheet(PLAYER_PATH, tile).await,
        enemy: load_sheet(ENEMY_PATH, tile).await,
        enemy_death: load_sheet(ENEMY_DEATH_PATH, tile).await,
    }
}

fn draw_editor_panel(editor: &Editor, cfg: &GameConfig, tile_count: u32) {
    let left = screen_width() - cfg.editor.panel_width;
    let panel = Color::from_rgba(50, 50, 60, 255);
    draw_rectangle(left, 0.0, cfg.editor.panel_width, screen_height(), panel);
    draw_text("TILE EDITOR", left + 30.0, 30.0, 24.0, WHITE);
    let layer = match editor.layer {
        Layer::Background => "Layer: Background",
        Layer::Foreground => "Layer: Foreground",
    };
    draw_text(layer, left + 10.0, 65.0, 20.0, WHITE);
    draw_text("[F] layers  [M] save", left + 10.0, 85.0, 16.0, WHITE);
    for i in 0..tile_count {
        let r = palette_slot(left + 10.0, i as usize);
        let colour = if editor.selected == i { YELLOW } else { GRAY };
        draw_rectangle(r.x, r.y, r.w, r.h, colour);
        draw_text(&i.to_string(), r.x + 2.0, r.y + r.h - 2.0, 14.0, BLACK);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = if std::path::Path::new(CONFIG_PATH).exists() {
        GameConfig::load(CONFIG_PATH)?
    } else {
        GameConfig::default()
    };
    let level = load_level(&cfg)?;
    let mut session = Session::default();
    let mut editor = Editor::new(cfg.editor.clone(), cfg.screen.size());
    let mut world = World::new(cfg.clone(), level);
    let sheets = load_sheets(&cfg).await;
    let view = cfg.screen.size();

    loop {
        clear_background(Color::from_rgba(125, 175, 225, 255));

        if is_key_pressed(KeyCode::E) {
            session.toggle_mode();
            info!(mode = ?session.mode, "mode switched");
        }

        match session.mode {
            Mode::Play => {
                for (key, dir) in KEYS {
                    if is_key_pressed(key) {
                        world.key_event(&session, dir, true);
                    }
                    if is_key_released(key) {
                        world.key_event(&session, dir, false);
                    }
                }
                if is_key_pressed(KeyCode::R) {
                    let fresh = load_level(&cfg)?;
                    world.restart(&mut session, fresh);
                }

                world.tick(&mut session);

                let grid = world.grid();
                let map = vec2(grid.width_in_pixels(), grid.height_in_pixels());
                let camera = follow_camera(world.player().position(), view, map);
                tile_skirmish::render::draw_world(&world, camera, view, &sheets);

                if session.won {
                    draw_text("YOU WIN! [R] to replay", 300.0, 400.0, 48.0, WHITE);
                }
            }
            Mode::Edit => {
                let mut steps = Vec2::ZERO;
                if is_key_down(KeyCode::W) {
                    steps.y -= 1.0;
                }
                if is_key_down(KeyCode::S) {
                    steps.y += 1.0;
                }
                if is_key_down(KeyCode::A) {
                    steps.x -= 1.0;
                }
                if is_key_down(KeyCode::D) {
                    steps.x += 1.0;
                }
                if is_key_pressed(KeyCode::F) {
                    editor.toggle_layer();
                }
                if is_key_pressed(KeyCode::M) {
                    let snapshot = world.snapshot();
                    if let Err(e) = editor.save(LEVEL_PATH, &snapshot.grid, &snapshot.enemies) {
                        error!("save failed: {e}");
                    }
                }

                let mouse: Vec2 = mouse_position().into();
                let brush = if is_mouse_button_down(MouseButton::Left) {
                    Some(Brush::Paint)
                } else if is_mouse_button_down(MouseButton::Right) {
                    Some(Brush::Erase)
                } else {
                    None
                };

                if let Some(grid) = world.editor_grid(&session) {
                    editor.scroll(steps, grid);
                    if let Some(brush) = brush {
                        if let Err(e) = editor.click(mouse, brush, grid) {
                            error!("edit failed: {e}");
                        }
                    }
                }

                let grid = world.grid();
                let range = visible_cells(grid, editor.camera, editor.camera + view);
                draw_layer(grid, Layer::Background, range, editor.camera, sheets.tiles.as_ref());
                draw_layer(grid, Layer::Foreground, range, editor.camera, sheets.tiles.as_ref());
                if let Some((col, row)) = editor.cell_at(mouse, grid) {
                    let cell = grid.cell_size();
                    let pos = vec2(col as f32 * cell, row as f32 * cell) - editor.camera;
                    draw_rectangle_lines(pos.x, pos.y, cell, cell, 2.0, YELLOW);
                }
                draw_editor_panel(&editor, &cfg, grid.tile_count());
            }
        }

        next_frame().await;
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    if let Err(e) = run().await {
        error!("{e:#}");
    }
}
