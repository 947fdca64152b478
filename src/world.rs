use tracing::{debug, info};

use crate::actor::{Actor, Direction};
use crate::config::GameConfig;
use crate::enemy::{Enemy, EnemySpawn};
use crate::grid::TileGrid;
use crate::loader::json_loader::LevelData;
use crate::movement::Obstacle;
use crate::player::Player;

/// Which half of the program owns the grid right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Gameplay runs; the grid is read-only
    #[default]
    Play,
    /// Gameplay is frozen; the editor owns the grid
    Edit,
}

/// Session flags kept outside the world and handed to every tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Who owns the grid
    pub mode: Mode,
    /// Set once the enemy list empties; stays set until a restart
    pub won: bool,
    /// Index of the level currently loaded
    pub level: usize,
}

impl Session {
    /// Switches between play and edit.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            Mode::Play => Mode::Edit,
            Mode::Edit => Mode::Play,
        };
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Enemies hit by the player this tick
    pub hits: usize,
    /// Enemies dropped from the world this tick
    pub removed: usize,
    /// Win flag after this tick
    pub won: bool,
}

/// Grid, player and enemies of the loaded level.
pub struct World {
    cfg: GameConfig,
    grid: TileGrid,
    player: Player,
    enemies: Vec<Enemy>,
    spawns: Vec<EnemySpawn>,
}

impl World {
    /// World for `level`, with the player at the configured start.
    pub fn new(cfg: GameConfig, level: LevelData) -> Self {
        let cell = level.grid.cell_size();
        let player = Player::new(&cfg.player, cell);
        let enemies = spawn_enemies(&cfg, &level.enemies, cell);
        info!(
            width = level.grid.width(),
            height = level.grid.height(),
            enemies = enemies.len(),
            "world created"
        );
        Self {
            cfg,
            grid: level.grid,
            player,
            enemies,
            spawns: level.enemies,
        }
    }

    /// Settings the world was built with.
    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    /// The level grid.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// The player.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Enemies still in play, in spawn order.
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Enemy spawns of the loaded level, for saving.
    pub fn spawns(&self) -> &[EnemySpawn] {
        &self.spawns
    }

    /// The current grid (including edits) with the level's enemy spawns.
    pub fn snapshot(&self) -> LevelData {
        LevelData {
            grid: self.grid.clone(),
            enemies: self.spawns.clone(),
        }
    }

    /// True when no enemies are left.
    pub fn is_won(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Mutable grid for the editor. `None` unless the session is in edit
    /// mode, so gameplay and editing never touch the grid in the same tick.
    pub fn editor_grid(&mut self, session: &Session) -> Option<&mut TileGrid> {
        match session.mode {
            Mode::Edit => Some(&mut self.grid),
            Mode::Play => None,
        }
    }

    /// Routes a direction key to the player. Presses are ignored outside
    /// play mode; releases always go through so no flag stays stuck.
    pub fn key_event(&mut self, session: &Session, dir: Direction, pressed: bool) {
        if session.mode == Mode::Play || !pressed {
            self.player.key_event(dir, pressed);
        }
    }

    /// Replaces grid, player and enemies in one step and clears the win flag.
    pub fn restart(&mut self, session: &mut Session, level: LevelData) {
        let cell = level.grid.cell_size();
        let enemies = spawn_enemies(&self.cfg, &level.enemies, cell);
        let player = Player::new(&self.cfg.player, cell);
        info!(level = session.level, enemies = enemies.len(), "level restarted");
        self.grid = level.grid;
        self.player = player;
        self.enemies = enemies;
        self.spawns = level.enemies;
        session.won = false;
    }

    /// Runs one frame of gameplay.
    ///
    /// 1. The player turns, animates and moves; patrolling enemies are
    ///    obstacles.
    /// 2. Each enemy in order updates, then, if still patrolling, dies if it
    ///    blocked the player's move this tick or if its box overlaps the
    ///    player's.
    /// 3. Enemies whose death sequence just completed are dropped.
    /// 4. The win flag is updated.
    ///
    /// Nothing happens in edit mode.
    pub fn tick(&mut self, session: &mut Session) -> TickReport {
        let mut report = TickReport {
            won: session.won,
            ..Default::default()
        };
        if session.mode != Mode::Play {
            return report;
        }

        let obstacles: Vec<Obstacle> = self
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_patrolling())
            .map(|(id, e)| Obstacle {
                id,
                rect: e.collision_box(),
            })
            .collect();
        let res = self.player.update(&self.grid, &obstacles);
        let player_box = self.player.collision_box();

        for (i, enemy) in self.enemies.iter_mut().enumerate() {
            enemy.update();
            if !enemy.is_patrolling() {
                continue;
            }
            let blocked_player = res.contacts.iter().any(|c| c.id == i);
            let hit = if blocked_player {
                enemy.kill()
            } else {
                enemy.check_collision(&player_box)
            };
            if hit {
                report.hits += 1;
            }
        }

        let before = self.enemies.len();
        self.enemies.retain(|e| !e.is_death_animation_complete());
        report.removed = before - self.enemies.len();
        if report.removed > 0 {
            debug!(removed = report.removed, left = self.enemies.len(), "enemies removed");
        }

        if self.is_won() && !session.won {
            info!(level = session.level, "level cleared");
            session.won = true;
        }
        report.won = session.won;
        report
    }
}

fn spawn_enemies(cfg: &GameConfig, spawns: &[EnemySpawn], cell: f32) -> Vec<Enemy> {
    spawns.iter().map(|s| Enemy::new(s, &cfg.enemy, cell)).collect()
}
