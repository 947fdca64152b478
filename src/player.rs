use macroquad::prelude::*;

use crate::actor::{Actor, AnimationCursor, CollisionProfile, Direction, FrameRow};
use crate::config::PlayerConfig;
use crate::grid::TileGrid;
use crate::movement::{resolve, Obstacle, Resolution};

/// Movement flags fed by press/release events.
///
/// A press sets its flag and a release clears only its own flag, whatever
/// else is held. Opposite flags cancel out in the displacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    /// Up is held
    pub up: bool,
    /// Down is held
    pub down: bool,
    /// Left is held
    pub left: bool,
    /// Right is held
    pub right: bool,
}

impl Intent {
    /// Sets or clears the flag for `dir`.
    pub fn set(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    /// True if any direction is held.
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Facing implied by the held flags: Up, then Down, Left, Right.
    pub fn facing(&self) -> Option<Direction> {
        if self.up {
            Some(Direction::Up)
        } else if self.down {
            Some(Direction::Down)
        } else if self.left {
            Some(Direction::Left)
        } else if self.right {
            Some(Direction::Right)
        } else {
            None
        }
    }

    /// Desired displacement for one tick.
    pub fn delta(&self, speed: f32) -> Vec2 {
        let mut d = Vec2::ZERO;
        if self.up {
            d.y -= speed;
        }
        if self.down {
            d.y += speed;
        }
        if self.left {
            d.x -= speed;
        }
        if self.right {
            d.x += speed;
        }
        d
    }
}

/// The input-driven actor.
#[derive(Debug, Clone)]
pub struct Player {
    pos: Vec2,
    speed: f32,
    facing: Direction,
    intent: Intent,
    profile: CollisionProfile,
    anim: AnimationCursor,
    frames_per_row: usize,
}

impl Player {
    /// Player at the configured start, facing down.
    pub fn new(cfg: &PlayerConfig, cell: f32) -> Self {
        Self::at(cfg.start(), cfg, cell)
    }

    /// Player at `pos`, facing down.
    pub fn at(pos: Vec2, cfg: &PlayerConfig, cell: f32) -> Self {
        Self {
            pos,
            speed: cfg.speed,
            facing: Direction::Down,
            intent: Intent::default(),
            profile: cfg.profile(cell),
            anim: AnimationCursor::new(cfg.animation_speed),
            frames_per_row: cfg.frames_per_row.max(1),
        }
    }

    /// Current facing.
    #[inline]
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Direction flags held right now.
    #[inline]
    pub fn intent(&self) -> Intent {
        self.intent
    }

    /// Handles a direction key going down (`pressed`) or up.
    pub fn key_event(&mut self, dir: Direction, pressed: bool) {
        self.intent.set(dir, pressed);
    }

    /// Frames of a facing's walk cycle.
    pub fn row_for(&self, dir: Direction) -> FrameRow {
        FrameRow {
            start: dir.row() * self.frames_per_row,
            len: self.frames_per_row,
        }
    }

    /// Points the player at `dir`. A change of facing snaps the frame to the
    /// first frame of the new row.
    fn face(&mut self, dir: Direction) {
        if dir != self.facing || !self.row_for(dir).contains(self.anim.frame) {
            self.facing = dir;
            self.anim.frame = self.row_for(dir).start;
        }
    }

    /// One player tick: facing and animation from this tick's intent, then
    /// axis-separated movement against the grid and `obstacles`.
    pub fn update(&mut self, grid: &TileGrid, obstacles: &[Obstacle]) -> Resolution {
        if let Some(dir) = self.intent.facing() {
            self.face(dir);
        }
        self.advance_animation();

        let delta = self.intent.delta(self.speed);
        let inset = *self.profile.for_direction(self.facing);
        let res = resolve(self.pos, delta, &inset, grid, obstacles);
        self.pos = res.position;
        res
    }
}

impl Actor for Player {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn collision_box_at(&self, pos: Vec2) -> Rect {
        self.profile.for_direction(self.facing).at(pos)
    }

    fn frame(&self) -> usize {
        self.anim.frame
    }

    /// Steps the walk cycle on cadence ticks while a direction is held; the
    /// frame holds still otherwise.
    fn advance_animation(&mut self) {
        if !self.anim.tick() {
            return;
        }
        if let Some(dir) = self.intent.facing() {
            self.facing = dir;
            self.anim.frame = self.row_for(dir).next(self.anim.frame);
        }
    }
}
