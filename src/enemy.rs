use macroquad::prelude::*;
use tracing::debug;

use crate::actor::{Actor, AnimationCursor, Inset};
use crate::config::EnemyConfig;
use crate::geom::overlaps;
use crate::movement::patrol_step;

/// Lifecycle of an enemy. Only ever moves forward:
/// `Patrolling -> Dying -> Removed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    /// Walking between the patrol bounds
    Patrolling,
    /// Playing the death sequence
    Dying {
        /// Index into the death sequence
        frame: usize,
    },
    /// Death sequence finished; inert
    Removed,
}

/// Horizontal facing, derived from the sign of the patrol direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Moving toward `min_x`
    Left,
    /// Moving toward `max_x`
    Right,
}

/// Spawn record for one enemy, as stored in a level file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpawn {
    /// Spawn x in world pixels
    pub x: f32,
    /// Spawn y in world pixels
    pub y: f32,
    /// Pixels moved per tick
    pub speed: f32,
    /// Left patrol bound, inclusive
    pub min_x: i32,
    /// Right patrol bound, inclusive
    pub max_x: i32,
}

/// A patrolling enemy that dies on contact with the player.
#[derive(Debug, Clone)]
pub struct Enemy {
    pos: Vec2,
    speed: f32,
    dir: f32,
    min_x: f32,
    max_x: f32,
    inset: Inset,
    anim: AnimationCursor,
    patrol_frames: usize,
    death_frames: usize,
    state: EnemyState,
}

impl Enemy {
    /// Patrolling enemy at the spawn point, heading right.
    pub fn new(spawn: &EnemySpawn, cfg: &EnemyConfig, cell: f32) -> Self {
        Self {
            pos: vec2(spawn.x, spawn.y),
            speed: spawn.speed,
            dir: 1.0,
            min_x: spawn.min_x as f32,
            max_x: spawn.max_x as f32,
            inset: cfg.profile(cell),
            anim: AnimationCursor::new(cfg.animation_speed),
            patrol_frames: cfg.patrol_frames.max(1),
            death_frames: cfg.death_frames.max(1),
            state: EnemyState::Patrolling,
        }
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> EnemyState {
        self.state
    }

    /// True while walking its patrol; only then is it an obstacle.
    pub fn is_patrolling(&self) -> bool {
        self.state == EnemyState::Patrolling
    }

    /// True while the death sequence plays.
    pub fn is_dying(&self) -> bool {
        matches!(self.state, EnemyState::Dying { .. })
    }

    /// True once the death sequence has finished.
    pub fn is_removed(&self) -> bool {
        self.state == EnemyState::Removed
    }

    /// Facing from the current patrol direction.
    pub fn facing(&self) -> Facing {
        if self.dir < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    /// Index into the death sequence while dying.
    pub fn death_frame(&self) -> Option<usize> {
        match self.state {
            EnemyState::Dying { frame } => Some(frame),
            _ => None,
        }
    }

    /// Runs one tick: a patrol step and animation while patrolling, one
    /// death frame while dying. Nothing happens once removed.
    pub fn update(&mut self) {
        match self.state {
            EnemyState::Patrolling => {
                let (x, dir) =
                    patrol_step(self.pos.x, self.speed, self.dir, self.min_x, self.max_x);
                self.pos.x = x;
                self.dir = dir;
                self.advance_animation();
            }
            EnemyState::Dying { frame } => {
                let frame = frame + 1;
                if frame >= self.death_frames {
                    debug!(x = self.pos.x, y = self.pos.y, "enemy removed");
                    self.state = EnemyState::Removed;
                } else {
                    self.state = EnemyState::Dying { frame };
                }
            }
            EnemyState::Removed => {}
        }
    }

    /// True once the death sequence has reached its last frame. The world
    /// drops the enemy on the tick this first turns true.
    pub fn is_death_animation_complete(&self) -> bool {
        match self.state {
            EnemyState::Dying { frame } => frame + 1 >= self.death_frames,
            EnemyState::Removed => true,
            EnemyState::Patrolling => false,
        }
    }

    /// Starts the death sequence. Returns false unless the enemy was
    /// patrolling.
    pub fn kill(&mut self) -> bool {
        if self.state != EnemyState::Patrolling {
            return false;
        }
        debug!(x = self.pos.x, y = self.pos.y, "enemy hit");
        self.state = EnemyState::Dying { frame: 0 };
        true
    }

    /// Overlap test that also kills: if a patrolling enemy's box overlaps
    /// `rect`, it starts dying and this returns true. Dying and removed
    /// enemies never report a collision.
    pub fn check_collision(&mut self, rect: &Rect) -> bool {
        if !self.is_patrolling() {
            return false;
        }
        if overlaps(&self.collision_box(), rect) {
            return self.kill();
        }
        false
    }
}

impl Actor for Enemy {
    fn position(&self) -> Vec2 {
        self.pos
    }

    /// The side box, for either facing: enemies only move horizontally.
    fn collision_box_at(&self, pos: Vec2) -> Rect {
        self.inset.at(pos)
    }

    fn frame(&self) -> usize {
        match self.state {
            EnemyState::Dying { frame } => frame,
            _ => self.anim.frame,
        }
    }

    fn advance_animation(&mut self) {
        if self.anim.tick() {
            self.anim.frame = (self.anim.frame + 1) % self.patrol_frames;
        }
    }
}
