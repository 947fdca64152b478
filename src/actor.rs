use macroquad::prelude::*;

use crate::geom;

/// Facing of a four-way actor. The discriminant is the sprite-sheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Facing the camera
    Down = 0,
    /// Facing left
    Left = 1,
    /// Facing away from the camera
    Up = 2,
    /// Facing right
    Right = 3,
}

impl Direction {
    /// Row of the sprite sheet holding this facing's walk cycle.
    #[inline]
    pub fn row(self) -> usize {
        self as usize
    }

    /// True for Left and Right, which use the side box.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Collision rectangle inset from the top-left of an actor's sprite cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inset {
    /// Left inset from the sprite cell
    pub offset_x: f32,
    /// Top inset from the sprite cell
    pub offset_y: f32,
    /// Box width
    pub width: f32,
    /// Box height
    pub height: f32,
}

impl Inset {
    /// Box shrunk by `(offset_x, offset_y)` on every side of a `cell`-sized
    /// square. A negative remainder clamps to an empty box.
    pub fn symmetric(cell: f32, offset_x: f32, offset_y: f32) -> Self {
        Self {
            offset_x,
            offset_y,
            width: (cell - 2.0 * offset_x).max(0.0),
            height: (cell - 2.0 * offset_y).max(0.0),
        }
    }

    /// World-space box for a sprite whose top-left is `pos`.
    #[inline]
    pub fn at(&self, pos: Vec2) -> Rect {
        Rect::new(pos.x + self.offset_x, pos.y + self.offset_y, self.width, self.height)
    }
}

/// Side and front/back boxes of a four-way actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionProfile {
    /// Used while facing left or right
    pub side: Inset,
    /// Used while facing up or down
    pub front_back: Inset,
}

impl CollisionProfile {
    /// Box used while facing `dir`.
    #[inline]
    pub fn for_direction(&self, dir: Direction) -> &Inset {
        if dir.is_horizontal() {
            &self.side
        } else {
            &self.front_back
        }
    }
}

/// Contiguous run of frames in a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRow {
    /// First frame
    pub start: usize,
    /// Number of frames
    pub len: usize,
}

impl FrameRow {
    /// True if `frame` belongs to this row.
    #[inline]
    pub fn contains(&self, frame: usize) -> bool {
        frame >= self.start && frame < self.start + self.len
    }

    /// Next frame inside the row, wrapping after the last one. A frame from
    /// another row snaps to the first frame instead.
    pub fn next(&self, frame: usize) -> usize {
        if !self.contains(frame) {
            return self.start;
        }
        self.start + (frame - self.start + 1) % self.len
    }
}

/// Frame index plus the tick counter that paces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationCursor {
    /// Frame index a renderer should blit
    pub frame: usize,
    counter: u32,
    cadence: u32,
}

impl AnimationCursor {
    /// Cursor that advances every `cadence` ticks (at least one).
    pub fn new(cadence: u32) -> Self {
        Self {
            frame: 0,
            counter: 0,
            cadence: cadence.max(1),
        }
    }

    /// Counts one tick. Returns true, and restarts the count, when the
    /// cadence is reached.
    #[inline]
    pub fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.cadence {
            self.counter = 0;
            true
        } else {
            false
        }
    }
}

/// What the world, the movement resolver and a renderer need from anything
/// that walks around the grid.
pub trait Actor {
    /// Top-left of the sprite cell.
    fn position(&self) -> Vec2;

    /// Collision box for the current facing, anchored at `pos`.
    fn collision_box_at(&self, pos: Vec2) -> Rect;

    /// Collision box at the current position.
    fn collision_box(&self) -> Rect {
        self.collision_box_at(self.position())
    }

    /// Frame index a renderer should blit.
    fn frame(&self) -> usize;

    /// Runs one tick of animation bookkeeping.
    fn advance_animation(&mut self);

    /// Pure overlap test against the current collision box.
    fn overlaps(&self, rect: &Rect) -> bool {
        geom::overlaps(&self.collision_box(), rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_row_wraps_and_snaps() {
        let row = FrameRow { start: 8, len: 4 };
        assert_eq!(row.next(8), 9);
        assert_eq!(row.next(11), 8);
        assert_eq!(row.next(3), 8);
        assert_eq!(row.next(12), 8);
    }

    #[test]
    fn cursor_fires_on_cadence() {
        let mut c = AnimationCursor::new(3);
        let fired: Vec<bool> = (0..6).map(|_| c.tick()).collect();
        assert_eq!(fired, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn zero_cadence_fires_every_tick() {
        let mut c = AnimationCursor::new(0);
        assert!(c.tick());
        assert!(c.tick());
    }

    #[test]
    fn inset_boxes_pick_by_direction() {
        let p = CollisionProfile {
            side: Inset::symmetric(128.0, 30.0, 50.0),
            front_back: Inset::symmetric(128.0, 50.0, 50.0),
        };
        let side = p.for_direction(Direction::Left).at(vec2(10.0, 0.0));
        assert_eq!(side, Rect::new(40.0, 50.0, 68.0, 28.0));
        let front = p.for_direction(Direction::Up).at(vec2(10.0, 0.0));
        assert_eq!(front, Rect::new(60.0, 50.0, 28.0, 28.0));
    }
}
