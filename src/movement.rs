use macroquad::prelude::*;
use tracing::trace;

use crate::actor::Inset;
use crate::geom::overlaps;
use crate::grid::TileGrid;

/// A rectangle some other actor occupies this tick. `id` is whatever the
/// caller uses to find that actor again, usually its index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Caller-chosen id reported back in [`Contact`]
    pub id: usize,
    /// Box that blocks movement
    pub rect: Rect,
}

/// What stopped a candidate move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocker {
    /// A solid tile
    Tile,
    Obstacle(usize),
}

/// A candidate rectangle that ran into an obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Id of the obstacle that blocked
    pub id: usize,
    /// Candidate box that hit it
    pub rect: Rect,
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resolution {
    /// Committed top-left position
    pub position: Vec2,
    /// What stopped the X step, if anything
    pub blocked_x: Option<Blocker>,
    /// What stopped the Y step, if anything
    pub blocked_y: Option<Blocker>,
    /// Obstacles hit by a rejected candidate, in axis order (x then y)
    pub contacts: Vec<Contact>,
}

fn blocker_for(rect: &Rect, grid: &TileGrid, obstacles: &[Obstacle]) -> Option<Blocker> {
    if grid.is_solid_rect(rect) {
        return Some(Blocker::Tile);
    }
    obstacles
        .iter()
        .find(|o| overlaps(rect, &o.rect))
        .map(|o| Blocker::Obstacle(o.id))
}

/// Moves `pos` by `delta`, one axis at a time.
///
/// X is tried first with the box anchored at `(x + dx, y)`. Y is then tried
/// from the committed X, so a diagonal move into a wall keeps the free axis
/// and slides along it. An axis with zero delta is never tested.
///
/// `inset` has to match the facing chosen from this tick's input.
pub fn resolve(
    pos: Vec2,
    delta: Vec2,
    inset: &Inset,
    grid: &TileGrid,
    obstacles: &[Obstacle],
) -> Resolution {
    let mut out = Resolution {
        position: pos,
        ..Default::default()
    };

    if delta.x != 0.0 {
        let candidate = inset.at(vec2(pos.x + delta.x, pos.y));
        match blocker_for(&candidate, grid, obstacles) {
            None => out.position.x = pos.x + delta.x,
            Some(b) => {
                trace!(?b, dx = delta.x, "x move blocked");
                if let Blocker::Obstacle(id) = b {
                    out.contacts.push(Contact {
                        id,
                        rect: candidate,
                    });
                }
                out.blocked_x = Some(b);
            }
        }
    }

    if delta.y != 0.0 {
        let candidate = inset.at(vec2(out.position.x, pos.y + delta.y));
        match blocker_for(&candidate, grid, obstacles) {
            None => out.position.y = pos.y + delta.y,
            Some(b) => {
                trace!(?b, dy = delta.y, "y move blocked");
                if let Blocker::Obstacle(id) = b {
                    out.contacts.push(Contact {
                        id,
                        rect: candidate,
                    });
                }
                out.blocked_y = Some(b);
            }
        }
    }

    out
}

/// One-dimensional patrol step between inclusive bounds.
///
/// `dir` is +1 or -1. A walker already at or past the bound it is heading
/// for turns before moving. After moving, it turns if it reached or passed
/// a bound in its direction of travel, so the next step heads back. Tiles
/// are not consulted. Returns the new `(x, dir)`.
pub fn patrol_step(x: f32, speed: f32, dir: f32, min_x: f32, max_x: f32) -> (f32, f32) {
    let at_bound = |x: f32, dir: f32| (dir > 0.0 && x >= max_x) || (dir < 0.0 && x <= min_x);

    let mut dir = dir;
    if at_bound(x, dir) {
        dir = -dir;
    }
    let x = x + speed * dir;
    if at_bound(x, dir) {
        dir = -dir;
    }
    (x, dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSpec;

    fn spec() -> GridSpec {
        GridSpec {
            tile_size: 32,
            scale_factor: 1,
            tile_count: 4,
            solid_tiles: vec![1],
        }
    }

    fn unit_inset() -> Inset {
        Inset {
            offset_x: 0.0,
            offset_y: 0.0,
            width: 16.0,
            height: 16.0,
        }
    }

    #[test]
    fn free_move_commits_both_axes() {
        let grid = TileGrid::new(4, 4, &spec()).expect("grid");
        let r = resolve(vec2(10.0, 10.0), vec2(3.0, -2.0), &unit_inset(), &grid, &[]);
        assert_eq!(r.position, vec2(13.0, 8.0));
        assert!(r.blocked_x.is_none() && r.blocked_y.is_none());
    }

    #[test]
    fn obstacle_blocks_and_is_reported() {
        let grid = TileGrid::new(4, 4, &spec()).expect("grid");
        let obstacles = [Obstacle {
            id: 7,
            rect: Rect::new(30.0, 0.0, 10.0, 40.0),
        }];
        let r = resolve(vec2(10.0, 10.0), vec2(5.0, 5.0), &unit_inset(), &grid, &obstacles);
        assert_eq!(r.position.x, 10.0);
        assert_eq!(r.blocked_x, Some(Blocker::Obstacle(7)));
        assert_eq!(r.contacts.len(), 1);
        assert_eq!(r.contacts[0].id, 7);
        assert_eq!(r.contacts[0].rect, Rect::new(15.0, 10.0, 16.0, 16.0));
        // Y still moves: the obstacle only blocked the x candidate.
        assert_eq!(r.position.y, 15.0);
    }

    #[test]
    fn y_is_tested_from_committed_x() {
        let bg = vec![vec![0, 0, 0], vec![0, 0, 1], vec![0, 0, 0]];
        let fg = vec![vec![0; 3]; 3];
        let grid = TileGrid::from_rows(3, 3, &bg, &fg, &spec()).expect("grid");
        // Moving right puts the box in column 2, where moving down would hit
        // the solid cell; from the old x it would not.
        let r = resolve(vec2(40.0, 8.0), vec2(10.0, 10.0), &unit_inset(), &grid, &[]);
        assert_eq!(r.position.x, 50.0);
        assert_eq!(r.blocked_y, Some(Blocker::Tile));
        assert_eq!(r.position.y, 8.0);
    }

    #[test]
    fn patrol_turns_at_max_before_moving() {
        let (x, dir) = patrol_step(500.0, 2.0, 1.0, 300.0, 500.0);
        assert_eq!(dir, -1.0);
        assert_eq!(x, 498.0);
    }

    #[test]
    fn patrol_turns_on_reaching_bound_exactly() {
        let (x, dir) = patrol_step(496.0, 2.0, 1.0, 300.0, 500.0);
        assert_eq!((x, dir), (498.0, 1.0));
        let (x, dir) = patrol_step(x, 2.0, dir, 300.0, 500.0);
        assert_eq!((x, dir), (500.0, -1.0));
        let (x, dir) = patrol_step(x, 2.0, dir, 300.0, 500.0);
        assert_eq!((x, dir), (498.0, -1.0));
    }

    #[test]
    fn patrol_leaving_min_keeps_heading_right() {
        let (x, dir) = patrol_step(300.0, 2.0, 1.0, 300.0, 500.0);
        assert_eq!((x, dir), (302.0, 1.0));
    }
}
