//! Collision detection and response for pegs and side walls

use glam::Vec2;

use super::board::Peg;

/// Which side wall the ball hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
}

/// Ball position and horizontal velocity after a wall hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallContact {
    pub wall: Wall,
    pub x: f32,
    pub vel_x: f32,
}

/// First peg (in slice order) the ball overlaps, skipping `ignored`
///
/// Pegs are stored row-major, so when two pegs overlap the ball at once the
/// upper-left one wins.
pub fn find_peg_collision(
    ball_pos: Vec2,
    pegs: &[Peg],
    collision_distance: f32,
    ignored: Option<usize>,
) -> Option<usize> {
    pegs.iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != ignored)
        .find(|(_, peg)| ball_pos.distance(peg.pos) < collision_distance)
        .map(|(i, _)| i)
}

/// Velocity after bouncing off a peg
///
/// The ball leaves along the peg-to-ball direction rotated by `jitter`
/// radians, keeping `bounce` of its incoming speed.
pub fn bounce_off_peg(ball_pos: Vec2, vel: Vec2, peg_pos: Vec2, bounce: f32, jitter: f32) -> Vec2 {
    let offset = ball_pos - peg_pos;
    let angle = offset.y.atan2(offset.x) + jitter;
    let speed = vel.length() * bounce;
    Vec2::new(angle.cos(), angle.sin()) * speed
}

/// Clamp the ball inside `[left, right]` and reflect its horizontal velocity
pub fn wall_collision(x: f32, vel_x: f32, left: f32, right: f32, bounce: f32) -> Option<WallContact> {
    if x < left {
        Some(WallContact {
            wall: Wall::Left,
            x: left,
            vel_x: vel_x.abs() * bounce,
        })
    } else if x > right {
        Some(WallContact {
            wall: Wall::Right,
            x: right,
            vel_x: -vel_x.abs() * bounce,
        })
    } else {
        None
    }
}
