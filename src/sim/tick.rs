//! Per-step ball integration
//!
//! The caller owns the loop: each call advances one ball by the real time
//! elapsed since the previous step. Physics constants are tuned per nominal
//! frame, so the step is scaled by `elapsed / nominal_frame_ms`.

use rand::Rng;

use super::board::Board;
use super::collision::{bounce_off_peg, find_peg_collision, wall_collision};
use super::state::{Ball, PhysicsConstants};
use crate::error::{Error, Result};

/// Result of advancing a ball by one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepResult {
    InFlight { x: f32, y: f32 },
    /// Ball crossed the floor; no further steps should be taken
    Landed { x: f32 },
}

/// Advance `ball` by one step of `elapsed_ms` milliseconds
///
/// At most one peg bounce is resolved per step. Fails if the board is
/// degenerate, the elapsed time is unusable, or the ball state stops being
/// finite.
pub fn step<R: Rng + ?Sized>(
    board: &Board,
    physics: &PhysicsConstants,
    ball: &mut Ball,
    elapsed_ms: f32,
    rng: &mut R,
) -> Result<StepResult> {
    if board.pegs.is_empty() || board.slot_count() == 0 {
        return Err(Error::simulation("board has no pegs or slots"));
    }
    if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
        return Err(Error::simulation(format!("bad elapsed time {elapsed_ms}")));
    }
    if !ball.is_finite() {
        return Err(Error::simulation(format!(
            "non-finite ball state pos={} vel={}",
            ball.pos, ball.vel
        )));
    }

    let delta = elapsed_ms / physics.nominal_frame_ms;
    ball.advance_clock(elapsed_ms);

    // Exponential friction keeps decay independent of step size
    ball.vel.y += physics.gravity * delta;
    ball.vel.x *= physics.friction.powf(delta);
    ball.pos += ball.vel * delta;

    if let Some(index) = find_peg_collision(
        ball.pos,
        &board.pegs,
        board.config.collision_distance(),
        ball.ignored_peg(),
    ) {
        let jitter = (rng.random::<f32>() - 0.5) * physics.angle_jitter;
        ball.vel = bounce_off_peg(ball.pos, ball.vel, board.pegs[index].pos, physics.bounce, jitter);
        ball.mark_peg(index, physics.peg_cooldown_ms);
    }

    let (left, right) = board.wall_bounds();
    if let Some(contact) = wall_collision(ball.pos.x, ball.vel.x, left, right, physics.bounce) {
        ball.pos.x = contact.x;
        ball.vel.x = contact.vel_x;
    }

    if !ball.is_finite() {
        return Err(Error::simulation(format!(
            "ball state diverged pos={} vel={}",
            ball.pos, ball.vel
        )));
    }

    ball.steps += 1;

    if ball.pos.y > board.landing_y() {
        Ok(StepResult::Landed { x: ball.pos.x })
    } else {
        Ok(StepResult::InFlight {
            x: ball.pos.x,
            y: ball.pos.y,
        })
    }
}
