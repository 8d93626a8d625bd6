//! Ball state and physics tuning
//!
//! A `Ball` lives for exactly one drop and is owned by that drop alone.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::Board;
use crate::consts::*;
use crate::error::{Error, Result};

/// Physics tuning values, expressed per nominal frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConstants {
    /// Downward acceleration added to `vel.y` each nominal frame
    pub gravity: f32,
    /// Fraction of speed kept after hitting a peg or wall
    pub bounce: f32,
    /// Horizontal velocity decay factor per nominal frame
    pub friction: f32,
    /// Full width of the initial horizontal velocity jitter
    pub random_factor: f32,
    /// Full width of the bounce angle jitter (radians)
    pub angle_jitter: f32,
    /// Full width of the spawn position jitter
    pub spawn_jitter: f32,
    pub peg_cooldown_ms: f32,
    pub nominal_frame_ms: f32,
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            bounce: BOUNCE,
            friction: FRICTION,
            random_factor: RANDOM_FACTOR,
            angle_jitter: ANGLE_JITTER,
            spawn_jitter: SPAWN_JITTER,
            peg_cooldown_ms: PEG_COOLDOWN_MS,
            nominal_frame_ms: NOMINAL_FRAME_MS,
        }
    }
}

impl PhysicsConstants {
    pub fn validate(&self) -> Result<()> {
        if !(self.bounce > 0.0 && self.bounce < 1.0) {
            return Err(Error::config(format!(
                "bounce must be in (0, 1), got {}",
                self.bounce
            )));
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(Error::config(format!(
                "friction must be in (0, 1], got {}",
                self.friction
            )));
        }
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return Err(Error::config(format!(
                "gravity must be positive, got {}",
                self.gravity
            )));
        }
        if !self.nominal_frame_ms.is_finite() || self.nominal_frame_ms <= 0.0 {
            return Err(Error::config(format!(
                "nominal frame must be positive, got {}",
                self.nominal_frame_ms
            )));
        }
        let non_negative = [
            ("random_factor", self.random_factor),
            ("angle_jitter", self.angle_jitter),
            ("spawn_jitter", self.spawn_jitter),
            ("peg_cooldown_ms", self.peg_cooldown_ms),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::config(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// The peg a ball just bounced off, ignored until `release_at_ms`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PegCooldown {
    /// Index into `Board::pegs`
    pub peg: usize,
    pub release_at_ms: f64,
}

/// A ball in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub wager: f64,
    pub last_peg: Option<PegCooldown>,
    /// Simulated time since the drop started
    pub clock_ms: f64,
    pub steps: u32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, wager: f64) -> Self {
        Self {
            pos,
            vel,
            wager,
            last_peg: None,
            clock_ms: 0.0,
            steps: 0,
        }
    }

    /// Spawn a ball at the top of the board with jittered x and horizontal velocity
    pub fn spawn<R: Rng + ?Sized>(
        board: &Board,
        physics: &PhysicsConstants,
        wager: f64,
        rng: &mut R,
    ) -> Self {
        let x = board.center_x() + (rng.random::<f32>() - 0.5) * physics.spawn_jitter;
        let vx = (rng.random::<f32>() - 0.5) * physics.random_factor;
        Self::new(Vec2::new(x, 0.0), Vec2::new(vx, 0.0), wager)
    }

    /// Peg currently ignored for collisions
    #[inline]
    pub fn ignored_peg(&self) -> Option<usize> {
        self.last_peg.map(|c| c.peg)
    }

    /// Advance the drop clock and release an expired peg cooldown
    pub fn advance_clock(&mut self, elapsed_ms: f32) {
        self.clock_ms += elapsed_ms as f64;
        if let Some(cooldown) = self.last_peg {
            if self.clock_ms >= cooldown.release_at_ms {
                self.last_peg = None;
            }
        }
    }

    /// Ignore `peg` for the next `cooldown_ms` of simulated time
    pub fn mark_peg(&mut self, peg: usize, cooldown_ms: f32) {
        self.last_peg = Some(PegCooldown {
            peg,
            release_at_ms: self.clock_ms + cooldown_ms as f64,
        });
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

/// Game RNG, seeded for reproducible runs or from the thread RNG otherwise
pub fn seeded_rng(seed: Option<u64>) -> Pcg32 {
    match seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_rng(&mut rand::rng()),
    }
}
