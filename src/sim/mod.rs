//! Deterministic simulation module
//!
//! All gameplay physics lives here. Given the same board, ball and RNG
//! stream the results are identical:
//! - Step timing supplied by the caller
//! - Injected RNG only
//! - Stable peg scan order (row-major)
//! - No session, wallet or platform dependencies

pub mod board;
pub mod collision;
pub mod landing;
pub mod multipliers;
pub mod state;
pub mod tick;

pub use board::{Board, BoardConfig, Borders, Peg};
pub use collision::{Wall, WallContact, bounce_off_peg, find_peg_collision, wall_collision};
pub use landing::{Outcome, resolve};
pub use multipliers::{MultiplierTable, MultiplierTier};
pub use state::{Ball, PegCooldown, PhysicsConstants, seeded_rng};
pub use tick::{StepResult, step};
