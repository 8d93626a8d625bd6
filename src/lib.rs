//! Plinko Drop - a ball-drop wagering game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board geometry, peg physics, landing)
//! - `session`: Wallet, drops in flight, auto-drop schedule
//! - `settings`: JSON-backed game configuration and physics tuning

pub mod error;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use session::{
    ActiveDrop, AutoDrop, DropStatus, LastHit, Layout, Session, SessionSummary, Wallet,
};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Nominal frame duration (ms) the physics constants are tuned against
    pub const NOMINAL_FRAME_MS: f32 = 16.67;

    /// Supported row counts (one slot per row)
    pub const MIN_ROWS: u32 = 1;
    pub const MAX_ROWS: u32 = 16;
    pub const DEFAULT_ROWS: u32 = 12;

    /// Board geometry defaults
    pub const PEG_SPACING: f32 = 40.0;
    pub const START_Y: f32 = 50.0;
    pub const SLOT_WIDTH: f32 = 50.0;
    /// Distance from the last peg row to the floor
    pub const FLOOR_OFFSET: f32 = 40.0;
    pub const PEG_RADIUS: f32 = 4.0;
    pub const BALL_RADIUS: f32 = 7.5;
    pub const BORDER_RADIUS: f32 = 7.5;
    pub const VIEWPORT_WIDTH: f32 = 800.0;

    /// Physics defaults (per nominal frame)
    pub const GRAVITY: f32 = 0.15;
    pub const BOUNCE: f32 = 0.7;
    pub const FRICTION: f32 = 0.99;
    /// Initial horizontal velocity jitter
    pub const RANDOM_FACTOR: f32 = 0.3;
    /// Full width of the bounce angle jitter (radians), i.e. ±0.125
    pub const ANGLE_JITTER: f32 = 0.25;
    /// Full width of the spawn x jitter, i.e. ±20
    pub const SPAWN_JITTER: f32 = 40.0;
    /// How long a ball ignores the peg it just bounced off
    pub const PEG_COOLDOWN_MS: f32 = 100.0;

    /// Hard cap on steps per drop (about five minutes at 60 Hz)
    pub const MAX_DROP_STEPS: u32 = 18_000;

    /// Multiplier of the two edge slots
    pub const EDGE_MULTIPLIER: f64 = 5.0;
    /// Multiplier pattern for inner slots, indexed by `slot % 30`
    pub const MULTIPLIER_PATTERN: [f64; 30] = [
        3.0, 3.0, 2.0, 1.0, 0.3, 0.2, 0.2, 0.3, 1.0, 2.0, //
        3.0, 1.0, 0.3, 0.4, 0.2, 0.2, 0.4, 1.0, 2.0, 3.0, //
        2.0, 1.0, 0.4, 0.2, 0.2, 0.2, 0.4, 1.0, 2.0, 3.0,
    ];

    /// Wallet defaults
    pub const STARTING_BALANCE: f64 = 150.0;
    pub const DEFAULT_BET: f64 = 10.0;
    pub const TOP_UP_AMOUNT: f64 = 100.0;
    pub const MIN_BET: f64 = 0.01;
    pub const AUTO_DROP_INTERVAL_MS: f32 = 1000.0;
    /// Most auto-drops started by one tick; any larger backlog is discarded
    pub const MAX_AUTO_DROPS_PER_TICK: u32 = 16;
}

/// Round a money amount to whole cents
#[inline]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
