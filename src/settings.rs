//! Game settings and physics tuning
//!
//! Stored as JSON. Missing fields fall back to the defaults, so a settings
//! file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::{BoardConfig, PhysicsConstants};

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Peg rows (and slots)
    pub rows: u32,
    /// Wager per ball
    pub bet: f64,
    pub starting_balance: f64,
    /// Amount added by a wallet top-up
    pub top_up_amount: f64,
    pub auto_drop_interval_ms: f32,
    /// Width of the play field; the board is centered in it
    pub viewport_width: f32,
    /// Fixed RNG seed for reproducible sessions
    pub seed: Option<u64>,

    pub board: BoardConfig,
    pub physics: PhysicsConstants,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            bet: DEFAULT_BET,
            starting_balance: STARTING_BALANCE,
            top_up_amount: TOP_UP_AMOUNT,
            auto_drop_interval_ms: AUTO_DROP_INTERVAL_MS,
            viewport_width: VIEWPORT_WIDTH,
            seed: None,
            board: BoardConfig::default(),
            physics: PhysicsConstants::default(),
        }
    }
}

impl Settings {
    /// Check every value a session depends on
    pub fn validate(&self) -> Result<()> {
        if !(MIN_ROWS..=MAX_ROWS).contains(&self.rows) {
            return Err(Error::config(format!(
                "rows must be in {MIN_ROWS}..={MAX_ROWS}, got {}",
                self.rows
            )));
        }
        if !self.bet.is_finite() || self.bet <= 0.0 {
            return Err(Error::InvalidWager(self.bet));
        }
        if !self.starting_balance.is_finite() || self.starting_balance < 0.0 {
            return Err(Error::config(format!(
                "starting balance must not be negative, got {}",
                self.starting_balance
            )));
        }
        if !self.top_up_amount.is_finite() || self.top_up_amount <= 0.0 {
            return Err(Error::config(format!(
                "top-up amount must be positive, got {}",
                self.top_up_amount
            )));
        }
        if !self.auto_drop_interval_ms.is_finite() || self.auto_drop_interval_ms <= 0.0 {
            return Err(Error::config(format!(
                "auto-drop interval must be positive, got {}",
                self.auto_drop_interval_ms
            )));
        }
        if !self.viewport_width.is_finite() || self.viewport_width <= 0.0 {
            return Err(Error::config(format!(
                "viewport width must be positive, got {}",
                self.viewport_width
            )));
        }
        self.board.validate()?;
        self.physics.validate()
    }

    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!(
                    "Using default settings ({}: {})",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
