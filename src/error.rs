//! Error types for board building, drops and settings

use thiserror::Error;

/// Result type alias for Plinko Drop operations
pub type Result<T> = std::result::Result<T, Error>;

/// Plinko Drop error types
#[derive(Debug, Error)]
pub enum Error {
    /// Bad row count, viewport or tuning value; the previous board stays active
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Wager was zero, negative or not a number; nothing was mutated
    #[error("Invalid wager: {0}")]
    InvalidWager(f64),

    #[error("Insufficient funds: balance {balance:.2}, wager {wager:.2}")]
    InsufficientFunds { balance: f64, wager: f64 },

    /// Physics state became unusable mid-flight; the ball is discarded
    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings format error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }

    pub fn simulation(msg: impl Into<String>) -> Self {
        Error::Simulation(msg.into())
    }
}
