//! Slot landing resolution and payout

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::multipliers::MultiplierTable;

/// Terminal result of a drop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Scored {
        slot_index: usize,
        multiplier: f64,
        payout: f64,
    },
    /// Ball landed outside the slot band and pays nothing
    NoScore,
}

impl Outcome {
    #[inline]
    pub fn payout(&self) -> f64 {
        match self {
            Outcome::Scored { payout, .. } => *payout,
            Outcome::NoScore => 0.0,
        }
    }

    #[inline]
    pub fn is_scored(&self) -> bool {
        matches!(self, Outcome::Scored { .. })
    }
}

/// Map a landing position to a slot and compute the payout
pub fn resolve(board: &Board, table: &MultiplierTable, landing_x: f32, wager: f64) -> Outcome {
    let Some(slot_index) = board.slot_index_at(landing_x) else {
        return Outcome::NoScore;
    };
    match table.get(slot_index) {
        Some(multiplier) => Outcome::Scored {
            slot_index,
            multiplier,
            payout: wager * multiplier,
        },
        None => Outcome::NoScore,
    }
}
