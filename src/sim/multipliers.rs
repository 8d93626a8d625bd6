//! Slot multiplier table
//!
//! Edge slots always pay `EDGE_MULTIPLIER`; inner slot `i` pays
//! `MULTIPLIER_PATTERN[i % 30]`.

use serde::{Deserialize, Serialize};

use crate::consts::{EDGE_MULTIPLIER, MULTIPLIER_PATTERN};

/// Ordered multipliers, slot 0 on the left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTable {
    values: Vec<f64>,
}

impl MultiplierTable {
    /// Generate the table for a board with `row_count` slots
    pub fn generate(row_count: u32) -> Self {
        let len = row_count as usize;
        let values = (0..len)
            .map(|i| {
                if i == 0 || i == len - 1 {
                    EDGE_MULTIPLIER
                } else {
                    MULTIPLIER_PATTERN[i % MULTIPLIER_PATTERN.len()]
                }
            })
            .collect();
        Self { values }
    }

    /// Table with explicit values (custom layouts and tests)
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn get(&self, slot_index: usize) -> Option<f64> {
        self.values.get(slot_index).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Payout band of a multiplier, for highlighting wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MultiplierTier {
    Low,
    High,
    Jackpot,
}

impl MultiplierTier {
    pub fn of(multiplier: f64) -> Self {
        if multiplier >= 5.0 {
            MultiplierTier::Jackpot
        } else if multiplier >= 2.0 {
            MultiplierTier::High
        } else {
            MultiplierTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MultiplierTier::Low => "low",
            MultiplierTier::High => "high",
            MultiplierTier::Jackpot => "jackpot",
        }
    }
}
