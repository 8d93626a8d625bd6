//! Board geometry: peg triangle, side borders and slot band
//!
//! A board is built once per row count and never mutated afterwards. Changing
//! the row count builds a fresh board.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Geometry tuning shared by every board layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Distance between neighbouring pegs, both horizontally and vertically
    pub peg_spacing: f32,
    /// Vertical offset of the first peg row
    pub start_y: f32,
    pub border_radius: f32,
    pub peg_radius: f32,
    pub ball_radius: f32,
    pub slot_width: f32,
    /// Gap between the last peg row and the floor
    pub floor_offset: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            peg_spacing: PEG_SPACING,
            start_y: START_Y,
            border_radius: BORDER_RADIUS,
            peg_radius: PEG_RADIUS,
            ball_radius: BALL_RADIUS,
            slot_width: SLOT_WIDTH,
            floor_offset: FLOOR_OFFSET,
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("peg_spacing", self.peg_spacing),
            ("peg_radius", self.peg_radius),
            ("ball_radius", self.ball_radius),
            ("slot_width", self.slot_width),
            ("floor_offset", self.floor_offset),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::config(format!("{name} must be positive, got {value}")));
            }
        }
        for (name, value) in [("start_y", self.start_y), ("border_radius", self.border_radius)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::config(format!("{name} must not be negative, got {value}")));
            }
        }
        Ok(())
    }

    /// Center distance below which ball and peg touch
    #[inline]
    pub fn collision_distance(&self) -> f32 {
        self.peg_radius + self.ball_radius
    }
}

/// A fixed peg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub pos: Vec2,
    pub row: u32,
    pub col: u32,
}

/// Horizontal positions of the two side borders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Borders {
    pub left: f32,
    pub right: f32,
}

/// Immutable board layout for one row count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub row_count: u32,
    pub viewport_width: f32,
    pub config: BoardConfig,
    /// Pegs in row-major order (top row first, left to right)
    pub pegs: Vec<Peg>,
    pub borders: Borders,
    /// Left edge of slot 0
    pub start_slot_x: f32,
    /// Floor height; balls below `height - ball_radius` have landed
    pub height: f32,
}

impl Board {
    /// Build a board with default geometry
    pub fn build(row_count: u32, viewport_width: f32) -> Result<Self> {
        Self::build_with(row_count, viewport_width, BoardConfig::default())
    }

    /// Build a board with custom geometry
    pub fn build_with(row_count: u32, viewport_width: f32, config: BoardConfig) -> Result<Self> {
        if !(MIN_ROWS..=MAX_ROWS).contains(&row_count) {
            return Err(Error::config(format!(
                "row count {row_count} outside {MIN_ROWS}..={MAX_ROWS}"
            )));
        }
        if !viewport_width.is_finite() || viewport_width <= 0.0 {
            return Err(Error::config(format!(
                "viewport width must be positive, got {viewport_width}"
            )));
        }
        config.validate()?;

        let spacing = config.peg_spacing;
        let center_x = viewport_width / 2.0;

        // Widest row has row_count + 2 pegs
        let last_row_pegs = row_count + 2;
        let grid_width = spacing * (last_row_pegs - 1) as f32;
        let borders = Borders {
            left: center_x - grid_width / 2.0 - config.border_radius,
            right: center_x + grid_width / 2.0 + config.border_radius,
        };

        let peg_total: u32 = (0..row_count).map(|row| row + 3).sum();
        let mut pegs = Vec::with_capacity(peg_total as usize);
        for row in 0..row_count {
            let pegs_in_row = row + 3;
            let row_x = center_x - spacing * (pegs_in_row - 1) as f32 / 2.0;
            let y = config.start_y + row as f32 * spacing;
            for col in 0..pegs_in_row {
                pegs.push(Peg {
                    pos: Vec2::new(row_x + col as f32 * spacing, y),
                    row,
                    col,
                });
            }
        }

        let slots_total_width = row_count as f32 * config.slot_width;
        let start_slot_x = (viewport_width - slots_total_width) / 2.0;
        let height = config.start_y + (row_count - 1) as f32 * spacing + config.floor_offset;

        Ok(Self {
            row_count,
            viewport_width,
            config,
            pegs,
            borders,
            start_slot_x,
            height,
        })
    }

    /// One slot per row
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.row_count as usize
    }

    /// Half-open `[x_min, x_max)` span of a slot
    pub fn slot_bounds(&self, index: usize) -> Option<(f32, f32)> {
        if index >= self.slot_count() {
            return None;
        }
        let width = self.config.slot_width;
        let x_min = self.start_slot_x + index as f32 * width;
        Some((x_min, x_min + width))
    }

    /// Slot under a horizontal position, if it falls inside the slot band
    pub fn slot_index_at(&self, x: f32) -> Option<usize> {
        let index = ((x - self.start_slot_x) / self.config.slot_width).floor();
        if !index.is_finite() || index < 0.0 || index >= self.slot_count() as f32 {
            return None;
        }
        Some(index as usize)
    }

    /// Horizontal limits for the ball center
    #[inline]
    pub fn wall_bounds(&self) -> (f32, f32) {
        (
            self.borders.left + self.config.border_radius,
            self.borders.right - self.config.border_radius,
        )
    }

    /// Ball center height past which the ball has landed
    #[inline]
    pub fn landing_y(&self) -> f32 {
        self.height - self.config.ball_radius
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.viewport_width / 2.0
    }
}
