//! The motion ledger: per-slot velocity, acceleration, and leftover carry.
//!
//! Rows are slot-keyed and dense, parallel to the stage's displayed list:
//! row `i` belongs to the sprite at slot `i + 1`. The engine creates a
//! zeroed row ("at rest") on display and calls [`MotionLedger::remove_slot`]
//! with the vacated index reported by `Stage::unregister`, in the same pass,
//! so the two tables can never desync.
//!
//! The leftover accumulators persist sub-integer displacement across ticks:
//! a velocity of 0.3 cells/tick moves one real cell every fourth tick
//! instead of rounding to zero forever.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MotionState
// ---------------------------------------------------------------------------

/// Velocity, acceleration, and fractional carry for one sprite.
///
/// `vy`/`ay` are up-positive; the integrator inverts the vertical axis when
/// repositioning, since rows grow downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionState {
    /// Horizontal velocity, cells per tick.
    pub vx: f64,
    /// Vertical velocity, cells per tick, up-positive.
    pub vy: f64,
    /// Horizontal acceleration, added to velocity every tick.
    pub ax: f64,
    /// Vertical acceleration, added to velocity every tick.
    pub ay: f64,
    /// Fractional horizontal displacement carried across ticks.
    pub leftover_x: f64,
    /// Fractional vertical displacement carried across ticks.
    pub leftover_y: f64,
}

impl MotionState {
    /// Whether every field is zero (the "at rest" state).
    pub fn is_at_rest(&self) -> bool {
        *self == MotionState::default()
    }
}

// ---------------------------------------------------------------------------
// MotionLedger
// ---------------------------------------------------------------------------

/// Dense slot-keyed motion rows, compacted in lockstep with the stage.
#[derive(Debug, Default)]
pub struct MotionLedger {
    rows: Vec<MotionState>,
}

impl MotionLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an at-rest row for a newly displayed sprite.
    pub fn push_row(&mut self) {
        self.rows.push(MotionState::default());
    }

    /// Remove the row at the vacated dense index, shifting later rows down.
    /// Must be called in the same pass as the stage compaction.
    pub fn remove_slot(&mut self, index: usize) {
        debug_assert!(index < self.rows.len(), "motion ledger desynced from stage");
        if index < self.rows.len() {
            self.rows.remove(index);
        }
    }

    /// The row at dense index `index`.
    pub fn get(&self, index: usize) -> Option<&MotionState> {
        self.rows.get(index)
    }

    /// Mutable access to the row at dense index `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut MotionState> {
        self.rows.get_mut(index)
    }

    /// Number of rows. Always equals the stage's displayed count.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the ledger has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in slot order.
    pub fn rows(&self) -> &[MotionState] {
        &self.rows
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
