//! Mass and friction ledgers.
//!
//! Both are sparse, stable-id-keyed override tables: absence means "use the
//! computed or configured default", never zero. Overrides survive a
//! sprite's display/undisplay cycles and the backing storage only grows.
//!
//! Friction is deliberately inert: the ledger is fully queryable and
//! mutable, but the tick integrator never reads it. That matches the
//! observed behavior of the system this engine models; completing the
//! feature would change motion for existing callers.

use serde::{Deserialize, Serialize};
use spriggan_sprite::sprite::{Sprite, SpriteId};

use crate::config::CharWeights;
use crate::PhysicsError;

/// The default mass of a sprite: its non-blank cell count, weighted by the
/// per-character weight table.
pub fn default_mass(sprite: &Sprite, weights: &CharWeights) -> f64 {
    sprite
        .grid()
        .cells()
        .map(|(_, _, c, _)| weights.get(c))
        .sum()
}

// ---------------------------------------------------------------------------
// OverrideTable
// ---------------------------------------------------------------------------

/// Sparse per-stable-id scalar overrides. Grow-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct OverrideTable {
    values: Vec<Option<f64>>,
}

impl OverrideTable {
    fn get(&self, id: SpriteId) -> Option<f64> {
        self.values.get(id.to_raw() as usize).copied().flatten()
    }

    fn set(&mut self, id: SpriteId, value: f64) {
        let idx = id.to_raw() as usize;
        if idx >= self.values.len() {
            self.values.resize(idx + 1, None);
        }
        self.values[idx] = Some(value);
    }

    fn reset(&mut self, id: SpriteId) {
        if let Some(slot) = self.values.get_mut(id.to_raw() as usize) {
            *slot = None;
        }
    }
}

// ---------------------------------------------------------------------------
// MassLedger
// ---------------------------------------------------------------------------

/// Per-sprite mass overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MassLedger {
    overrides: OverrideTable,
}

impl MassLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The override for `id`, if one is set.
    pub fn get_override(&self, id: SpriteId) -> Option<f64> {
        self.overrides.get(id)
    }

    /// Override the sprite's mass. Mass must be positive and finite.
    pub fn set(&mut self, id: SpriteId, mass: f64) -> Result<(), PhysicsError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidArgument {
                reason: format!("mass must be positive and finite, got {mass}"),
            });
        }
        self.overrides.set(id, mass);
        Ok(())
    }

    /// Drop the override, reverting to the computed default.
    pub fn reset(&mut self, id: SpriteId) {
        self.overrides.reset(id);
    }

    /// The sprite's effective mass: override, or the weighted default.
    pub fn resolve(&self, id: SpriteId, sprite: &Sprite, weights: &CharWeights) -> f64 {
        self.get_override(id)
            .unwrap_or_else(|| default_mass(sprite, weights))
    }
}

// ---------------------------------------------------------------------------
// FrictionLedger
// ---------------------------------------------------------------------------

/// Per-sprite friction coefficient overrides.
///
/// Values live in `[0, 1]`. Stored and queryable, but not consumed by the
/// integrator -- see the module docs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrictionLedger {
    overrides: OverrideTable,
}

impl FrictionLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The override for `id`, if one is set.
    pub fn get_override(&self, id: SpriteId) -> Option<f64> {
        self.overrides.get(id)
    }

    /// Override the sprite's friction coefficient. Must be in `[0, 1]`.
    pub fn set(&mut self, id: SpriteId, friction: f64) -> Result<(), PhysicsError> {
        if !friction.is_finite() || !(0.0..=1.0).contains(&friction) {
            return Err(PhysicsError::InvalidArgument {
                reason: format!("friction must be in [0, 1], got {friction}"),
            });
        }
        self.overrides.set(id, friction);
        Ok(())
    }

    /// Drop the override, reverting to the configured default.
    pub fn reset(&mut self, id: SpriteId) {
        self.overrides.reset(id);
    }

    /// The sprite's effective friction: override or the configured default.
    pub fn resolve(&self, id: SpriteId, default: f64) -> f64 {
        self.get_override(id).unwrap_or(default)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
