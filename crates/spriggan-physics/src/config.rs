//! Engine configuration.
//!
//! All knobs the integrator and the tick runner read live in one explicit
//! [`PhysicsConfig`] value owned by the engine -- there is no process-wide
//! mutable configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CharWeights
// ---------------------------------------------------------------------------

/// Per-character mass weights consulted by the default-mass computation.
///
/// Characters without an explicit entry weigh 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharWeights {
    weights: HashMap<char, f64>,
}

impl CharWeights {
    /// An empty table: every character weighs 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// The weight of `c`.
    pub fn get(&self, c: char) -> f64 {
        self.weights.get(&c).copied().unwrap_or(1.0)
    }

    /// Set the weight of `c`. Returns `false` (and changes nothing) for
    /// non-finite or negative weights.
    pub fn set(&mut self, c: char, weight: f64) -> bool {
        if !weight.is_finite() || weight < 0.0 {
            return false;
        }
        self.weights.insert(c, weight);
        true
    }

    /// Remove the explicit weight for `c`, reverting it to 1.
    pub fn reset(&mut self, c: char) {
        self.weights.remove(&c);
    }
}

// ---------------------------------------------------------------------------
// PhysicsConfig
// ---------------------------------------------------------------------------

/// Configuration for the physics engine and tick runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Tick frequency for the background runner, in ticks per second.
    pub ticks_per_second: u32,
    /// Maximum magnitude of vertical velocity after each tick's clamp.
    pub terminal_velocity: f64,
    /// Row the ground sits at. `None` means the bottom of the canvas.
    /// A sprite's top row never exceeds `ground - height`.
    pub ground: Option<u32>,
    /// Default friction coefficient in `[0, 1]` for sprites without an
    /// override. Tracked per sprite but not consumed by the integrator;
    /// see [`FrictionLedger`](crate::mass::FrictionLedger).
    pub default_friction: f64,
    /// Per-character mass weights for the default-mass computation.
    pub char_weights: CharWeights,
    /// Print per-sprite physics state to a fixed display location each tick.
    pub debug_overlay: bool,
}

impl Default for PhysicsConfig {
    /// 60 ticks/second, terminal velocity 10, ground at the canvas bottom,
    /// frictionless default, no debug overlay.
    fn default() -> Self {
        Self {
            ticks_per_second: 60,
            terminal_velocity: 10.0,
            ground: None,
            default_friction: 0.0,
            char_weights: CharWeights::new(),
            debug_overlay: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_char_weighs_one() {
        let w = CharWeights::new();
        assert_eq!(w.get('x'), 1.0);
    }

    #[test]
    fn set_and_reset_weight() {
        let mut w = CharWeights::new();
        assert!(w.set('#', 2.5));
        assert_eq!(w.get('#'), 2.5);
        w.reset('#');
        assert_eq!(w.get('#'), 1.0);
    }

    #[test]
    fn invalid_weights_rejected() {
        let mut w = CharWeights::new();
        assert!(!w.set('#', -1.0));
        assert!(!w.set('#', f64::NAN));
        assert_eq!(w.get('#'), 1.0);
    }

    #[test]
    fn default_config_values() {
        let cfg = PhysicsConfig::default();
        assert_eq!(cfg.ticks_per_second, 60);
        assert_eq!(cfg.terminal_velocity, 10.0);
        assert_eq!(cfg.ground, None);
        assert!(!cfg.debug_overlay);
    }
}
