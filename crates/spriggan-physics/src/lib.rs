//! Spriggan physics -- ledgered forces, mass, and a discrete tick integrator
//! for character-grid sprites.
//!
//! Built on [`spriggan_sprite`], this crate adds the moving parts:
//!
//! - [`ForceLedger`](force::ForceLedger): per-sprite applied forces behind
//!   opaque [`ForceHandle`](force::ForceHandle)s, keyed by stable id so they
//!   survive undisplay.
//! - [`MassLedger`](mass::MassLedger) / [`FrictionLedger`](mass::FrictionLedger):
//!   sparse overrides over computed or configured defaults.
//! - [`MotionLedger`](motion::MotionLedger): slot-keyed velocity,
//!   acceleration, and fractional leftover carry, compacted in lockstep with
//!   the stage.
//! - [`plan_step`](tick::plan_step): the pure per-sprite integrator, with
//!   terminal-velocity, wall, ceiling, and ground clamps.
//! - [`PhysicsEngine`](engine::PhysicsEngine): the facade that keeps all of
//!   the above consistent and advances ticks (plans computed in parallel,
//!   applied in slot order).
//! - [`EngineHandle`](runner::EngineHandle) / [`TickRunner`](runner::TickRunner):
//!   shared-lock access, timed forces, and a fixed-rate background tick loop.
//!
//! # Quick Start
//!
//! ```
//! use spriggan_physics::prelude::*;
//! use spriggan_sprite::prelude::*;
//!
//! let mut engine = PhysicsEngine::new(PhysicsConfig::default());
//! let mut display = MemoryDisplay::new(40, 12);
//!
//! let ball = Sprite::new(10, 2, 1, CharGrid::from_rows(&["o"]).unwrap());
//! let id = engine.display_sprite(ball, &mut display).unwrap();
//!
//! // Constant downward acceleration, one cell per tick squared.
//! engine.set_acceleration(id, 0.0, -1.0).unwrap();
//! engine.tick(&mut display);
//! assert_eq!(engine.stage().get(id).unwrap().y(), 3);
//! ```

pub mod config;
pub mod engine;
pub mod force;
pub mod mass;
pub mod motion;
pub mod runner;
pub mod tick;

use spriggan_sprite::SpriteError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by physics operations.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    /// Non-finite or out-of-range numeric input. The operation was a no-op.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the input.
        reason: String,
    },

    /// The sprite is unknown to the engine, or the operation requires it to
    /// be currently displayed.
    #[error("sprite is not registered with the engine")]
    NotRegistered,

    /// An underlying sprite or stage operation failed.
    #[error(transparent)]
    Sprite(#[from] SpriteError),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::{CharWeights, PhysicsConfig};
    pub use crate::engine::PhysicsEngine;
    pub use crate::force::{ForceHandle, Vec2};
    pub use crate::motion::MotionState;
    pub use crate::runner::{EngineHandle, TickRunner};
    pub use crate::tick::{StepPlan, TickBounds};
    pub use crate::PhysicsError;
}
