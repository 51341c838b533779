//! Spriggan sprite core -- character-grid sprites with slot/stable identity.
//!
//! This crate owns the sprite data model and the registry invariants the
//! rest of the engine depends on:
//!
//! - [`CharGrid`](grid::CharGrid): rectangular character bodies with
//!   per-cell format codes.
//! - [`Stage`](stage::Stage): the dense displayed-sprite list. Slots are
//!   1-based and gapless; removal compacts in a single pass and reports the
//!   vacated index so slot-keyed side tables stay in lockstep. Stable
//!   [`SpriteId`](sprite::SpriteId)s are monotonic and never reused.
//! - Z-order and collision queries ([`collide`]) with a documented
//!   first-registered tie-break.
//! - The [`Display`](display::Display) collaborator seam and the compositing
//!   renderer ([`render`]) that consults the resolver before every write.
//!
//! # Quick Start
//!
//! ```
//! use spriggan_sprite::prelude::*;
//!
//! let mut stage = Stage::new();
//! let mut display = MemoryDisplay::new(20, 5);
//!
//! let ball = Sprite::new(2, 1, 1, CharGrid::from_rows(&["o"]).unwrap());
//! let slot = stage.register(ball).unwrap();
//! let id = stage.get_by_slot(slot).unwrap().stable_id().unwrap();
//!
//! render::draw_sprite(&stage, &mut display, id).unwrap();
//! assert_eq!(display.char_at(2, 1), Some('o'));
//! ```

pub mod collide;
pub mod display;
pub mod grid;
pub mod render;
pub mod sprite;
pub mod stage;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by sprite and stage operations.
#[derive(Debug, thiserror::Error)]
pub enum SpriteError {
    /// Empty grid, non-positive dimension, or similar bad input. The
    /// operation was a no-op.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the input.
        reason: String,
    },

    /// The operation requires a currently displayed sprite.
    #[error("sprite is not registered on the stage")]
    NotRegistered,

    /// A cell coordinate outside the sprite's own grid. A hard failure, not
    /// a clamp.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::display::{Display, MemoryDisplay};
    pub use crate::grid::CharGrid;
    pub use crate::render;
    pub use crate::sprite::{Rect, Sprite, SpriteId};
    pub use crate::stage::{Slot, Stage};
    pub use crate::SpriteError;
}
