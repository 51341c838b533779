//! The force ledger: per-sprite collections of applied force vectors.
//!
//! Keyed by stable [`SpriteId`], so forces survive a sprite's
//! display/undisplay cycles. The backing table grows on demand and never
//! shrinks below the highest id issued. Removal is by opaque
//! [`ForceHandle`] rather than value or pointer identity: two equal vectors
//! added twice are two distinct forces.

use std::ops::Add;

use serde::{Deserialize, Serialize};
use spriggan_sprite::sprite::SpriteId;
use tracing::trace;

// ---------------------------------------------------------------------------
// Vec2
// ---------------------------------------------------------------------------

/// A 2D integer force vector. `y` is up-positive, matching velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: i32,
    /// Vertical component, up-positive.
    pub y: i32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0, y: 0 };

    /// Construct from components.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

// ---------------------------------------------------------------------------
// ForceHandle
// ---------------------------------------------------------------------------

/// Opaque handle identifying one applied force for later removal.
///
/// Handles are unique across the ledger's lifetime; removing a force
/// invalidates its handle and a second removal reports `false` rather than
/// failing, which is what lets a timed force's auto-removal tolerate the
/// force having already been removed manually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForceHandle(u64);

// ---------------------------------------------------------------------------
// ForceLedger
// ---------------------------------------------------------------------------

/// Grow-only table of force lists, indexed by stable sprite id.
#[derive(Debug, Default)]
pub struct ForceLedger {
    /// One force list per stable id; index = raw id.
    rows: Vec<Vec<(ForceHandle, Vec2)>>,
    next_handle: u64,
}

impl ForceLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn row_mut(&mut self, id: SpriteId) -> &mut Vec<(ForceHandle, Vec2)> {
        let idx = id.to_raw() as usize;
        if idx >= self.rows.len() {
            self.rows.resize_with(idx + 1, Vec::new);
        }
        &mut self.rows[idx]
    }

    fn row(&self, id: SpriteId) -> &[(ForceHandle, Vec2)] {
        self.rows
            .get(id.to_raw() as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Apply `force` to the sprite, returning a handle for removal.
    pub fn add(&mut self, id: SpriteId, force: Vec2) -> ForceHandle {
        let handle = ForceHandle(self.next_handle);
        self.next_handle += 1;
        self.row_mut(id).push((handle, force));
        trace!(sprite = %id, ?force, "added force");
        handle
    }

    /// Remove the force identified by `handle` from the sprite's list.
    ///
    /// Returns `false` if the force was already removed.
    pub fn remove(&mut self, id: SpriteId, handle: ForceHandle) -> bool {
        let row = self.row_mut(id);
        let before = row.len();
        row.retain(|(h, _)| *h != handle);
        before != row.len()
    }

    /// Remove every force applied to the sprite.
    pub fn remove_all(&mut self, id: SpriteId) {
        self.row_mut(id).clear();
    }

    /// The net force on the sprite: a fresh sum, never a live reference.
    /// Zero if no forces are applied.
    pub fn net(&self, id: SpriteId) -> Vec2 {
        self.row(id)
            .iter()
            .fold(Vec2::ZERO, |acc, &(_, f)| acc + f)
    }

    /// All forces currently applied to the sprite, in application order.
    pub fn all(&self, id: SpriteId) -> Vec<Vec2> {
        self.row(id).iter().map(|&(_, f)| f).collect()
    }

    /// Number of forces currently applied to the sprite.
    pub fn count(&self, id: SpriteId) -> usize {
        self.row(id).len()
    }

    /// Drop every force for every sprite. The table itself keeps its size;
    /// stable-id-keyed storage never shrinks.
    pub fn clear_all(&mut self) {
        for row in &mut self.rows {
            row.clear();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
