//! Sprite identity and geometry.
//!
//! A [`Sprite`] is a positioned, z-ordered character grid. It is constructed
//! detached: no identifiers, no ledger rows. On first successful registration
//! with a [`Stage`](crate::stage::Stage) it is assigned a [`SpriteId`] -- a
//! stable identifier that is monotonically increasing, never reused within a
//! process, and sticks to the sprite across display/undisplay cycles. The
//! transient *slot* lives on the stage, not on the sprite.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::CharGrid;

// ---------------------------------------------------------------------------
// SpriteId
// ---------------------------------------------------------------------------

/// Stable sprite identifier.
///
/// Assigned once, at first registration, from a monotonic counter. Unlike a
/// slot it is never recycled, which makes it safe to key long-lived side
/// tables (forces, mass, friction) that must survive undisplay.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(u64);

impl SpriteId {
    /// Raw `u64` representation (also the dense ledger index).
    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0
    }

    /// Reconstruct from a raw `u64`.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpriteId({})", self.0)
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// Axis-aligned cell rectangle: position plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left column.
    pub x: i32,
    /// Top row.
    pub y: i32,
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
}

impl Rect {
    /// Whether two rectangles overlap (strict AABB test, touching edges do
    /// not count).
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width as i32
            && other.x < self.x + self.width as i32
            && self.y < other.y + other.height as i32
            && other.y < self.y + self.height as i32
    }

    /// Whether the rectangle covers the cell `(x, y)`.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && x < self.x + self.width as i32
            && y >= self.y
            && y < self.y + self.height as i32
    }

    /// The rectangle shifted by `(dx, dy)`.
    pub fn shifted(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

// ---------------------------------------------------------------------------
// Sprite
// ---------------------------------------------------------------------------

/// A movable, z-ordered character-grid entity.
///
/// Size comes from the backing [`CharGrid`]. Higher `z` occludes lower `z`
/// at overlapping cells. A sprite flagged static is skipped by the physics
/// tick but still rendered and collided against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    x: i32,
    y: i32,
    z: i32,
    grid: CharGrid,
    is_static: bool,
    stable_id: Option<SpriteId>,
}

impl Sprite {
    /// Construct a detached sprite at `(x, y)` with draw priority `z`.
    pub fn new(x: i32, y: i32, z: i32, grid: CharGrid) -> Self {
        Self {
            x,
            y,
            z,
            grid,
            is_static: false,
            stable_id: None,
        }
    }

    /// Left column on the canvas.
    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Top row on the canvas.
    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Draw priority. Higher values occlude lower values.
    #[inline]
    pub fn z(&self) -> i32 {
        self.z
    }

    /// Set the draw priority.
    pub fn set_z(&mut self, z: i32) {
        self.z = z;
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// The sprite's canvas-space bounding rectangle.
    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.grid.width(),
            height: self.grid.height(),
        }
    }

    /// Move the top-left corner to `(x, y)`. Does not touch any display;
    /// callers that need redraw go through
    /// [`render::move_sprite`](crate::render::move_sprite).
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// The backing character grid.
    #[inline]
    pub fn grid(&self) -> &CharGrid {
        &self.grid
    }

    /// Mutable access to the backing grid.
    pub fn grid_mut(&mut self) -> &mut CharGrid {
        &mut self.grid
    }

    /// Whether the physics tick skips this sprite.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Include or exclude this sprite from physics tick processing.
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
    }

    /// The stable identifier, if this sprite has ever been registered.
    #[inline]
    pub fn stable_id(&self) -> Option<SpriteId> {
        self.stable_id
    }

    pub(crate) fn assign_stable_id(&mut self, id: SpriteId) {
        debug_assert!(self.stable_id.is_none(), "stable id assigned twice");
        self.stable_id = Some(id);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(w: u32, h: u32) -> CharGrid {
        CharGrid::new(w, h, '#').unwrap()
    }

    #[test]
    fn new_sprite_is_detached() {
        let s = Sprite::new(1, 2, 3, grid(2, 2));
        assert_eq!(s.stable_id(), None);
        assert!(!s.is_static());
        assert_eq!(s.bounds(), Rect { x: 1, y: 2, width: 2, height: 2 });
    }

    #[test]
    fn rect_overlap_is_strict() {
        let a = Rect { x: 0, y: 0, width: 2, height: 2 };
        let b = Rect { x: 2, y: 0, width: 2, height: 2 }; // edge-adjacent
        let c = Rect { x: 1, y: 1, width: 2, height: 2 };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn rect_contains_boundary() {
        let r = Rect { x: 1, y: 1, width: 2, height: 2 };
        assert!(r.contains(1, 1));
        assert!(r.contains(2, 2));
        assert!(!r.contains(3, 2));
        assert!(!r.contains(0, 1));
    }

    #[test]
    fn shifted_moves_origin_only() {
        let r = Rect { x: 1, y: 1, width: 4, height: 2 };
        let s = r.shifted(-1, 3);
        assert_eq!(s, Rect { x: 0, y: 4, width: 4, height: 2 });
    }

    #[test]
    fn sprite_id_roundtrip() {
        let id = SpriteId::from_raw(7);
        assert_eq!(id.to_raw(), 7);
        assert_eq!(format!("{id}"), "#7");
    }

    #[test]
    fn serde_roundtrip() {
        let s = Sprite::new(4, 5, 1, grid(3, 1));
        let json = serde_json::to_string(&s).unwrap();
        let back: Sprite = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
