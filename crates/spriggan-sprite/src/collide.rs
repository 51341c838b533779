//! Z-order and collision queries over the stage.
//!
//! Collision is a plain AABB overlap test on sprite bounding rectangles.
//! The z-order predicates decide which sprite owns a canvas cell; rendering
//! consults them before every character write and erase, so their tie-break
//! must be deterministic: **among sprites with equal z covering the same
//! point, the first-registered sprite (lowest slot) wins**, for both the
//! topmost and the bottommost query.
//!
//! All queries are O(N) in the number of displayed sprites; a full-frame
//! redraw is O(N^2). That is the system's accepted baseline -- there is no
//! spatial index, and adding one would change observable tie-break ordering.

use crate::sprite::SpriteId;
use crate::stage::Stage;

impl Stage {
    /// Whether sprites `a` and `b` overlap.
    ///
    /// Symmetric. A sprite never collides with itself, and an unregistered
    /// sprite collides with nothing.
    pub fn is_colliding(&self, a: SpriteId, b: SpriteId) -> bool {
        if a == b {
            return false;
        }
        match (self.get(a), self.get(b)) {
            (Some(sa), Some(sb)) => sa.bounds().overlaps(&sb.bounds()),
            _ => false,
        }
    }

    /// All displayed sprites overlapping `id`, in slot order.
    ///
    /// Empty if `id` is not displayed.
    pub fn colliding_with(&self, id: SpriteId) -> Vec<SpriteId> {
        let Some(sprite) = self.get(id) else {
            return Vec::new();
        };
        let bounds = sprite.bounds();
        self.all_displayed()
            .filter_map(|(_, other)| {
                let other_id = other.stable_id()?;
                if other_id == id {
                    return None;
                }
                other.bounds().overlaps(&bounds).then_some(other_id)
            })
            .collect()
    }

    /// Whether `id` is the topmost sprite covering canvas cell `(x, y)`.
    ///
    /// False if the sprite is not displayed or does not cover the point.
    /// Ties on z resolve to the lowest slot.
    pub fn is_topmost_at(&self, id: SpriteId, x: i32, y: i32) -> bool {
        self.wins_at(id, x, y, |other_z, z| other_z > z)
    }

    /// Whether `id` is the bottommost sprite covering canvas cell `(x, y)`.
    ///
    /// Same coverage and tie-break rules as [`Stage::is_topmost_at`].
    pub fn is_bottommost_at(&self, id: SpriteId, x: i32, y: i32) -> bool {
        self.wins_at(id, x, y, |other_z, z| other_z < z)
    }

    /// Whether any displayed sprite other than `id` covers `(x, y)`.
    ///
    /// Erase uses this: a cell still covered by another sprite is left alone.
    pub fn covered_by_other(&self, id: SpriteId, x: i32, y: i32) -> bool {
        self.all_displayed().any(|(_, other)| {
            other.stable_id() != Some(id) && other.bounds().contains(x, y)
        })
    }

    fn wins_at(&self, id: SpriteId, x: i32, y: i32, beats: impl Fn(i32, i32) -> bool) -> bool {
        let Some(slot) = self.slot_of(id) else {
            return false;
        };
        let Some(sprite) = self.get_by_slot(slot) else {
            return false;
        };
        if !sprite.bounds().contains(x, y) {
            return false;
        }
        let z = sprite.z();
        for (other_slot, other) in self.all_displayed() {
            if other_slot == slot || !other.bounds().contains(x, y) {
                continue;
            }
            if beats(other.z(), z) || (other.z() == z && other_slot < slot) {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
