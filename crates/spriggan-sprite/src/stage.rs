//! The [`Stage`] owns the canonical list of currently displayed sprites.
//!
//! Sprites live in a dense vector; the 1-based *slot* of a sprite is its
//! vector index plus one. Removal shifts every later sprite down one
//! position, so slots are always contiguous `1..=N` with no gaps. Side
//! tables keyed by slot must compact in the same pass -- [`Stage::unregister`]
//! reports the vacated dense index for exactly that purpose.
//!
//! Stable [`SpriteId`]s are allocated here from a monotonic counter and are
//! never reused, even after the sprite is removed.

use tracing::debug;

use crate::sprite::{Sprite, SpriteId};
use crate::SpriteError;

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// Transient, 1-based position of a sprite in the displayed list.
///
/// Valid only while the sprite stays displayed; compaction on removal
/// reassigns the slots of every sprite registered after the removed one.
/// Deliberately not serializable: a slot is meaningless outside the stage
/// that issued it, and the internal representation must stay nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(u32);

impl Slot {
    /// The 1-based slot number.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// The dense vector index (`slot - 1`).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Registry of currently displayed sprites.
#[derive(Debug, Default)]
pub struct Stage {
    /// Dense displayed list; index = slot - 1.
    sprites: Vec<Sprite>,
    /// Next stable id to issue. Doubles as the count of ids ever issued.
    next_stable: u64,
}

impl Stage {
    /// Create an empty stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sprite, appending it to the displayed list.
    ///
    /// The new slot is always `count + 1`. A stable id is assigned only if
    /// the sprite has never been registered before; a sprite that persisted
    /// across an earlier unregister keeps its original id.
    ///
    /// Fails with [`SpriteError::InvalidArgument`] if the sprite's grid has
    /// no non-blank cells to draw, or if the sprite is already displayed.
    /// No partial state is created on failure.
    pub fn register(&mut self, mut sprite: Sprite) -> Result<Slot, SpriteError> {
        if sprite.grid().non_blank_count() == 0 {
            return Err(SpriteError::InvalidArgument {
                reason: "sprite has no drawable cells".to_owned(),
            });
        }
        if let Some(id) = sprite.stable_id() {
            if self.slot_of(id).is_some() {
                return Err(SpriteError::InvalidArgument {
                    reason: format!("sprite {id} is already displayed"),
                });
            }
        }
        let id = match sprite.stable_id() {
            Some(id) => id,
            None => {
                let id = SpriteId::from_raw(self.next_stable);
                self.next_stable += 1;
                sprite.assign_stable_id(id);
                id
            }
        };
        self.sprites.push(sprite);
        let slot = Slot::from_index(self.sprites.len() - 1);
        debug!(sprite = %id, slot = slot.get(), "registered sprite");
        Ok(slot)
    }

    /// Unregister a sprite by stable id.
    ///
    /// Every sprite with a higher slot shifts down one position (their slots
    /// decrement implicitly, since slots are derived from the dense index).
    /// Returns the removed sprite -- which keeps its stable id and may be
    /// re-registered later -- together with the vacated dense index, so that
    /// slot-keyed side tables can compact in the same pass.
    pub fn unregister(&mut self, id: SpriteId) -> Result<(Sprite, usize), SpriteError> {
        let slot = self.slot_of(id).ok_or(SpriteError::NotRegistered)?;
        let idx = slot.index();
        let sprite = self.sprites.remove(idx);
        debug!(sprite = %id, vacated = idx, remaining = self.sprites.len(), "unregistered sprite");
        Ok((sprite, idx))
    }

    /// The sprite at `slot`, if that slot is currently occupied.
    pub fn get_by_slot(&self, slot: Slot) -> Option<&Sprite> {
        self.sprites.get(slot.index())
    }

    /// The sprite with stable id `id`, if currently displayed.
    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.stable_id() == Some(id))
    }

    /// Mutable access to the sprite with stable id `id`.
    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.iter_mut().find(|s| s.stable_id() == Some(id))
    }

    /// The current slot of the sprite with stable id `id`.
    pub fn slot_of(&self, id: SpriteId) -> Option<Slot> {
        self.sprites
            .iter()
            .position(|s| s.stable_id() == Some(id))
            .map(Slot::from_index)
    }

    /// All displayed sprites in slot order.
    pub fn all_displayed(&self) -> impl Iterator<Item = (Slot, &Sprite)> {
        self.sprites
            .iter()
            .enumerate()
            .map(|(i, s)| (Slot::from_index(i), s))
    }

    /// Number of displayed sprites.
    #[inline]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// Whether no sprites are displayed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Total number of stable ids ever issued. Stable-id-keyed ledgers size
    /// their backing storage against this; it only grows.
    #[inline]
    pub fn ids_issued(&self) -> u64 {
        self.next_stable
    }

    /// Whether `id` was ever issued by this stage.
    #[inline]
    pub fn id_known(&self, id: SpriteId) -> bool {
        id.to_raw() < self.next_stable
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
