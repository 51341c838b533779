//! Compositing renderer: draw, erase, and move sprites on a [`Display`].
//!
//! Correctness hangs entirely on the z-order resolver being consulted before
//! every write and erase:
//!
//! - drawing skips blank cells, cells off the canvas, and cells where the
//!   sprite is not topmost (occluded cells stay untouched);
//! - erasing skips cells still covered by any other displayed sprite.
//!
//! Moving a sprite is erase-then-redraw; there is no damage tracking beyond
//! the two rectangles involved.

use tracing::trace;

use crate::display::Display;
use crate::sprite::SpriteId;
use crate::stage::Stage;
use crate::SpriteError;

/// Draw a displayed sprite onto `display`, row-major, honoring occlusion.
pub fn draw_sprite(
    stage: &Stage,
    display: &mut dyn Display,
    id: SpriteId,
) -> Result<(), SpriteError> {
    let sprite = stage.get(id).ok_or(SpriteError::NotRegistered)?;
    let (sx, sy) = (sprite.x(), sprite.y());
    for (cx, cy, c, fmt) in sprite.grid().cells() {
        let x = sx + cx as i32;
        let y = sy + cy as i32;
        if x < 0 || y < 0 || x as u32 >= display.width() || y as u32 >= display.height() {
            continue;
        }
        if !stage.is_topmost_at(id, x, y) {
            continue;
        }
        display.set_cursor(x as u32, y as u32);
        if let Some(code) = fmt {
            display.apply_format(code);
        }
        display.put_char(c);
        if fmt.is_some() {
            display.reset_format();
        }
    }
    trace!(sprite = %id, x = sx, y = sy, "drew sprite");
    Ok(())
}

/// Erase a displayed sprite's cells from `display`.
///
/// A cell still covered by another displayed sprite is left alone; the
/// caller is expected to redraw that sprite if it was occluded.
pub fn erase_sprite(
    stage: &Stage,
    display: &mut dyn Display,
    id: SpriteId,
) -> Result<(), SpriteError> {
    let sprite = stage.get(id).ok_or(SpriteError::NotRegistered)?;
    let (sx, sy) = (sprite.x(), sprite.y());
    for (cx, cy, _, _) in sprite.grid().cells() {
        let x = sx + cx as i32;
        let y = sy + cy as i32;
        if x < 0 || y < 0 || x as u32 >= display.width() || y as u32 >= display.height() {
            continue;
        }
        if stage.covered_by_other(id, x, y) {
            continue;
        }
        display.set_cursor(x as u32, y as u32);
        display.put_char(' ');
    }
    trace!(sprite = %id, "erased sprite");
    Ok(())
}

/// Move a displayed sprite by `(dx, dy)` cells: erase, reposition, redraw.
///
/// Cells of lower-z sprites uncovered by the move are redrawn.
pub fn move_sprite(
    stage: &mut Stage,
    display: &mut dyn Display,
    id: SpriteId,
    dx: i32,
    dy: i32,
) -> Result<(), SpriteError> {
    if dx == 0 && dy == 0 {
        return Ok(());
    }
    erase_sprite(stage, display, id)?;
    let old_bounds = {
        let sprite = stage.get_mut(id).ok_or(SpriteError::NotRegistered)?;
        let bounds = sprite.bounds();
        sprite.set_position(bounds.x + dx, bounds.y + dy);
        bounds
    };
    // Sprites that were occluded under the old rectangle may own cells now.
    let uncovered: Vec<SpriteId> = stage
        .all_displayed()
        .filter_map(|(_, s)| {
            let sid = s.stable_id()?;
            (sid != id && s.bounds().overlaps(&old_bounds)).then_some(sid)
        })
        .collect();
    for other in uncovered {
        draw_sprite(stage, display, other)?;
    }
    draw_sprite(stage, display, id)
}

/// Redraw every displayed sprite, bottom slot first. O(N^2) over cells.
pub fn redraw_all(stage: &Stage, display: &mut dyn Display) -> Result<(), SpriteError> {
    let ids: Vec<SpriteId> = stage
        .all_displayed()
        .filter_map(|(_, s)| s.stable_id())
        .collect();
    for id in ids {
        draw_sprite(stage, display, id)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
