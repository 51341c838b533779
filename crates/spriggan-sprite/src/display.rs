//! The display collaborator interface.
//!
//! The sprite core never talks to a real terminal. It renders against the
//! [`Display`] trait, which mirrors the cursor-addressed character surface
//! the engine ultimately draws to. [`MemoryDisplay`] is the in-memory
//! implementation used by tests and headless runs.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// A cursor-addressed character surface.
///
/// Writes happen at the current cursor position; `put_char` advances the
/// cursor one column. Format codes are sticky until `reset_format`.
/// Implementations are expected to ignore writes outside the canvas.
pub trait Display {
    /// Canvas width in columns.
    fn width(&self) -> u32;
    /// Canvas height in rows.
    fn height(&self) -> u32;
    /// Move the cursor to column `x`, row `y`.
    fn set_cursor(&mut self, x: u32, y: u32);
    /// Write `c` at the cursor and advance one column.
    fn put_char(&mut self, c: char);
    /// Apply an ANSI SGR format code to subsequent writes.
    fn apply_format(&mut self, code: u16);
    /// Clear any applied format code.
    fn reset_format(&mut self);
}

// ---------------------------------------------------------------------------
// MemoryDisplay
// ---------------------------------------------------------------------------

/// In-memory canvas implementing [`Display`].
///
/// Stores the character and the format code that was active for every cell,
/// which lets tests assert on exactly what the renderer emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryDisplay {
    width: u32,
    height: u32,
    cells: Vec<char>,
    formats: Vec<Option<u16>>,
    cursor_x: u32,
    cursor_y: u32,
    current_format: Option<u16>,
}

impl MemoryDisplay {
    /// Create a blank canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![' '; len],
            formats: vec![None; len],
            cursor_x: 0,
            cursor_y: 0,
            current_format: None,
        }
    }

    /// The character at `(x, y)`, or `None` outside the canvas.
    pub fn char_at(&self, x: u32, y: u32) -> Option<char> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// The format code recorded at `(x, y)`.
    pub fn format_at(&self, x: u32, y: u32) -> Option<u16> {
        self.index(x, y).and_then(|i| self.formats[i])
    }

    /// Render the canvas as newline-joined rows. Test helper.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.cells[self.index(x, y).unwrap_or(0)]);
            }
            if y + 1 < self.height {
                out.push('\n');
            }
        }
        out
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize) * (self.width as usize) + x as usize)
        } else {
            None
        }
    }
}

impl Display for MemoryDisplay {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_cursor(&mut self, x: u32, y: u32) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    fn put_char(&mut self, c: char) {
        if let Some(i) = self.index(self.cursor_x, self.cursor_y) {
            self.cells[i] = c;
            self.formats[i] = self.current_format;
        }
        self.cursor_x = self.cursor_x.saturating_add(1);
    }

    fn apply_format(&mut self, code: u16) {
        self.current_format = Some(code);
    }

    fn reset_format(&mut self) {
        self.current_format = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
