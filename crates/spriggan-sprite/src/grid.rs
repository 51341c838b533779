//! Character grids backing sprite bodies.
//!
//! A [`CharGrid`] is a rectangular, row-major `char` buffer with a parallel
//! per-cell optional formatting-code buffer (ANSI SGR codes). Blank cells
//! (space or NUL) are transparent: the renderer never writes them and they
//! do not contribute to a sprite's default mass.

use serde::{Deserialize, Serialize};

use crate::SpriteError;

/// Returns `true` if `c` is treated as transparent by the renderer and the
/// mass computation.
#[inline]
pub fn is_blank(c: char) -> bool {
    c == ' ' || c == '\0'
}

// ---------------------------------------------------------------------------
// CharGrid
// ---------------------------------------------------------------------------

/// A rectangular character grid with optional per-cell format codes.
///
/// Dimensions are fixed at construction (see [`CharGrid::resize`] for the
/// one mutation that changes them) and always at least 1x1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharGrid {
    width: u32,
    height: u32,
    /// Row-major cell characters, `width * height` entries.
    cells: Vec<char>,
    /// Row-major format codes, parallel to `cells`. `None` = unformatted.
    formats: Vec<Option<u16>>,
}

impl CharGrid {
    /// Create a grid filled with `fill`.
    ///
    /// Fails with [`SpriteError::InvalidArgument`] if either dimension is 0.
    pub fn new(width: u32, height: u32, fill: char) -> Result<Self, SpriteError> {
        if width == 0 || height == 0 {
            return Err(SpriteError::InvalidArgument {
                reason: format!("grid dimensions must be positive, got {width}x{height}"),
            });
        }
        let len = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            cells: vec![fill; len],
            formats: vec![None; len],
        })
    }

    /// Create a grid from text rows. The grid is as wide as the longest row;
    /// shorter rows are padded with blanks on the right.
    ///
    /// Fails with [`SpriteError::InvalidArgument`] if `rows` is empty or all
    /// rows are empty.
    pub fn from_rows(rows: &[&str]) -> Result<Self, SpriteError> {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let height = rows.len() as u32;
        let mut grid = Self::new(width, height, ' ')?;
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                grid.cells[y * width as usize + x] = c;
            }
        }
        Ok(grid)
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Result<usize, SpriteError> {
        if x >= self.width || y >= self.height {
            return Err(SpriteError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y as usize) * (self.width as usize) + x as usize)
    }

    /// The character at `(x, y)`. Out-of-range coordinates are a hard failure.
    pub fn get(&self, x: u32, y: u32) -> Result<char, SpriteError> {
        Ok(self.cells[self.index(x, y)?])
    }

    /// Set the character at `(x, y)`. Out-of-range coordinates are a hard
    /// failure, not a clamp.
    pub fn set(&mut self, x: u32, y: u32, c: char) -> Result<(), SpriteError> {
        let idx = self.index(x, y)?;
        self.cells[idx] = c;
        Ok(())
    }

    /// The format code at `(x, y)`, if any.
    pub fn format(&self, x: u32, y: u32) -> Result<Option<u16>, SpriteError> {
        Ok(self.formats[self.index(x, y)?])
    }

    /// Set or clear the format code at `(x, y)`.
    pub fn set_format(&mut self, x: u32, y: u32, code: Option<u16>) -> Result<(), SpriteError> {
        let idx = self.index(x, y)?;
        self.formats[idx] = code;
        Ok(())
    }

    /// Overwrite every cell with `c`, clearing all format codes.
    pub fn fill(&mut self, c: char) {
        self.cells.fill(c);
        self.formats.fill(None);
    }

    /// Apply `code` to every non-blank cell.
    pub fn recolor_all(&mut self, code: u16) {
        for (cell, fmt) in self.cells.iter().zip(self.formats.iter_mut()) {
            if !is_blank(*cell) {
                *fmt = Some(code);
            }
        }
    }

    /// Number of non-blank cells.
    pub fn non_blank_count(&self) -> usize {
        self.cells.iter().filter(|&&c| !is_blank(c)).count()
    }

    /// Iterate non-blank cells as `(x, y, char, format)`.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, char, Option<u16>)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, &c)| {
            if is_blank(c) {
                return None;
            }
            let x = (i % self.width as usize) as u32;
            let y = (i / self.width as usize) as u32;
            Some((x, y, c, self.formats[i]))
        })
    }

    /// Resize the grid, anchoring existing content at the top-left. New cells
    /// are filled with `fill` and carry no format code.
    pub fn resize(&mut self, width: u32, height: u32, fill: char) -> Result<(), SpriteError> {
        if width == 0 || height == 0 {
            return Err(SpriteError::InvalidArgument {
                reason: format!("grid dimensions must be positive, got {width}x{height}"),
            });
        }
        let len = (width as usize) * (height as usize);
        let mut cells = vec![fill; len];
        let mut formats = vec![None; len];
        for y in 0..height.min(self.height) {
            for x in 0..width.min(self.width) {
                let old = (y as usize) * (self.width as usize) + x as usize;
                let new = (y as usize) * (width as usize) + x as usize;
                cells[new] = self.cells[old];
                formats[new] = self.formats[old];
            }
        }
        self.width = width;
        self.height = height;
        self.cells = cells;
        self.formats = formats;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
