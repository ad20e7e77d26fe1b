//! The [`Screen`] display buffer and the [`Frame`] diffs sent to drivers.
//!
//! Screen coordinates are `(x, y)` character cells with `y` growing down,
//! independent of the search grid's `(row, col)` positions.

use crate::style::Style;

/// A styled character.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Glyph {
    pub ch: char,
    pub style: Style,
}

impl Glyph {
    #[inline]
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }
}

impl Default for Glyph {
    #[inline]
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

/// A fixed-size buffer of glyphs, row-major.
#[derive(Clone, Debug)]
pub struct Screen {
    glyphs: Vec<Glyph>,
    width: i32,
    height: i32,
}

impl Screen {
    /// Create a screen filled with blank glyphs.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        Self {
            glyphs: vec![Glyph::default(); (w * h) as usize],
            width: w,
            height: h,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Read the glyph at `(x, y)`; blank outside the screen.
    pub fn at(&self, x: i32, y: i32) -> Glyph {
        self.index(x, y)
            .map(|i| self.glyphs[i])
            .unwrap_or_default()
    }

    /// Set the glyph at `(x, y)`. No-op outside the screen.
    pub fn set(&mut self, x: i32, y: i32, glyph: Glyph) {
        if let Some(i) = self.index(x, y) {
            self.glyphs[i] = glyph;
        }
    }

    pub fn fill(&mut self, glyph: Glyph) {
        self.glyphs.fill(glyph);
    }

    /// Write `text` left to right from `(x, y)`, clipped at the right edge.
    /// Returns the number of glyphs written.
    pub fn print(&mut self, x: i32, y: i32, text: &str, style: Style) -> i32 {
        let mut written = 0;
        for (dx, ch) in text.chars().enumerate() {
            let cx = x + dx as i32;
            if cx >= self.width {
                break;
            }
            if self.index(cx, y).is_some() {
                self.set(cx, y, Glyph::new(ch, style));
                written += 1;
            }
        }
        written
    }

    /// Copy the contents of a same-sized screen.
    pub fn copy_from(&mut self, src: &Screen) {
        if src.width == self.width && src.height == self.height {
            self.glyphs.copy_from_slice(&src.glyphs);
        } else {
            *self = src.clone();
        }
    }
}

/// A single glyph that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameCell {
    pub x: i32,
    pub y: i32,
    pub glyph: Glyph,
}

/// A set of glyph changes (a diff frame).
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// Compute the difference between two screens.
///
/// If the sizes differ every glyph of `curr` is included.
pub fn compute_frame(prev: &Screen, curr: &Screen) -> Frame {
    let full = prev.width != curr.width || prev.height != curr.height;
    let mut cells = Vec::new();
    for y in 0..curr.height {
        for x in 0..curr.width {
            let glyph = curr.at(x, y);
            if full || prev.at(x, y) != glyph {
                cells.push(FrameCell { x, y, glyph });
            }
        }
    }
    Frame {
        cells,
        width: curr.width,
        height: curr.height,
    }
}
