//! Colours and glyph styles, and the [`Palette`] that colour-codes cell
//! states on the board.

use crate::cell::CellState;

/// A 24-bit colour stored as `0x00RRGGBB`.
///
/// `Color(0)` is reserved for the back-end's default colour, so pure black
/// is not representable; use a near-black instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u32);

impl Color {
    pub const DEFAULT: Self = Self(0);

    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(u32::from_be_bytes([0, r, g, b]))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        self.0.to_be_bytes()[1]
    }

    #[inline]
    pub const fn g(self) -> u8 {
        self.0.to_be_bytes()[2]
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0.to_be_bytes()[3]
    }
}

/// How one terminal cell is painted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Style {
    #[inline]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    #[inline]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    #[inline]
    pub const fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Background colour of every cell state, plus the ink drawn on top.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    pub empty: Color,
    pub obstacle: Color,
    /// Shared by start and end.
    pub endpoint: Color,
    pub frontier: Color,
    pub visited: Color,
    pub path: Color,
    /// Foreground of symbols on light backgrounds.
    pub ink: Color,
    /// Foreground of the obstacle symbol.
    pub wall: Color,
}

impl Default for Palette {
    /// Dark purple board, grey endpoints, yellow frontier and path.
    fn default() -> Self {
        Self {
            empty: Color::from_rgb(74, 20, 30),
            obstacle: Color::from_rgb(12, 12, 14),
            endpoint: Color::from_rgb(207, 207, 205),
            frontier: Color::from_rgb(232, 171, 72),
            visited: Color::from_rgb(156, 47, 67),
            path: Color::from_rgb(255, 158, 0),
            ink: Color::from_rgb(20, 20, 30),
            wall: Color::from_rgb(87, 91, 97),
        }
    }
}

impl Palette {
    /// Style of a cell in `state`. Endpoints and path cells are bold.
    pub fn cell(&self, state: CellState) -> Style {
        let base = Style::default().with_fg(self.ink);
        match state {
            CellState::Empty => base.with_bg(self.empty),
            CellState::Obstacle => base.with_fg(self.wall).with_bg(self.obstacle),
            CellState::Start | CellState::End => base.with_bg(self.endpoint).with_bold(true),
            CellState::Frontier => base.with_bg(self.frontier),
            CellState::Visited => base.with_fg(self.empty).with_bg(self.visited),
            CellState::Path => base.with_bg(self.path).with_bold(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_round_trips_through_packing() {
        let c = Color::from_rgb(232, 171, 72);
        assert_eq!((c.r(), c.g(), c.b()), (232, 171, 72));
        assert_eq!(c, Color(0x00E8AB48));
        assert_eq!(Color::from_rgb(0, 0, 0), Color::DEFAULT);
    }

    #[test]
    fn builders_only_touch_their_field() {
        let s = Style::default().with_bg(Color(7)).with_bold(true);
        assert_eq!(s.fg, Color::DEFAULT);
        assert_eq!(s.bg, Color(7));
        assert!(s.bold);
    }

    #[test]
    fn palette_tells_states_apart() {
        let p = Palette::default();
        let states = [
            CellState::Empty,
            CellState::Obstacle,
            CellState::Start,
            CellState::Frontier,
            CellState::Visited,
            CellState::Path,
        ];
        for (i, a) in states.iter().enumerate() {
            assert_ne!(p.cell(*a).bg, Color::DEFAULT);
            for b in &states[i + 1..] {
                assert_ne!(p.cell(*a).bg, p.cell(*b).bg, "{a:?} vs {b:?}");
            }
        }
        assert_eq!(p.cell(CellState::Start), p.cell(CellState::End));
        assert!(p.cell(CellState::Path).bold);
        assert!(!p.cell(CellState::Visited).bold);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn style_json() {
        let s = Style::default().with_fg(Color::from_rgb(1, 2, 3));
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"fg":66051,"bg":0,"bold":false}"#);
        let back: Style = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
