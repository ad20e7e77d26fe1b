//! Grid coordinates: [`Pos`].

use std::fmt;
use std::ops::{Add, Sub};

/// A `(row, col)` grid coordinate. Rows grow down, columns grow right.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { row: 0, col: 0 };

    /// Create a new position.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Return a position shifted by (drow, dcol).
    #[inline]
    pub const fn shift(self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// The four orthogonal neighbours in search order: down, up, right,
    /// left. Neighbor lists and therefore tie-breaks depend on this order.
    #[inline]
    pub const fn neighbors_4(self) -> [Pos; 4] {
        [
            self.shift(1, 0),
            self.shift(-1, 0),
            self.shift(0, 1),
            self.shift(0, -1),
        ]
    }

    /// Whether `other` is exactly one orthogonal step away.
    #[inline]
    pub fn is_adjacent(self, other: Pos) -> bool {
        (self.row - other.row).abs() + (self.col - other.col).abs() == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl Add for Pos {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Pos {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl From<(i32, i32)> for Pos {
    #[inline]
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_order_is_down_up_right_left() {
        let p = Pos::new(3, 3);
        assert_eq!(
            p.neighbors_4(),
            [
                Pos::new(4, 3),
                Pos::new(2, 3),
                Pos::new(3, 4),
                Pos::new(3, 2)
            ]
        );
    }

    #[test]
    fn adjacency() {
        let p = Pos::new(1, 1);
        assert!(p.is_adjacent(Pos::new(1, 2)));
        assert!(p.is_adjacent(Pos::new(0, 1)));
        assert!(!p.is_adjacent(Pos::new(2, 2)));
        assert!(!p.is_adjacent(p));
    }

    #[test]
    fn arithmetic_and_display() {
        let p = Pos::new(2, 5) + Pos::new(1, -1);
        assert_eq!(p, Pos::new(3, 4));
        assert_eq!(p - Pos::new(3, 4), Pos::ZERO);
        assert_eq!(format!("{}", Pos::from((7, 9))), "(7, 9)");
    }
}
