//! The [`Cell`] type: one grid position with its state tag.

use crate::geom::Pos;

/// What a cell currently is, from the editor's and the search's point of
/// view.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Empty,
    Obstacle,
    Start,
    End,
    /// Queued in the open set.
    Frontier,
    /// Popped from the open set and expanded.
    Visited,
    /// Part of the reconstructed shortest path.
    Path,
}

impl CellState {
    /// Whether the state is one of the two search endpoints.
    #[inline]
    pub const fn is_endpoint(self) -> bool {
        matches!(self, Self::Start | Self::End)
    }

    /// Whether the state was produced by a search run.
    #[inline]
    pub const fn is_search_marker(self) -> bool {
        matches!(self, Self::Frontier | Self::Visited | Self::Path)
    }

    /// ASCII symbol used by [`Grid::to_ascii`](crate::Grid::to_ascii).
    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Obstacle => '#',
            Self::Start => 'S',
            Self::End => 'E',
            Self::Frontier => 'o',
            Self::Visited => 'x',
            Self::Path => '*',
        }
    }

    /// Inverse of [`symbol`](Self::symbol).
    pub const fn from_symbol(ch: char) -> Option<Self> {
        Some(match ch {
            '.' => Self::Empty,
            '#' => Self::Obstacle,
            'S' => Self::Start,
            'E' => Self::End,
            'o' => Self::Frontier,
            'x' => Self::Visited,
            '*' => Self::Path,
            _ => return None,
        })
    }
}

/// A single grid cell.
///
/// Cells compare by identity (row and column) and never by state. They are
/// deliberately not ordered: nothing may rank one cell above another.
#[derive(Clone, Debug)]
pub struct Cell {
    row: i32,
    col: i32,
    x: i32,
    y: i32,
    state: CellState,
    pub(crate) neighbors: Vec<usize>,
}

impl Cell {
    pub(crate) fn new(row: i32, col: i32, cell_size: i32) -> Self {
        Self {
            row,
            col,
            x: col * cell_size,
            y: row * cell_size,
            state: CellState::Empty,
            neighbors: Vec::new(),
        }
    }

    #[inline]
    pub fn row(&self) -> i32 {
        self.row
    }

    #[inline]
    pub fn col(&self) -> i32 {
        self.col
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        Pos::new(self.row, self.col)
    }

    /// Pixel-space origin `(x, y)` of the cell's top-left corner.
    #[inline]
    pub fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    #[inline]
    pub fn state(&self) -> CellState {
        self.state
    }

    #[inline]
    pub(crate) fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    #[inline]
    pub fn is_obstacle(&self) -> bool {
        self.state == CellState::Obstacle
    }

    /// Flat indices of the walkable orthogonal neighbours, as of the last
    /// [`Grid::compute_neighbors`](crate::Grid::compute_neighbors) call.
    #[inline]
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.row == other.row && self.col == other.col
    }
}

impl Eq for Cell {}
