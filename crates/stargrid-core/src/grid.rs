//! The [`Grid`] type: a square board of [`Cell`]s addressed by flat index.
//!
//! Cells are stored row-major (`idx = row * dimension + col`). Neighbor
//! lists hold flat indices rather than references, so the board owns every
//! cell outright and searches borrow it as a whole.

use rand::{Rng, RngExt};
use thiserror::Error;

use crate::cell::{Cell, CellState};
use crate::geom::Pos;

/// Result of [`Grid::place`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    Start,
    End,
    Obstacle,
    /// The click landed on an endpoint or outside the grid.
    Unchanged,
}

/// Errors from [`Grid::from_ascii`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridParseError {
    #[error("grid layout is empty")]
    Empty,
    #[error("grid layout must be square: line {line} has {width} cells, expected {expected}")]
    NotSquare {
        line: usize,
        width: usize,
        expected: usize,
    },
    #[error("grid layout contains invalid character {ch:?} at {pos}")]
    InvalidChar { ch: char, pos: Pos },
    #[error("grid layout has a second start cell at {0}")]
    DuplicateStart(Pos),
    #[error("grid layout has a second end cell at {0}")]
    DuplicateEnd(Pos),
}

/// A square grid of search cells with at most one start and one end.
#[derive(Clone, Debug)]
pub struct Grid {
    dimension: i32,
    cell_size: i32,
    cells: Vec<Cell>,
    start: Option<usize>,
    end: Option<usize>,
}

impl Grid {
    /// Build a `dimension` × `dimension` grid of empty cells. `cell_size`
    /// only affects the pixel origin of each cell.
    pub fn build(dimension: i32, cell_size: i32) -> Self {
        let n = dimension.max(0);
        let cell_size = cell_size.max(1);
        let mut cells = Vec::with_capacity(cell_count(n));
        for row in 0..n {
            for col in 0..n {
                cells.push(Cell::new(row, col, cell_size));
            }
        }
        Self {
            dimension: n,
            cell_size,
            cells,
            start: None,
            end: None,
        }
    }

    /// Number of rows (equal to the number of columns).
    #[inline]
    pub fn dimension(&self) -> i32 {
        self.dimension
    }

    #[inline]
    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        p.row >= 0 && p.col >= 0 && p.row < self.dimension && p.col < self.dimension
    }

    /// Convert a position to a flat index. Returns `None` if out of bounds.
    #[inline]
    pub fn idx(&self, p: Pos) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some((p.row * self.dimension + p.col) as usize)
    }

    /// Convert a flat index back to a position.
    #[inline]
    pub fn pos(&self, idx: usize) -> Pos {
        let n = self.dimension.max(1) as usize;
        Pos::new((idx / n) as i32, (idx % n) as i32)
    }

    pub fn cell(&self, p: Pos) -> Option<&Cell> {
        self.idx(p).map(|i| &self.cells[i])
    }

    pub(crate) fn cell_mut(&mut self, p: Pos) -> Option<&mut Cell> {
        self.idx(p).map(|i| &mut self.cells[i])
    }

    #[inline]
    pub fn cell_at(&self, idx: usize) -> &Cell {
        &self.cells[idx]
    }

    /// State at `p`, or `None` outside the grid.
    pub fn state(&self, p: Pos) -> Option<CellState> {
        self.cell(p).map(Cell::state)
    }

    /// Row-major iterator over all cells.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    pub fn start(&self) -> Option<Pos> {
        self.start.map(|i| self.pos(i))
    }

    pub fn end(&self) -> Option<Pos> {
        self.end.map(|i| self.pos(i))
    }

    // -----------------------------------------------------------------------
    // Neighbors
    // -----------------------------------------------------------------------

    /// Recompute the neighbor list of the cell at `idx`: down, up, right,
    /// left, keeping only in-bounds cells that are not obstacles.
    pub fn compute_neighbors(&mut self, idx: usize) {
        let Some(cell) = self.cells.get(idx) else {
            return;
        };
        let neighbors: Vec<usize> = cell
            .pos()
            .neighbors_4()
            .into_iter()
            .filter_map(|n| self.idx(n))
            .filter(|&i| !self.cells[i].is_obstacle())
            .collect();
        self.cells[idx].neighbors = neighbors;
    }

    /// Recompute every neighbor list. Obstacles may have changed since the
    /// last search, so call this before each run.
    pub fn update_neighbors(&mut self) {
        for idx in 0..self.cells.len() {
            self.compute_neighbors(idx);
        }
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Apply the primary-click rule at `p`: the first free click places the
    /// start, the next places the end, later clicks place obstacles. Clicks
    /// on the start or end cell change nothing.
    pub fn place(&mut self, p: Pos) -> Placement {
        let Some(i) = self.idx(p) else {
            return Placement::Unchanged;
        };
        let is_start = self.start == Some(i);
        let is_end = self.end == Some(i);
        if self.start.is_none() && !is_end {
            self.set_start(p);
            Placement::Start
        } else if self.end.is_none() && !is_start {
            self.set_end(p);
            Placement::End
        } else if !is_start && !is_end {
            self.cells[i].set_state(CellState::Obstacle);
            Placement::Obstacle
        } else {
            Placement::Unchanged
        }
    }

    /// Make `p` the start cell, demoting any previous start to empty.
    /// Returns `false` if `p` is outside the grid.
    pub fn set_start(&mut self, p: Pos) -> bool {
        let Some(i) = self.idx(p) else {
            return false;
        };
        if self.end == Some(i) {
            self.end = None;
        }
        if let Some(old) = self.start.replace(i) {
            if old != i {
                self.cells[old].set_state(CellState::Empty);
            }
        }
        self.cells[i].set_state(CellState::Start);
        true
    }

    /// Make `p` the end cell, demoting any previous end to empty.
    /// Returns `false` if `p` is outside the grid.
    pub fn set_end(&mut self, p: Pos) -> bool {
        let Some(i) = self.idx(p) else {
            return false;
        };
        if self.start == Some(i) {
            self.start = None;
        }
        if let Some(old) = self.end.replace(i) {
            if old != i {
                self.cells[old].set_state(CellState::Empty);
            }
        }
        self.cells[i].set_state(CellState::End);
        true
    }

    /// Turn `p` into an obstacle. Endpoints are left alone.
    pub fn set_obstacle(&mut self, p: Pos) -> bool {
        let Some(i) = self.idx(p) else {
            return false;
        };
        if self.start == Some(i) || self.end == Some(i) {
            return false;
        }
        self.cells[i].set_state(CellState::Obstacle);
        true
    }

    /// Tag cell `idx` with a search marker. Refuses endpoint states and
    /// never touches the designated start or end cell.
    pub fn mark(&mut self, idx: usize, state: CellState) -> bool {
        if !state.is_search_marker() || self.start == Some(idx) || self.end == Some(idx) {
            return false;
        }
        match self.cells.get_mut(idx) {
            Some(cell) => {
                cell.set_state(state);
                true
            }
            None => false,
        }
    }

    /// Apply the secondary-click rule at `p`: the cell becomes empty and
    /// loses its start/end designation.
    pub fn erase(&mut self, p: Pos) -> bool {
        let Some(i) = self.idx(p) else {
            return false;
        };
        if self.start == Some(i) {
            self.start = None;
        }
        if self.end == Some(i) {
            self.end = None;
        }
        self.cells[i].set_state(CellState::Empty);
        true
    }

    /// Replace every cell with a fresh empty one of the same dimension.
    pub fn reset(&mut self) {
        *self = Self::build(self.dimension, self.cell_size);
    }

    /// Drop the frontier, visited and path markers of a previous search.
    pub fn clear_search(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.state().is_search_marker() {
                cell.set_state(CellState::Empty);
            }
        }
    }

    /// Map a pixel coordinate to the cell containing it.
    pub fn locate(&self, x: i32, y: i32) -> Option<Pos> {
        if x < 0 || y < 0 {
            return None;
        }
        let p = Pos::new(y / self.cell_size, x / self.cell_size);
        self.contains(p).then_some(p)
    }

    /// Turn each empty cell into an obstacle with probability `density`.
    /// Returns the number of obstacles placed.
    pub fn scatter(&mut self, rng: &mut impl Rng, density: f64) -> usize {
        let density = density.clamp(0.0, 1.0);
        let mut placed = 0;
        for cell in self.cells.iter_mut() {
            if cell.state() == CellState::Empty && rng.random_bool(density) {
                cell.set_state(CellState::Obstacle);
                placed += 1;
            }
        }
        placed
    }

    /// Count cells in a given state.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state() == state).count()
    }

    // -----------------------------------------------------------------------
    // ASCII layouts
    // -----------------------------------------------------------------------

    /// Parse a square layout, one line per row, using the symbols of
    /// [`CellState::symbol`]. Blank lines and surrounding whitespace are
    /// ignored.
    pub fn from_ascii(text: &str, cell_size: i32) -> Result<Self, GridParseError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            return Err(GridParseError::Empty);
        }
        let expected = lines.len();
        for (line, l) in lines.iter().enumerate() {
            let width = l.chars().count();
            if width != expected {
                return Err(GridParseError::NotSquare {
                    line,
                    width,
                    expected,
                });
            }
        }

        let mut grid = Self::build(expected as i32, cell_size);
        for (row, l) in lines.iter().enumerate() {
            for (col, ch) in l.chars().enumerate() {
                let p = Pos::new(row as i32, col as i32);
                let state =
                    CellState::from_symbol(ch).ok_or(GridParseError::InvalidChar { ch, pos: p })?;
                match state {
                    CellState::Start if grid.start.is_some() => {
                        return Err(GridParseError::DuplicateStart(p));
                    }
                    CellState::End if grid.end.is_some() => {
                        return Err(GridParseError::DuplicateEnd(p));
                    }
                    CellState::Start => {
                        grid.set_start(p);
                    }
                    CellState::End => {
                        grid.set_end(p);
                    }
                    other => {
                        if let Some(cell) = grid.cell_mut(p) {
                            cell.set_state(other);
                        }
                    }
                }
            }
        }
        log::debug!("parsed {expected}x{expected} grid layout");
        Ok(grid)
    }

    /// Render the grid in the format accepted by [`from_ascii`](Self::from_ascii).
    pub fn to_ascii(&self) -> String {
        let n = self.dimension as usize;
        let mut out = String::with_capacity(self.cells.len() + n);
        for row in self.cells.chunks(n.max(1)) {
            out.extend(row.iter().map(|c| c.state().symbol()));
            out.push('\n');
        }
        out
    }
}

/// Cells in an `n` × `n` grid, computed in `usize` so large dimensions
/// cannot overflow.
fn cell_count(n: i32) -> usize {
    let n = n.max(0) as usize;
    n * n
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn neighbor_positions(g: &Grid, p: Pos) -> Vec<Pos> {
        let cell = g.cell(p).unwrap();
        cell.neighbors().iter().map(|&i| g.pos(i)).collect()
    }

    #[test]
    fn build_is_row_major() {
        let g = Grid::build(4, 10);
        assert_eq!(g.len(), 16);
        for (i, cell) in g.iter().enumerate() {
            assert_eq!(g.idx(cell.pos()), Some(i));
            assert_eq!(g.pos(i), cell.pos());
        }
        assert_eq!(g.cell(Pos::new(1, 2)).unwrap().origin(), (20, 10));
        assert!(g.cell(Pos::new(4, 0)).is_none());
        assert!(g.cell(Pos::new(0, -1)).is_none());
    }

    #[test]
    fn neighbors_skip_bounds_and_obstacles() {
        let mut g = Grid::build(3, 1);
        g.set_obstacle(Pos::new(1, 2));
        g.update_neighbors();

        assert_eq!(
            neighbor_positions(&g, Pos::new(1, 1)),
            vec![Pos::new(2, 1), Pos::new(0, 1), Pos::new(1, 0)]
        );
        assert_eq!(
            neighbor_positions(&g, Pos::new(0, 0)),
            vec![Pos::new(1, 0), Pos::new(0, 1)]
        );
    }

    #[test]
    fn neighbors_are_stale_until_recomputed() {
        let mut g = Grid::build(2, 1);
        g.update_neighbors();
        g.set_obstacle(Pos::new(0, 1));
        assert_eq!(neighbor_positions(&g, Pos::ZERO).len(), 2);
        g.update_neighbors();
        assert_eq!(neighbor_positions(&g, Pos::ZERO), vec![Pos::new(1, 0)]);
    }

    #[test]
    fn place_follows_click_order() {
        let mut g = Grid::build(3, 1);
        assert_eq!(g.place(Pos::new(0, 0)), Placement::Start);
        // Clicking the start again does not turn it into the end.
        assert_eq!(g.place(Pos::new(0, 0)), Placement::Unchanged);
        assert_eq!(g.place(Pos::new(2, 2)), Placement::End);
        assert_eq!(g.place(Pos::new(1, 1)), Placement::Obstacle);
        assert_eq!(g.place(Pos::new(2, 2)), Placement::Unchanged);
        assert_eq!(g.place(Pos::new(9, 9)), Placement::Unchanged);

        assert_eq!(g.start(), Some(Pos::new(0, 0)));
        assert_eq!(g.end(), Some(Pos::new(2, 2)));
        assert_eq!(g.state(Pos::new(1, 1)), Some(CellState::Obstacle));
    }

    #[test]
    fn erase_frees_endpoint_slot() {
        let mut g = Grid::build(3, 1);
        g.place(Pos::new(0, 0));
        g.place(Pos::new(2, 2));
        g.erase(Pos::new(0, 0));
        assert_eq!(g.start(), None);
        assert_eq!(g.state(Pos::new(0, 0)), Some(CellState::Empty));
        // The next free click becomes the start again.
        assert_eq!(g.place(Pos::new(1, 0)), Placement::Start);
    }

    #[test]
    fn single_start_and_end() {
        let mut g = Grid::build(3, 1);
        g.set_start(Pos::new(0, 0));
        g.set_start(Pos::new(0, 1));
        g.set_end(Pos::new(0, 1));
        assert_eq!(g.count(CellState::Start), 0);
        assert_eq!(g.count(CellState::End), 1);
        assert_eq!(g.start(), None);
        assert_eq!(g.state(Pos::new(0, 0)), Some(CellState::Empty));

        g.set_start(Pos::new(2, 2));
        g.set_start(Pos::new(1, 2));
        assert_eq!(g.count(CellState::Start), 1);
        assert!(!g.set_obstacle(Pos::new(1, 2)));
    }

    #[test]
    fn reset_and_clear_search() {
        let mut g = Grid::from_ascii(
            "\
S*#
.xo
..E",
            1,
        )
        .unwrap();
        g.clear_search();
        assert_eq!(g.to_ascii(), "S.#\n...\n..E\n");

        g.reset();
        assert_eq!(g.to_ascii(), "...\n...\n...\n");
        assert_eq!(g.start(), None);
        assert_eq!(g.end(), None);
        assert_eq!(g.dimension(), 3);
    }

    #[test]
    fn locate_pixels() {
        let g = Grid::build(10, 8);
        assert_eq!(g.locate(0, 0), Some(Pos::new(0, 0)));
        assert_eq!(g.locate(17, 9), Some(Pos::new(1, 2)));
        assert_eq!(g.locate(80, 0), None);
        assert_eq!(g.locate(-1, 0), None);
    }

    #[test]
    fn scatter_respects_endpoints_and_density() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut g = Grid::build(10, 1);
        g.set_start(Pos::ZERO);
        g.set_end(Pos::new(9, 9));
        assert_eq!(g.scatter(&mut rng, 0.0), 0);
        let placed = g.scatter(&mut rng, 1.0);
        assert_eq!(placed, 98);
        assert_eq!(g.start(), Some(Pos::ZERO));
        assert_eq!(g.state(Pos::new(9, 9)), Some(CellState::End));
    }

    #[test]
    fn mark_leaves_endpoints_alone() {
        let mut g = Grid::build(3, 1);
        g.set_start(Pos::ZERO);
        g.set_end(Pos::new(2, 2));
        let (si, ei) = (0, 8);
        assert!(!g.mark(si, CellState::Visited));
        assert!(!g.mark(ei, CellState::Frontier));
        assert!(g.mark(4, CellState::Path));
        assert_eq!(g.state(Pos::new(1, 1)), Some(CellState::Path));

        // Endpoint tags only come from set_start / set_end.
        assert!(!g.mark(4, CellState::Start));
        assert!(!g.mark(4, CellState::Obstacle));
        assert!(!g.mark(99, CellState::Visited));
        assert_eq!(g.count(CellState::Start), 1);
        assert_eq!(g.to_ascii(), "S..\n.*.\n..E\n");
    }

    #[test]
    fn cell_count_does_not_overflow_i32() {
        // 46341² does not fit in an i32.
        let n: i32 = 46_341;
        assert!(n.checked_mul(n).is_none());
        assert_eq!(cell_count(n), 2_147_488_281);
        assert_eq!(cell_count(-3), 0);
        let g = Grid::build(0, 1);
        assert!(g.is_empty());
        assert_eq!(Grid::build(-3, 1).dimension(), 0);
    }

    #[test]
    fn ascii_errors() {
        assert_eq!(Grid::from_ascii("\n  \n", 1).unwrap_err(), GridParseError::Empty);
        assert!(matches!(
            Grid::from_ascii("..\n...", 1),
            Err(GridParseError::NotSquare { line: 1, .. })
        ));
        assert_eq!(
            Grid::from_ascii("S.\n.?", 1).unwrap_err(),
            GridParseError::InvalidChar {
                ch: '?',
                pos: Pos::new(1, 1)
            }
        );
        assert_eq!(
            Grid::from_ascii("SS\n..", 1).unwrap_err(),
            GridParseError::DuplicateStart(Pos::new(0, 1))
        );
        assert_eq!(
            Grid::from_ascii("E.\n.E", 1).unwrap_err(),
            GridParseError::DuplicateEnd(Pos::new(1, 1))
        );
    }
}
