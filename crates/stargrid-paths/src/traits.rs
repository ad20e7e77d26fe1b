use stargrid_core::{Grid, Pos};

use crate::distance::manhattan;

/// Estimate of the remaining cost between two cells.
///
/// Must never overestimate the true cost (admissible), or A* loses its
/// optimality guarantee.
pub trait Heuristic {
    fn estimate(&self, from: Pos, to: Pos) -> u32;
}

/// The Manhattan distance, exact on an empty 4-connected grid.
#[derive(Copy, Clone, Debug, Default)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    #[inline]
    fn estimate(&self, from: Pos, to: Pos) -> u32 {
        manhattan(from, to)
    }
}

/// Receives a "render now" call after each search step.
///
/// The engine holds the grid mutably while it runs, so it lends the sink a
/// shared view for the duration of the call.
pub trait VisualSink {
    fn render(&mut self, grid: &Grid);
}

impl<F: FnMut(&Grid)> VisualSink for F {
    #[inline]
    fn render(&mut self, grid: &Grid) {
        self(grid)
    }
}

/// A sink that ignores every frame.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopSink;

impl VisualSink for NoopSink {
    #[inline]
    fn render(&mut self, _grid: &Grid) {}
}
