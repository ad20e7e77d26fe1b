use stargrid_core::{CellState, Context, Grid, Pos};

use crate::error::{EndpointError, SearchError};
use crate::openset::OpenSet;
use crate::traits::{Heuristic, Manhattan, NoopSink, VisualSink};

/// Cost of a cell that has not been reached yet.
pub const INFINITY: u32 = u32::MAX;

/// A shortest path, start and end included.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    cells: Vec<Pos>,
    cost: u32,
}

impl Path {
    /// Cells from start to end.
    #[inline]
    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    /// Number of cells, endpoints included.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of unit steps, i.e. the g-score of the end cell.
    #[inline]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn contains(&self, p: Pos) -> bool {
        self.cells.contains(&p)
    }
}

/// Result of a search that ran to completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Path),
    /// The open set ran dry before the end was reached.
    NoPath,
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found(p) => Some(p),
            Self::NoPath => None,
        }
    }

    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Counters collected during the last run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Cells popped and expanded (the end cell is not counted).
    pub expanded: usize,
    /// Entries pushed onto the open set.
    pub pushed: u64,
    /// Successful relaxations.
    pub relaxed: usize,
    /// Sink calls.
    pub frames: usize,
}

/// The A* engine.
///
/// Owns the per-run tables (g-score, f-score, predecessors, open set) and
/// reuses their allocations across runs. Tables are valid for inspection
/// after a run until the next one starts.
#[derive(Clone, Debug)]
pub struct PathSearch<H: Heuristic = Manhattan> {
    heuristic: H,
    g_score: Vec<u32>,
    f_score: Vec<u32>,
    came_from: Vec<Option<usize>>,
    open: OpenSet,
    stats: SearchStats,
}

impl PathSearch<Manhattan> {
    /// Engine using the Manhattan heuristic.
    pub fn new() -> Self {
        Self::with_heuristic(Manhattan)
    }
}

impl Default for PathSearch<Manhattan> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Heuristic> PathSearch<H> {
    pub fn with_heuristic(heuristic: H) -> Self {
        Self {
            heuristic,
            g_score: Vec::new(),
            f_score: Vec::new(),
            came_from: Vec::new(),
            open: OpenSet::default(),
            stats: SearchStats::default(),
        }
    }

    /// Best known cost from the start to `idx` in the last run.
    pub fn g_score(&self, idx: usize) -> u32 {
        self.g_score.get(idx).copied().unwrap_or(INFINITY)
    }

    /// Estimated total cost through `idx` in the last run.
    pub fn f_score(&self, idx: usize) -> u32 {
        self.f_score.get(idx).copied().unwrap_or(INFINITY)
    }

    /// Predecessor of `idx` on its best known path in the last run.
    pub fn came_from(&self, idx: usize) -> Option<usize> {
        self.came_from.get(idx).copied().flatten()
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Search for a shortest path from `start` to `end`.
    ///
    /// Neighbor lists must be up to date (see
    /// [`Grid::update_neighbors`]). Once the endpoints are accepted they
    /// become the grid's designated start and end, so they end up tagged
    /// Start and End whatever they held before. Other cells are tagged
    /// Frontier when queued, Visited once expanded and Path when on the
    /// result. `sink` is called once per expansion and
    /// once per step of the path walk. `ctx` is checked after every
    /// expansion's sink call.
    pub fn run<S: VisualSink + ?Sized>(
        &mut self,
        grid: &mut Grid,
        start: Pos,
        end: Pos,
        sink: &mut S,
        ctx: &Context,
    ) -> Result<SearchOutcome, SearchError> {
        let (si, ei) = validate(grid, start, end)?;
        self.reset(grid.len());
        grid.set_start(start);
        grid.set_end(end);
        log::debug!(
            "A* {start} -> {end} on {n}x{n} grid",
            n = grid.dimension()
        );

        self.g_score[si] = 0;
        self.f_score[si] = self.heuristic.estimate(start, end);
        self.open.push(si, self.f_score[si]);

        while let Some((ci, key)) = self.open.pop() {
            if ci == ei {
                let path = self.reconstruct(grid, si, ei, sink);
                self.stats.pushed = self.open.pushed();
                log::debug!(
                    "path found: {} steps, {} expanded, {} pushed",
                    path.cost(),
                    self.stats.expanded,
                    self.stats.pushed
                );
                return Ok(SearchOutcome::Found(path));
            }

            self.stats.expanded += 1;
            let current_g = self.g_score[ci];
            log::trace!("expand {} g={current_g} f={}", grid.pos(ci), key.f);

            for k in 0..grid.cell_at(ci).neighbors().len() {
                let ni = grid.cell_at(ci).neighbors()[k];
                let tentative_g = current_g + 1;
                if tentative_g >= self.g_score[ni] {
                    continue;
                }
                self.came_from[ni] = Some(ci);
                self.g_score[ni] = tentative_g;
                self.f_score[ni] = tentative_g + self.heuristic.estimate(grid.pos(ni), end);
                self.stats.relaxed += 1;
                if !self.open.contains(ni) {
                    self.open.push(ni, self.f_score[ni]);
                    grid.mark(ni, CellState::Frontier);
                }
            }

            sink.render(grid);
            self.stats.frames += 1;

            if ctx.is_done() {
                self.stats.pushed = self.open.pushed();
                log::debug!("search cancelled after {} expansions", self.stats.expanded);
                return Err(SearchError::Cancelled);
            }

            grid.mark(ci, CellState::Visited);
        }

        self.stats.pushed = self.open.pushed();
        log::debug!("no path: {} cells expanded", self.stats.expanded);
        Ok(SearchOutcome::NoPath)
    }

    fn reset(&mut self, len: usize) {
        self.g_score.clear();
        self.g_score.resize(len, INFINITY);
        self.f_score.clear();
        self.f_score.resize(len, INFINITY);
        self.came_from.clear();
        self.came_from.resize(len, None);
        self.open.reset(len);
        self.stats = SearchStats::default();
    }

    /// Walk the predecessor links back from the end, tagging the cells in
    /// between and rendering after each step.
    fn reconstruct<S: VisualSink + ?Sized>(
        &mut self,
        grid: &mut Grid,
        si: usize,
        ei: usize,
        sink: &mut S,
    ) -> Path {
        let mut cells = vec![grid.pos(ei)];
        let mut current = ei;
        while let Some(prev) = self.came_from[current] {
            current = prev;
            cells.push(grid.pos(current));
            grid.mark(current, CellState::Path);
            sink.render(grid);
            self.stats.frames += 1;
        }
        cells.reverse();
        Path {
            cells,
            cost: self.g_score[ei],
        }
    }
}

/// Recompute neighbor lists and search with no sink and no cancellation.
pub fn find_path(grid: &mut Grid, start: Pos, end: Pos) -> Result<SearchOutcome, SearchError> {
    grid.update_neighbors();
    PathSearch::new().run(grid, start, end, &mut NoopSink, &Context::new())
}

fn validate(grid: &Grid, start: Pos, end: Pos) -> Result<(usize, usize), EndpointError> {
    let si = grid.idx(start).ok_or(EndpointError::OutOfBounds(start))?;
    let ei = grid.idx(end).ok_or(EndpointError::OutOfBounds(end))?;
    if si == ei {
        return Err(EndpointError::SameCell(start));
    }
    if grid.cell_at(si).is_obstacle() {
        return Err(EndpointError::Obstacle(start));
    }
    if grid.cell_at(ei).is_obstacle() {
        return Err(EndpointError::Obstacle(end));
    }
    Ok((si, ei))
}
