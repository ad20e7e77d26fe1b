//! A* shortest-path search over stargrid grids.
//!
//! The engine ([`PathSearch`]) runs a standard A* over the 4-connected,
//! unit-cost cell graph of a [`Grid`](stargrid_core::Grid), tags cells as it
//! explores them, and reports each step to a [`VisualSink`]. A
//! [`Context`](stargrid_core::Context) is checked once per expansion so the
//! host can abort a running search.
//!
//! # Ordering
//!
//! The open set is keyed by `(f, seq)` where `seq` is an insertion counter.
//! Cells themselves are never compared, which makes every run on the same
//! grid produce the same path.

mod astar;
mod distance;
mod error;
mod openset;
mod traits;

pub use astar::{INFINITY, Path, PathSearch, SearchOutcome, SearchStats, find_path};
pub use distance::manhattan;
pub use error::{EndpointError, SearchError};
pub use openset::{OpenKey, OpenSet};
pub use traits::{Heuristic, Manhattan, NoopSink, VisualSink};
