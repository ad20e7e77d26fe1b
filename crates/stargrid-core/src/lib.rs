//! **stargrid-core**: grid, cell and application-loop types for the
//! stargrid A* visualizer.
//!
//! This crate provides the foundational types used across the *stargrid*
//! workspace: grid coordinates, search cells and the square [`Grid`] they
//! live in, a styled display buffer, input events, and the Elm-architecture
//! application loop with its cooperative cancellation token.

pub mod app;
pub mod cell;
pub mod geom;
pub mod grid;
pub mod messages;
pub mod screen;
pub mod style;

pub use app::{App, AppConfig, Context, Driver, Effect, Live, Model};
pub use cell::{Cell, CellState};
pub use geom::Pos;
pub use grid::{Grid, GridParseError, Placement};
pub use messages::*;
pub use screen::{Frame, Glyph, Screen};
pub use style::{Color, Palette, Style};
