//! Interactive A* visualizer shared by the `stargrid` binary and its tests.
//!
//! One terminal cell per grid cell, with a status bar and a help line below
//! the board. Searches run as [`Effect::Job`]s so every expansion is drawn
//! while the terminal keeps being polled for Esc, `q` and Ctrl-C.

pub mod config;

pub use config::{Args, Config, ConfigError};

use rand::{SeedableRng, rngs::StdRng};
use stargrid_core::{
    Cell, CellState, Color, Effect, Glyph, Grid, Key, Live, Model, MouseAction, Msg, Palette,
    Placement, Pos, Screen, Style,
};
use stargrid_paths::{
    EndpointError, PathSearch, SearchError, SearchOutcome, SearchStats, VisualSink,
};

/// Rows below the board: status bar and help line.
pub const FOOTER_ROWS: i32 = 2;

// Colours
const COL_CURSOR: Color = Color::from_rgb(80, 200, 80);
const COL_STATUS_FG: Color = Color::from_rgb(200, 200, 200);
const COL_STATUS_BG: Color = Color::from_rgb(30, 30, 50);
const COL_HELP_FG: Color = Color::from_rgb(170, 170, 190);

const HELP_LINE: &str =
    " click/enter place  right/del erase  hjkl move  space search  r clear  c reset  g scatter  q quit";

// ---------------------------------------------------------------------------
// Last run
// ---------------------------------------------------------------------------

/// What the most recent search ended with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LastRun {
    Found {
        cells: usize,
        cost: u32,
        stats: SearchStats,
    },
    NoPath(SearchStats),
    Cancelled(SearchStats),
    Rejected(EndpointError),
    /// The terminal failed while frames were being presented.
    Failed(String),
}

impl LastRun {
    fn summary(&self) -> String {
        match self {
            Self::Found { cells, cost, stats } => format!(
                "path: {cells} cells, {cost} steps  expanded {}  pushed {}",
                stats.expanded, stats.pushed
            ),
            Self::NoPath(stats) => format!("no path  expanded {}", stats.expanded),
            Self::Cancelled(stats) => format!("cancelled after {} expansions", stats.expanded),
            Self::Rejected(e) => format!("cannot search: {e}"),
            Self::Failed(e) => format!("display error: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Live sink
// ---------------------------------------------------------------------------

/// Presents one frame per search step and watches the inbox for abort keys.
struct LiveSink<'l, 'a> {
    live: &'l mut Live<'a>,
    palette: Palette,
    cursor: Pos,
    quit: bool,
    error: Option<String>,
}

impl VisualSink for LiveSink<'_, '_> {
    fn render(&mut self, grid: &Grid) {
        if self.error.is_some() {
            return;
        }
        let (palette, cursor) = (self.palette, self.cursor);
        let presented = self.live.present(|screen| {
            draw_board(screen, grid, &palette, cursor);
            draw_footer(screen, grid.dimension(), "searching...  esc to cancel");
        });
        if let Err(e) = presented {
            log::error!("presenting search frame: {e}");
            self.error = Some(e.to_string());
            self.live.context().cancel();
            return;
        }
        for msg in self.live.take_msgs() {
            match msg {
                Msg::KeyDown {
                    key: Key::Escape, ..
                } => {
                    log::info!("search cancelled by user");
                    self.live.context().cancel();
                }
                Msg::KeyDown {
                    key: Key::Char('q'),
                    ..
                }
                | Msg::Quit => {
                    self.quit = true;
                    self.live.context().cancel();
                }
                _ => {}
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Visualizer
// ---------------------------------------------------------------------------

pub struct Visualizer {
    grid: Grid,
    search: PathSearch,
    palette: Palette,
    cursor: Pos,
    rng: StdRng,
    density: f64,
    status: String,
    last: Option<LastRun>,
}

impl Visualizer {
    /// An empty `rows` × `rows` board.
    pub fn new(config: &Config) -> Self {
        Self::with_grid(Grid::build(config.rows, 1), config)
    }

    /// Start from an existing board, e.g. one parsed from a layout file.
    pub fn with_grid(grid: Grid, config: &Config) -> Self {
        log::info!(
            "visualizer: {n}x{n} grid, density {}, seed {}",
            config.density,
            config.seed,
            n = grid.dimension()
        );
        Self {
            grid,
            search: PathSearch::new(),
            palette: Palette::default(),
            cursor: Pos::ZERO,
            rng: StdRng::seed_from_u64(config.seed),
            density: config.density,
            status: "place a start and an end, then press space".into(),
            last: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn last_run(&self) -> Option<&LastRun> {
        self.last.as_ref()
    }

    fn move_cursor(&mut self, d_row: i32, d_col: i32) {
        let p = self.cursor.shift(d_row, d_col);
        if self.grid.contains(p) {
            self.cursor = p;
        }
    }

    fn place(&mut self, p: Pos) {
        match self.grid.place(p) {
            Placement::Start => self.status = format!("start at {p}"),
            Placement::End => self.status = format!("end at {p}"),
            Placement::Obstacle | Placement::Unchanged => {}
        }
    }

    fn erase(&mut self, p: Pos) {
        self.grid.erase(p);
    }

    fn request_search(&mut self) -> Option<Effect> {
        if self.grid.start().is_none() || self.grid.end().is_none() {
            self.status = "place a start and an end first".into();
            return None;
        }
        Some(Effect::Job)
    }

    fn finish(&mut self, run: LastRun) {
        self.status = run.summary();
        self.last = Some(run);
    }
}

impl Model for Visualizer {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Init => None,
            Msg::Quit => Some(Effect::End),
            Msg::Screen { .. } => None,

            Msg::KeyDown { ref key, .. } => {
                match key {
                    Key::Escape | Key::Char('q') => return Some(Effect::End),
                    Key::ArrowUp | Key::Char('k') => self.move_cursor(-1, 0),
                    Key::ArrowDown | Key::Char('j') => self.move_cursor(1, 0),
                    Key::ArrowLeft | Key::Char('h') => self.move_cursor(0, -1),
                    Key::ArrowRight | Key::Char('l') => self.move_cursor(0, 1),
                    Key::Enter => self.place(self.cursor),
                    Key::Backspace | Key::Delete => self.erase(self.cursor),
                    Key::Space => return self.request_search(),
                    Key::Char('r') => {
                        self.grid.clear_search();
                        self.status = "search cleared".into();
                    }
                    Key::Char('c') => {
                        self.grid.reset();
                        self.last = None;
                        self.status = "grid reset".into();
                    }
                    Key::Char('g') => {
                        self.grid.clear_search();
                        let n = self.grid.scatter(&mut self.rng, self.density);
                        log::debug!("scattered {n} obstacles");
                        self.status = format!("scattered {n} obstacles");
                    }
                    _ => {}
                }
                None
            }

            Msg::Mouse { action, x, y, .. } => {
                if let Some(p) = self.grid.locate(x, y) {
                    self.cursor = p;
                    match action {
                        MouseAction::Main => self.place(p),
                        MouseAction::Secondary => self.erase(p),
                        MouseAction::Release | MouseAction::Move => {}
                    }
                }
                None
            }
        }
    }

    fn draw(&self, screen: &mut Screen) {
        draw_board(screen, &self.grid, &self.palette, self.cursor);
        draw_footer(screen, self.grid.dimension(), &self.status);
    }

    fn run_job(&mut self, live: &mut Live<'_>) -> Option<Effect> {
        let (Some(start), Some(end)) = (self.grid.start(), self.grid.end()) else {
            return None;
        };
        self.grid.clear_search();
        self.grid.update_neighbors();

        let ctx = live.context().clone();
        let mut sink = LiveSink {
            live,
            palette: self.palette,
            cursor: self.cursor,
            quit: false,
            error: None,
        };
        let result = self
            .search
            .run(&mut self.grid, start, end, &mut sink, &ctx);
        let LiveSink { quit, error, .. } = sink;
        let stats = self.search.stats();

        let run = match (error, result) {
            (Some(e), _) => LastRun::Failed(e),
            (None, Ok(SearchOutcome::Found(path))) => LastRun::Found {
                cells: path.len(),
                cost: path.cost(),
                stats,
            },
            (None, Ok(SearchOutcome::NoPath)) => LastRun::NoPath(stats),
            (None, Err(SearchError::Cancelled)) => LastRun::Cancelled(stats),
            (None, Err(SearchError::InvalidEndpoints(e))) => LastRun::Rejected(e),
        };
        log::info!("{}", run.summary());
        self.finish(run);

        quit.then_some(Effect::End)
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn cell_glyph(cell: &Cell, palette: &Palette) -> Glyph {
    let state = cell.state();
    let ch = match state {
        CellState::Empty => ' ',
        _ => state.symbol(),
    };
    Glyph::new(ch, palette.cell(state))
}

/// Draw every cell at its origin, highlighting the keyboard cursor.
fn draw_board(screen: &mut Screen, grid: &Grid, palette: &Palette, cursor: Pos) {
    for cell in grid.iter() {
        let (x, y) = cell.origin();
        let mut glyph = cell_glyph(cell, palette);
        if cell.pos() == cursor {
            glyph.style = glyph.style.with_bg(COL_CURSOR);
        }
        screen.set(x, y, glyph);
    }
}

fn draw_footer(screen: &mut Screen, board_rows: i32, status: &str) {
    let status_style = Style::default()
        .with_fg(COL_STATUS_FG)
        .with_bg(COL_STATUS_BG);
    let help_style = Style::default().with_fg(COL_HELP_FG);
    for x in 0..screen.width() {
        screen.set(x, board_rows, Glyph::new(' ', status_style));
        screen.set(x, board_rows + 1, Glyph::new(' ', help_style));
    }
    screen.print(0, board_rows, &format!(" {status}"), status_style);
    screen.print(0, board_rows + 1, HELP_LINE, help_style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use stargrid_core::{App, AppConfig, Context, Driver, Frame};
    use std::collections::VecDeque;
    use std::error::Error;
    use std::sync::mpsc::Sender;
    use std::time::Duration;

    /// Feeds one scripted batch per poll. Once the script runs out, idle
    /// polls ask to quit and the non-blocking polls of a running search get
    /// nothing.
    #[derive(Default)]
    struct ScriptDriver {
        script: VecDeque<Vec<Msg>>,
        flushed: usize,
    }

    impl Driver for ScriptDriver {
        fn init(&mut self) -> Result<(), Box<dyn Error>> {
            Ok(())
        }

        fn poll_msgs(
            &mut self,
            _ctx: &Context,
            tx: Sender<Msg>,
            wait: Duration,
        ) -> Result<(), Box<dyn Error>> {
            let batch = match self.script.pop_front() {
                Some(batch) => batch,
                None if wait.is_zero() => Vec::new(),
                None => vec![Msg::key(Key::Char('q'))],
            };
            for m in batch {
                tx.send(m).ok();
            }
            Ok(())
        }

        fn flush(&mut self, _frame: Frame) -> Result<(), Box<dyn Error>> {
            self.flushed += 1;
            Ok(())
        }

        fn close(&mut self) {}
    }

    fn config(rows: i32) -> Config {
        Config {
            rows,
            frame_delay: Duration::ZERO,
            seed: 3,
            ..Config::default()
        }
    }

    fn run(viz: Visualizer, script: Vec<Vec<Msg>>) -> App<Visualizer, ScriptDriver> {
        let n = viz.grid().dimension();
        let mut app = App::new(AppConfig {
            model: viz,
            driver: ScriptDriver {
                script: script.into(),
                ..Default::default()
            },
            width: n.max(HELP_LINE.len() as i32),
            height: n + FOOTER_ROWS,
            frame_delay: Duration::ZERO,
        });
        app.run().unwrap();
        app
    }

    fn click(x: i32, y: i32) -> Msg {
        Msg::mouse(MouseAction::Main, x, y)
    }

    #[test]
    fn clicks_place_start_end_then_walls() {
        let mut viz = Visualizer::new(&config(5));
        viz.update(click(0, 0));
        viz.update(click(4, 4));
        viz.update(click(2, 2));
        viz.update(click(0, 0));
        assert_eq!(viz.grid().start(), Some(Pos::new(0, 0)));
        assert_eq!(viz.grid().end(), Some(Pos::new(4, 4)));
        assert_eq!(viz.grid().state(Pos::new(2, 2)), Some(CellState::Obstacle));

        viz.update(Msg::mouse(MouseAction::Secondary, 0, 0));
        assert_eq!(viz.grid().start(), None);
        assert_eq!(viz.cursor(), Pos::new(0, 0));

        // Outside the board.
        viz.update(click(9, 1));
        assert_eq!(viz.cursor(), Pos::new(0, 0));
    }

    #[test]
    fn keyboard_cursor_stays_on_the_board() {
        let mut viz = Visualizer::new(&config(3));
        viz.update(Msg::key(Key::ArrowUp));
        viz.update(Msg::key(Key::Char('h')));
        assert_eq!(viz.cursor(), Pos::ZERO);
        for _ in 0..5 {
            viz.update(Msg::key(Key::Char('j')));
            viz.update(Msg::key(Key::ArrowRight));
        }
        assert_eq!(viz.cursor(), Pos::new(2, 2));

        viz.update(Msg::key(Key::Enter));
        assert_eq!(viz.grid().start(), Some(Pos::new(2, 2)));
        viz.update(Msg::key(Key::Delete));
        assert_eq!(viz.grid().start(), None);
    }

    #[test]
    fn search_needs_both_endpoints() {
        let mut viz = Visualizer::new(&config(4));
        assert_eq!(viz.update(Msg::key(Key::Space)), None);
        assert_eq!(viz.status(), "place a start and an end first");
        viz.update(click(0, 0));
        viz.update(click(3, 3));
        assert_eq!(viz.update(Msg::key(Key::Space)), Some(Effect::Job));
    }

    #[test]
    fn quit_keys() {
        let mut viz = Visualizer::new(&config(2));
        assert_eq!(viz.update(Msg::key(Key::Char('q'))), Some(Effect::End));
        assert_eq!(viz.update(Msg::key(Key::Escape)), Some(Effect::End));
        assert_eq!(viz.update(Msg::Quit), Some(Effect::End));
    }

    #[test]
    fn scatter_is_seeded_and_reset_clears() {
        let mut a = Visualizer::new(&config(10));
        let mut b = Visualizer::new(&config(10));
        a.update(Msg::key(Key::Char('g')));
        b.update(Msg::key(Key::Char('g')));
        assert_eq!(a.grid().to_ascii(), b.grid().to_ascii());
        assert!(a.grid().count(CellState::Obstacle) > 0);

        a.update(Msg::key(Key::Char('c')));
        assert_eq!(a.grid().count(CellState::Obstacle), 0);
        assert_eq!(a.status(), "grid reset");
    }

    #[test]
    fn live_search_finds_the_path() {
        let viz = Visualizer::new(&config(5));
        let app = run(
            viz,
            vec![vec![click(0, 0), click(4, 4), Msg::key(Key::Space)]],
        );
        let viz = app.model();
        match viz.last_run() {
            Some(LastRun::Found { cells, cost, stats }) => {
                assert_eq!(*cells, 9);
                assert_eq!(*cost, 8);
                assert_eq!(stats.frames, stats.expanded + 8);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(viz.grid().count(CellState::Path), 7);
        assert!(viz.status().starts_with("path: 9 cells"));
        assert!(app.driver().flushed > 9);
    }

    #[test]
    fn walled_off_end_reports_no_path() {
        let grid = Grid::from_ascii(
            "S.#..
             ..#..
             ###..
             .....
             ....E",
            1,
        )
        .unwrap();
        let viz = Visualizer::with_grid(grid, &config(5));
        let app = run(viz, vec![vec![Msg::key(Key::Space)]]);
        assert_eq!(
            app.model().last_run(),
            Some(&LastRun::NoPath(SearchStats {
                expanded: 4,
                pushed: 4,
                relaxed: 3,
                frames: 4,
            }))
        );
    }

    #[test]
    fn escape_cancels_the_search_but_not_the_app() {
        let viz = Visualizer::new(&config(8));
        let app = run(
            viz,
            vec![
                vec![click(0, 0), click(7, 7), Msg::key(Key::Space)],
                // Read by the first frame of the search.
                vec![Msg::key(Key::Escape)],
                vec![Msg::key(Key::Char('r'))],
            ],
        );
        let viz = app.model();
        assert!(matches!(
            viz.last_run(),
            Some(LastRun::Cancelled(SearchStats { expanded: 1, .. }))
        ));
        // The app kept running long enough to handle `r`.
        assert_eq!(viz.status(), "search cleared");
        assert_eq!(viz.grid().count(CellState::Frontier), 0);
    }

    #[test]
    fn q_during_search_quits() {
        let viz = Visualizer::new(&config(8));
        let app = run(
            viz,
            vec![
                vec![click(0, 0), click(7, 7), Msg::key(Key::Space)],
                vec![Msg::key(Key::Char('q'))],
                vec![Msg::key(Key::Char('c'))],
            ],
        );
        let viz = app.model();
        assert!(matches!(viz.last_run(), Some(LastRun::Cancelled(_))));
        // `c` was never processed.
        assert!(viz.grid().start().is_some());
    }

    #[test]
    fn footer_shows_status() {
        let mut viz = Visualizer::new(&config(3));
        viz.update(Msg::key(Key::Char('r')));
        let mut screen = Screen::new(40, 3 + FOOTER_ROWS);
        viz.draw(&mut screen);
        let row: String = (0..15).map(|x| screen.at(x, 3).ch).collect();
        assert_eq!(row, " search cleared");
        assert_eq!(screen.at(0, 0).style.bg, COL_CURSOR);
        assert_eq!(screen.at(1, 0).style.bg, Palette::default().empty);
    }
}
