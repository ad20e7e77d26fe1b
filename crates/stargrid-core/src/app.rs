//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`], and the [`Live`] presenter used by long-running jobs.

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crate::messages::Msg;
use crate::screen::{Frame, Screen, compute_frame};

/// How long the idle loop waits for input before redrawing.
const IDLE_POLL: Duration = Duration::from_millis(16);

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A simple cooperative-cancellation token backed by an [`AtomicBool`].
///
/// Clones share the same flag.
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Call [`Model::run_job`] with a [`Live`] presenter.
    Job,
    /// Signal the application loop to stop.
    End,
}

// ---------------------------------------------------------------------------
// Model / Driver
// ---------------------------------------------------------------------------

/// The application model (Elm architecture).
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `screen`.
    fn draw(&self, screen: &mut Screen);

    /// Run a synchronous job that presents intermediate frames through
    /// `live`. Requested by returning [`Effect::Job`] from `update`.
    fn run_job(&mut self, _live: &mut Live<'_>) -> Option<Effect> {
        None
    }
}

/// Back-end driver (terminal, test harness, ...).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn Error>>;

    /// Send pending input messages through `tx`, waiting at most `wait` for
    /// the first one. Should return early once `ctx.is_done()`.
    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: Sender<Msg>,
        wait: Duration,
    ) -> Result<(), Box<dyn Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn Error>>;

    /// Clean up / restore the terminal.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// Live
// ---------------------------------------------------------------------------

/// Presenter handed to [`Model::run_job`].
///
/// Each [`present`](Live::present) call draws, diffs and flushes a frame,
/// then polls the driver without blocking. A [`Msg::Quit`] received while
/// polling cancels both the job context and the application; every other
/// message is kept in an inbox for the job to inspect.
pub struct Live<'a> {
    driver: &'a mut dyn Driver,
    prev: &'a mut Screen,
    curr: &'a mut Screen,
    app: &'a Context,
    job: Context,
    frame_delay: Duration,
    inbox: Vec<Msg>,
    frames: usize,
}

impl<'a> Live<'a> {
    pub fn new(
        driver: &'a mut dyn Driver,
        prev: &'a mut Screen,
        curr: &'a mut Screen,
        app: &'a Context,
        frame_delay: Duration,
    ) -> Self {
        Self {
            driver,
            prev,
            curr,
            app,
            job: Context::new(),
            frame_delay,
            inbox: Vec::new(),
            frames: 0,
        }
    }

    /// Cancellation token scoped to this job.
    #[inline]
    pub fn context(&self) -> &Context {
        &self.job
    }

    /// Whether the user asked to quit the whole application.
    #[inline]
    pub fn quit_requested(&self) -> bool {
        self.app.is_done()
    }

    /// Number of frames presented so far.
    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Take the messages received since the last call.
    pub fn take_msgs(&mut self) -> Vec<Msg> {
        std::mem::take(&mut self.inbox)
    }

    /// Draw a frame with `draw`, flush the changes and poll for input.
    pub fn present(&mut self, draw: impl FnOnce(&mut Screen)) -> Result<(), Box<dyn Error>> {
        draw(&mut *self.curr);
        let frame = compute_frame(&*self.prev, &*self.curr);
        if !frame.cells.is_empty() {
            self.driver.flush(frame)?;
        }
        self.prev.copy_from(&*self.curr);
        self.frames += 1;
        if !self.frame_delay.is_zero() {
            std::thread::sleep(self.frame_delay);
        }
        self.poll()
    }

    fn poll(&mut self) -> Result<(), Box<dyn Error>> {
        let (tx, rx) = mpsc::channel();
        self.driver.poll_msgs(self.app, tx, Duration::ZERO)?;
        for msg in rx.try_iter() {
            if matches!(msg, Msg::Quit) {
                log::info!("quit requested during job");
                self.app.cancel();
                self.job.cancel();
            }
            self.inbox.push(msg);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
    /// Pause after each frame presented by a job.
    pub frame_delay: Duration,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
    frame_delay: Duration,
}

impl<M: Model, D: Driver> App<M, D> {
    /// Create a new application from a configuration.
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
            frame_delay: config.frame_delay,
        }
    }

    /// The model, e.g. to inspect it after [`run`](Self::run) returns.
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run the main Model-View-Update loop.
    ///
    /// 1. Initialises the driver.
    /// 2. Sends `Msg::Init` through the model.
    /// 3. Enters the event loop: poll → update → draw → diff → flush.
    /// 4. Stops when the model returns `Effect::End` or a job observes
    ///    `Msg::Quit`. The driver is closed on every exit path.
    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        self.driver.init()?;
        let result = self.event_loop();
        self.driver.close();
        result
    }

    fn event_loop(&mut self) -> Result<(), Box<dyn Error>> {
        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        tx.send(Msg::Init).ok();

        let mut prev = Screen::new(self.width, self.height);
        let mut curr = Screen::new(self.width, self.height);

        self.process_pending(&rx, &ctx, &mut prev, &mut curr)?;

        while !ctx.is_done() {
            self.driver.poll_msgs(&ctx, tx.clone(), IDLE_POLL)?;
            if ctx.is_done() {
                break;
            }
            self.process_pending(&rx, &ctx, &mut prev, &mut curr)?;
        }
        Ok(())
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
        prev: &mut Screen,
        curr: &mut Screen,
    ) -> Result<(), Box<dyn Error>> {
        let mut needs_draw = false;

        while let Ok(msg) = rx.try_recv() {
            if let Msg::Screen { width, height, .. } = msg {
                self.width = width;
                self.height = height;
                // An empty previous screen forces a full redraw.
                *prev = Screen::new(0, 0);
                *curr = Screen::new(width, height);
            }
            let effect = self.model.update(msg);
            needs_draw = true;
            if self.handle_effect(effect, ctx, prev, curr)? {
                return Ok(());
            }
        }

        if needs_draw {
            self.model.draw(curr);
            let frame = compute_frame(prev, curr);
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            prev.copy_from(curr);
        }

        Ok(())
    }

    /// Returns `true` if the app should stop.
    fn handle_effect(
        &mut self,
        mut effect: Option<Effect>,
        ctx: &Context,
        prev: &mut Screen,
        curr: &mut Screen,
    ) -> Result<bool, Box<dyn Error>> {
        while let Some(e) = effect.take() {
            match e {
                Effect::End => {
                    ctx.cancel();
                    return Ok(true);
                }
                Effect::Job => {
                    let mut live = Live::new(
                        &mut self.driver,
                        &mut *prev,
                        &mut *curr,
                        ctx,
                        self.frame_delay,
                    );
                    effect = self.model.run_job(&mut live);
                    log::debug!("job finished after {} frames", live.frames());
                    if ctx.is_done() {
                        return Ok(true);
                    }
                }
            }
        }
        Ok(false)
    }
}
