//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].
//!
//! The model is only ever touched by the loop thread. Commands and
//! subscriptions run on helper threads and talk back exclusively by sending
//! messages into the loop's channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::grid::{compute_frame, Frame, Grid};
use crate::messages::Msg;

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A cooperative-cancellation token backed by an [`AtomicBool`].
///
/// Clones share the same flag.
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Granularity of [`sleep`](Context::sleep)'s cancellation checks.
    const TICK: Duration = Duration::from_millis(10);

    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Release);
    }

    /// Sleep for `d`, waking early if the context is cancelled.
    ///
    /// Returns `true` if the full duration elapsed without cancellation.
    pub fn sleep(&self, d: Duration) -> bool {
        let deadline = Instant::now() + d;
        loop {
            if self.is_done() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep((deadline - now).min(Self::TICK));
        }
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

/// A one-shot command.
pub type CmdFn<E> = Box<dyn FnOnce() -> Option<Msg<E>> + Send>;

/// A long-running subscription.
pub type SubFn<E> = Box<dyn FnOnce(Context, Sender<Msg<E>>) + Send>;

/// A side-effect returned by [`Model::update`].
pub enum Effect<E> {
    /// A one-shot command that produces an optional follow-up message.
    Cmd(CmdFn<E>),
    /// A long-running subscription that may send many messages. It receives
    /// the application context, which is cancelled when the loop stops.
    Sub(SubFn<E>),
    /// Multiple effects batched together.
    Batch(Vec<Effect<E>>),
    /// Signal the application loop to stop.
    End,
}

impl<E> std::fmt::Debug for Effect<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cmd(_) => f.write_str("Effect::Cmd(..)"),
            Self::Sub(_) => f.write_str("Effect::Sub(..)"),
            Self::Batch(v) => f.debug_tuple("Effect::Batch").field(&v.len()).finish(),
            Self::End => f.write_str("Effect::End"),
        }
    }
}

/// Convenience constructor for an [`Effect::Cmd`].
pub fn cmd<E, F>(f: F) -> Effect<E>
where
    F: FnOnce() -> Option<Msg<E>> + Send + 'static,
{
    Effect::Cmd(Box::new(f))
}

/// Convenience constructor for an [`Effect::Sub`].
pub fn sub<E, F>(f: F) -> Effect<E>
where
    F: FnOnce(Context, Sender<Msg<E>>) + Send + 'static,
{
    Effect::Sub(Box::new(f))
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// The application model (Elm architecture).
pub trait Model {
    /// Application-defined events produced by effects.
    type Event: Send + 'static;

    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg<Self::Event>) -> Option<Effect<Self::Event>>;

    /// Render the current state into `grid`.
    fn draw(&self, grid: &mut Grid);
}

// ---------------------------------------------------------------------------
// Driver trait
// ---------------------------------------------------------------------------

/// Back-end driver (e.g. a terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Wait briefly for input and push any resulting messages into `tx`.
    ///
    /// Must return promptly (a few tens of milliseconds at most) so queued
    /// effect results are processed without noticeable delay.
    fn poll_msgs<E>(
        &mut self,
        ctx: &Context,
        tx: &Sender<Msg<E>>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Clean up / restore the terminal.
    fn close(&mut self);
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
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
}

impl<M: Model, D: Driver> App<M, D> {
    /// Create a new application from a configuration.
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run the Model-View-Update loop.
    ///
    /// 1. Initialises the driver.
    /// 2. Sends `Msg::Init` through the model.
    /// 3. Loops: poll → update → run effects → draw → diff → flush.
    /// 4. Stops when the model returns `Effect::End`; the application
    ///    context is then cancelled so subscriptions wind down.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;
        log::debug!("app loop started ({}x{})", self.width, self.height);

        let ctx = Context::new();
        let (tx, rx): (Sender<Msg<M::Event>>, Receiver<Msg<M::Event>>) = mpsc::channel();
        tx.send(Msg::Init).ok();

        // An empty previous grid forces a full first frame.
        let mut prev_grid = Grid::new(0, 0);
        let mut curr_grid = Grid::new(self.width, self.height);

        let result = self.event_loop(&ctx, &tx, &rx, &mut prev_grid, &mut curr_grid);
        ctx.cancel();
        self.driver.close();
        log::debug!("app loop stopped");
        result
    }

    fn event_loop(
        &mut self,
        ctx: &Context,
        tx: &Sender<Msg<M::Event>>,
        rx: &Receiver<Msg<M::Event>>,
        prev_grid: &mut Grid,
        curr_grid: &mut Grid,
    ) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            if self.process_pending(rx, ctx, tx, prev_grid, curr_grid)? {
                return Ok(());
            }
            self.driver.poll_msgs(ctx, tx)?;
        }
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    ///
    /// Returns `true` if the app should stop.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg<M::Event>>,
        ctx: &Context,
        tx: &Sender<Msg<M::Event>>,
        prev_grid: &mut Grid,
        curr_grid: &mut Grid,
    ) -> Result<bool, Box<dyn std::error::Error>> {
        let mut needs_draw = false;

        while let Ok(msg) = rx.try_recv() {
            if let Msg::Screen { .. } = msg {
                // The terminal was cleared by the resize; redraw everything.
                *prev_grid = Grid::new(0, 0);
            }
            if let Some(effect) = self.model.update(msg) {
                if Self::handle_effect(effect, ctx, tx) {
                    return Ok(true);
                }
            }
            needs_draw = true;
        }

        if needs_draw {
            self.model.draw(curr_grid);
            let frame = compute_frame(prev_grid, curr_grid);
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            prev_grid.clone_from(curr_grid);
        }

        Ok(false)
    }

    /// Returns `true` if the app should stop.
    fn handle_effect(effect: Effect<M::Event>, ctx: &Context, tx: &Sender<Msg<M::Event>>) -> bool {
        log::trace!("running {effect:?}");
        match effect {
            Effect::End => {
                ctx.cancel();
                true
            }
            Effect::Cmd(f) => {
                let tx = tx.clone();
                thread::spawn(move || {
                    if let Some(msg) = f() {
                        if tx.send(msg).is_err() {
                            log::trace!("command result dropped: loop has stopped");
                        }
                    }
                });
                false
            }
            Effect::Sub(f) => {
                let ctx = ctx.clone();
                let tx = tx.clone();
                thread::spawn(move || f(ctx, tx));
                false
            }
            Effect::Batch(effects) => {
                let mut stop = false;
                for e in effects {
                    stop |= Self::handle_effect(e, ctx, tx);
                    if stop {
                        break;
                    }
                }
                stop
            }
        }
    }
}
