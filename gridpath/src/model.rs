//! The visualizer model: one selection cycle at a time, the path request it
//! triggers, and the animation of the answer.
//!
//! All state lives here and is only mutated from [`Model::update`]. Effects
//! (the request and the animation ticker) report back through [`Event`]s
//! tagged with the cycle id or animation generation they belong to;
//! anything tagged for a superseded cycle is dropped.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use gridpath_client::{PathRequestError, PathService};
use gridpath_core::app::{cmd, Effect, Model};
use gridpath_core::{Cell, Grid, Key, ModMask, MouseAction, Msg, Point, Range};

use crate::animation::{Sequencer, Step, StepOutcome};
use crate::colors;
use crate::event::Event;
use crate::presentation::DisplayTable;
use crate::selection::{Selection, Transition};

const TITLE: &str = "Pathfinding Grid";
/// Terminal columns per grid cell, so cells look roughly square.
const CELL_WIDTH: i32 = 2;
/// First screen row of the board.
const BOARD_TOP: i32 = 2;
const MIN_WIDTH: i32 = 40;

/// Runtime parameters of the visualizer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub grid_size: i32,
    pub animation_delay: Duration,
}

/// Where the current cycle's path lookup stands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// No request issued in this cycle.
    None,
    /// Request in flight.
    Pending,
    /// The service found nothing (or the request failed).
    NoPath,
    /// A path arrived and is being (or has been) revealed.
    Found,
}

/// The state published to subscribers after every change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub cycle: u64,
    pub selection: Selection,
    pub revealed: Vec<Point>,
}

/// Elm model of the interactive grid.
pub struct Visualizer {
    grid_size: i32,
    service: Arc<dyn PathService>,
    selection: Selection,
    cycle: u64,
    lookup: Lookup,
    sequencer: Sequencer,
    hover: Option<Point>,
    subscribers: Vec<Sender<Snapshot>>,
}

impl Visualizer {
    pub fn new(settings: Settings, service: Arc<dyn PathService>) -> Self {
        Self {
            grid_size: settings.grid_size,
            service,
            selection: Selection::default(),
            cycle: 0,
            lookup: Lookup::None,
            sequencer: Sequencer::new(settings.animation_delay),
            hover: None,
            subscribers: Vec::new(),
        }
    }

    /// Screen size needed to draw the model, `(width, height)`.
    pub fn screen_size(&self) -> (i32, i32) {
        let board = self.board();
        (board.max.x.max(MIN_WIDTH), board.max.y + 2)
    }

    /// Screen area covered by the board.
    fn board(&self) -> Range {
        Range::new(
            0,
            BOARD_TOP,
            self.grid_size * CELL_WIDTH,
            BOARD_TOP + self.grid_size,
        )
    }

    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn revealed(&self) -> &[Point] {
        self.sequencer.revealed()
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn lookup(&self) -> Lookup {
        self.lookup
    }

    /// Display category of every cell for the current state.
    pub fn display_table(&self) -> DisplayTable {
        DisplayTable::compute(self.grid_size, &self.selection, self.revealed())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cycle: self.cycle,
            selection: self.selection,
            revealed: self.revealed().to_vec(),
        }
    }

    /// Receive a [`Snapshot`] after every state change, starting with the
    /// current one.
    pub fn subscribe(&mut self) -> Receiver<Snapshot> {
        let (tx, rx) = mpsc::channel();
        tx.send(self.snapshot()).ok();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.subscribers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }

    /// Handle a click on grid cell `cell`.
    ///
    /// `cell` must lie inside the grid: the mouse handler never produces
    /// anything else, so an out-of-range cell is a bug.
    pub fn click(&mut self, cell: Point) -> Option<Effect<Event>> {
        debug_assert!(
            cell.in_square(self.grid_size),
            "click outside the grid: {cell}"
        );
        if !cell.in_square(self.grid_size) {
            log::error!("ignoring click outside the grid: {cell}");
            return None;
        }
        let transition = self.selection.click(cell);
        self.apply(transition)
    }

    fn apply(&mut self, transition: Transition) -> Option<Effect<Event>> {
        match transition {
            Transition::Started { start } => {
                log::debug!("cycle {}: start {start}", self.cycle);
                self.publish();
                None
            }
            Transition::Completed { start, end } => {
                log::info!("cycle {}: requesting path {start} -> {end}", self.cycle);
                self.lookup = Lookup::Pending;
                self.publish();
                Some(self.request(start, end))
            }
            Transition::Reset => {
                self.sequencer.cancel();
                self.cycle += 1;
                self.lookup = Lookup::None;
                log::debug!("cycle {} begins", self.cycle);
                self.publish();
                None
            }
        }
    }

    fn request(&self, start: Point, end: Point) -> Effect<Event> {
        let service = Arc::clone(&self.service);
        let cycle = self.cycle;
        cmd(move || {
            let result = service.request_path(start, end);
            Some(Msg::App(Event::PathResolved { cycle, result }))
        })
    }

    fn on_path_resolved(
        &mut self,
        cycle: u64,
        result: Result<Vec<Point>, PathRequestError>,
    ) -> Option<Effect<Event>> {
        if cycle != self.cycle || self.lookup != Lookup::Pending {
            log::debug!(
                "discarding response for cycle {cycle} (current cycle {})",
                self.cycle
            );
            return None;
        }

        let mut path = result.unwrap_or_else(|e| {
            log::warn!("path request failed, showing no path: {e}");
            Vec::new()
        });
        if let Some(bad) = path.iter().find(|p| !p.in_square(self.grid_size)).copied() {
            log::warn!("path service returned {bad}, outside the grid; showing no path");
            path.clear();
        }

        log::info!("cycle {}: path of {} cells", self.cycle, path.len());
        self.lookup = if path.is_empty() {
            Lookup::NoPath
        } else {
            Lookup::Found
        };
        let ticker = self.sequencer.start(path);
        self.publish();
        ticker
    }

    fn on_reveal(&mut self, step: Step) -> Option<Effect<Event>> {
        match self.sequencer.step(step) {
            StepOutcome::Stale => log::trace!("dropping stale {step:?}"),
            StepOutcome::Revealed | StepOutcome::Finished => self.publish(),
        }
        None
    }

    /// `pos` is relative to the board's top-left corner.
    fn on_mouse(&mut self, action: MouseAction, pos: Point) -> Option<Effect<Event>> {
        let cell = Point::new(pos.x.div_euclid(CELL_WIDTH), pos.y);
        let cell = cell.in_square(self.grid_size).then_some(cell);
        match action {
            MouseAction::Move => {
                self.hover = cell;
                None
            }
            MouseAction::Main => match cell {
                Some(c) => self.click(c),
                // "Click anywhere to reset" includes the rows around the board.
                None if self.selection.is_resolved() => {
                    let transition = self.selection.reset();
                    self.apply(transition)
                }
                None => None,
            },
            _ => None,
        }
    }

    fn status(&self) -> String {
        let prompt = self.selection.prompt();
        match self.lookup {
            Lookup::Pending => format!("{prompt} (searching...)"),
            Lookup::NoPath => format!("{prompt} (no path)"),
            Lookup::Found => format!(
                "{prompt} ({}/{} cells)",
                self.revealed().len(),
                self.sequencer.path().len()
            ),
            Lookup::None => prompt.to_string(),
        }
    }
}

impl Model for Visualizer {
    type Event = Event;

    fn update(&mut self, msg: Msg<Event>) -> Option<Effect<Event>> {
        match self.board().rel_msg(msg) {
            Msg::Init => {
                log::debug!("visualizer ready ({0}x{0} grid)", self.grid_size);
                None
            }
            Msg::Quit => Some(Effect::End),
            Msg::KeyDown { key, modifiers, .. } => match key {
                Key::Escape | Key::Char('q') => Some(Effect::End),
                Key::Char('c') if modifiers.contains(ModMask::CTRL) => Some(Effect::End),
                _ => None,
            },
            Msg::Mouse { action, pos, .. } => self.on_mouse(action, pos),
            Msg::Screen { .. } => None,
            Msg::App(Event::PathResolved { cycle, result }) => self.on_path_resolved(cycle, result),
            Msg::App(Event::Reveal(step)) => self.on_reveal(step),
        }
    }

    fn draw(&self, grid: &mut Grid) {
        grid.fill(Cell::default());
        grid.print(Point::ZERO, TITLE, colors::title_style());

        let board = self.board();
        for (cell, category) in self.display_table().iter() {
            let style = colors::cell_style(category, self.hover == Some(cell));
            let origin = board.min + Point::new(cell.x * CELL_WIDTH, cell.y);
            for dx in 0..CELL_WIDTH {
                grid.set(origin.shift(dx, 0), Cell::new(' ', style));
            }
        }

        grid.print(
            Point::new(0, board.max.y + 1),
            &self.status(),
            colors::status_style(),
        );
    }
}
