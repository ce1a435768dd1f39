//! Animation sequencer: reveals a resolved path one cell at a time.
//!
//! The sequencer owns the path and the revealed prefix. A ticker
//! subscription sends one [`Step`] per delay; each step carries the
//! generation it was started for, so steps from a cancelled run are
//! recognised and dropped even if they were already queued.

use std::time::Duration;

use gridpath_core::app::{sub, Context, Effect};
use gridpath_core::{Msg, Point};

use crate::event::Event;

/// Request to reveal the cell at `index` of the run `generation`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub generation: u64,
    pub index: usize,
}

/// Result of feeding a [`Step`] to the sequencer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// One more cell is revealed; the run continues.
    Revealed,
    /// The last cell was revealed; the run is over.
    Finished,
    /// The step belongs to an older run or is out of order.
    Stale,
}

/// Incremental reveal of the current path.
#[derive(Debug)]
pub struct Sequencer {
    delay: Duration,
    path: Vec<Point>,
    revealed: usize,
    generation: u64,
    ticker: Option<Context>,
}

impl Sequencer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            path: Vec::new(),
            revealed: 0,
            generation: 0,
            ticker: None,
        }
    }

    /// The revealed prefix of the current path.
    pub fn revealed(&self) -> &[Point] {
        &self.path[..self.revealed]
    }

    /// The full path of the current run.
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether steps are still pending.
    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Stop the current run (its ticker wakes up and exits without sending
    /// anything further) and clear the revealed path.
    pub fn cancel(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
            log::debug!(
                "animation {} cancelled at {}/{}",
                self.generation,
                self.revealed,
                self.path.len()
            );
        }
        self.generation += 1;
        self.path.clear();
        self.revealed = 0;
    }

    /// Start revealing `path`, replacing any previous run.
    ///
    /// Returns the ticker effect, or `None` for an empty path: there is
    /// nothing to reveal and no delay is incurred.
    pub fn start(&mut self, path: Vec<Point>) -> Option<Effect<Event>> {
        self.cancel();
        if path.is_empty() {
            return None;
        }
        self.path = path;
        let ticker = Context::new();
        self.ticker = Some(ticker.clone());
        log::debug!("animation {} started ({} cells)", self.generation, self.path.len());
        Some(Self::ticker(self.generation, self.path.len(), self.delay, ticker))
    }

    /// Apply a ticker step.
    pub fn step(&mut self, step: Step) -> StepOutcome {
        if step.generation != self.generation || step.index != self.revealed || !self.is_running() {
            return StepOutcome::Stale;
        }
        self.revealed += 1;
        if self.revealed == self.path.len() {
            self.ticker = None;
            log::debug!("animation {} finished", self.generation);
            StepOutcome::Finished
        } else {
            StepOutcome::Revealed
        }
    }

    fn ticker(generation: u64, len: usize, delay: Duration, token: Context) -> Effect<Event> {
        sub(move |app: Context, tx| {
            for index in 0..len {
                if !token.sleep(delay) || app.is_done() {
                    return;
                }
                let step = Step { generation, index };
                if tx.send(Msg::App(Event::Reveal(step))).is_err() {
                    return;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Instant;

    fn path3() -> Vec<Point> {
        vec![Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)]
    }

    /// Run a ticker effect to completion on this thread.
    fn collect_steps(effect: Effect<Event>, app: Context) -> Vec<Step> {
        let f = match effect {
            Effect::Sub(f) => f,
            other => panic!("expected a subscription, got {other:?}"),
        };
        let (tx, rx) = mpsc::channel();
        f(app, tx);
        rx.try_iter()
            .map(|msg| match msg {
                Msg::App(Event::Reveal(step)) => step,
                other => panic!("unexpected {other:?}"),
            })
            .collect()
    }

    #[test]
    fn reveals_in_order_one_cell_per_step() {
        let mut seq = Sequencer::new(Duration::ZERO);
        let effect = seq.start(path3()).unwrap();
        let steps = collect_steps(effect, Context::new());
        assert_eq!(steps.len(), 3);

        let mut seen = vec![seq.revealed().to_vec()];
        let mut outcomes = Vec::new();
        for s in steps {
            outcomes.push(seq.step(s));
            seen.push(seq.revealed().to_vec());
        }
        let p = path3();
        assert_eq!(
            seen,
            vec![vec![], vec![p[0]], vec![p[0], p[1]], p.clone()]
        );
        assert_eq!(
            outcomes,
            vec![StepOutcome::Revealed, StepOutcome::Revealed, StepOutcome::Finished]
        );
        assert!(!seq.is_running());
    }

    #[test]
    fn empty_path_has_no_ticker() {
        let mut seq = Sequencer::new(Duration::from_secs(60));
        assert!(seq.start(Vec::new()).is_none());
        assert!(seq.revealed().is_empty());
        assert!(!seq.is_running());
    }

    #[test]
    fn out_of_order_step_is_stale() {
        let mut seq = Sequencer::new(Duration::ZERO);
        seq.start(path3());
        let g = seq.generation();
        assert_eq!(seq.step(Step { generation: g, index: 1 }), StepOutcome::Stale);
        assert!(seq.revealed().is_empty());
        assert_eq!(seq.step(Step { generation: g, index: 0 }), StepOutcome::Revealed);
        assert_eq!(seq.step(Step { generation: g, index: 0 }), StepOutcome::Stale);
        assert_eq!(seq.revealed(), &path3()[..1]);
    }

    #[test]
    fn steps_from_a_replaced_run_are_stale() {
        let mut seq = Sequencer::new(Duration::ZERO);
        seq.start(path3());
        let old = seq.generation();
        seq.start(vec![Point::new(7, 7)]);
        assert_eq!(seq.step(Step { generation: old, index: 0 }), StepOutcome::Stale);
        assert!(seq.revealed().is_empty());
        assert_eq!(
            seq.step(Step { generation: seq.generation(), index: 0 }),
            StepOutcome::Finished
        );
        assert_eq!(seq.revealed(), &[Point::new(7, 7)]);
    }

    #[test]
    fn cancel_clears_and_invalidates() {
        let mut seq = Sequencer::new(Duration::ZERO);
        seq.start(path3());
        let g = seq.generation();
        seq.step(Step { generation: g, index: 0 });
        seq.cancel();
        assert!(seq.revealed().is_empty());
        assert!(seq.path().is_empty());
        assert!(!seq.is_running());
        assert_eq!(seq.step(Step { generation: g, index: 1 }), StepOutcome::Stale);
    }

    #[test]
    fn cancel_stops_the_ticker() {
        let mut seq = Sequencer::new(Duration::from_millis(200));
        let Effect::Sub(f) = seq.start(path3()).unwrap() else {
            panic!("expected a subscription");
        };
        let (tx, rx) = mpsc::channel();
        let started = Instant::now();
        let handle = thread::spawn(move || f(Context::new(), tx));
        thread::sleep(Duration::from_millis(20));
        seq.cancel();
        handle.join().unwrap();

        assert!(started.elapsed() < Duration::from_millis(190));
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn app_shutdown_stops_the_ticker() {
        let mut seq = Sequencer::new(Duration::ZERO);
        let effect = seq.start(path3()).unwrap();
        let app = Context::new();
        app.cancel();
        assert!(collect_steps(effect, app).is_empty());
    }

    #[test]
    fn ticker_waits_between_steps() {
        let mut seq = Sequencer::new(Duration::from_millis(15));
        let effect = seq.start(path3()).unwrap();
        let started = Instant::now();
        let steps = collect_steps(effect, Context::new());
        assert_eq!(steps.len(), 3);
        assert!(started.elapsed() >= Duration::from_millis(45));
    }

    proptest! {
        #[test]
        fn revealed_is_always_a_growing_prefix(
            len in 1usize..12,
            feed in prop::collection::vec((0u64..3, 0usize..12), 0..60),
        ) {
            let path: Vec<Point> = (0..len as i32).map(|i| Point::new(i, i)).collect();
            let mut seq = Sequencer::new(Duration::ZERO);
            seq.start(path.clone());
            let base = seq.generation();
            let mut prev = 0;
            for (dg, index) in feed {
                seq.step(Step { generation: base.saturating_sub(dg), index });
                let r = seq.revealed();
                prop_assert!(r.len() >= prev);
                prop_assert_eq!(r, &path[..r.len()]);
                prev = r.len();
            }
        }
    }
}
