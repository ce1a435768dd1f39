//! The selection state machine: which cells the user has picked in the
//! current cycle.

use gridpath_core::Point;

/// The user's picks for one cycle.
///
/// The shape of the enum makes "end without start" unrepresentable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    /// Nothing picked yet.
    #[default]
    Idle,
    /// Start picked, waiting for the end cell.
    AwaitingEnd { start: Point },
    /// Both picked; the path has been requested (and may be animating).
    Resolved { start: Point, end: Point },
}

/// What a click did, and therefore what the caller has to do next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// `Idle → AwaitingEnd`: nothing else to do.
    Started { start: Point },
    /// `AwaitingEnd → Resolved`: request exactly one path for the pair.
    Completed { start: Point, end: Point },
    /// `Resolved → Idle`: tear down the cycle (cancel animation, drop path).
    Reset,
}

impl Selection {
    pub fn start(&self) -> Option<Point> {
        match *self {
            Self::Idle => None,
            Self::AwaitingEnd { start } | Self::Resolved { start, .. } => Some(start),
        }
    }

    pub fn end(&self) -> Option<Point> {
        match *self {
            Self::Resolved { end, .. } => Some(end),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// Advance the machine with a click on `cell`.
    pub fn click(&mut self, cell: Point) -> Transition {
        match *self {
            Self::Idle => {
                *self = Self::AwaitingEnd { start: cell };
                Transition::Started { start: cell }
            }
            Self::AwaitingEnd { start } => {
                *self = Self::Resolved { start, end: cell };
                Transition::Completed { start, end: cell }
            }
            Self::Resolved { .. } => self.reset(),
        }
    }

    /// Drop both picks.
    pub fn reset(&mut self) -> Transition {
        *self = Self::Idle;
        Transition::Reset
    }

    /// The hint shown to the user for the current phase.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Idle => "Select start point",
            Self::AwaitingEnd { .. } => "Select end point",
            Self::Resolved { .. } => "Click anywhere to reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn three_clicks_make_a_full_cycle() {
        let mut s = Selection::default();
        let a = Point::new(2, 2);
        let b = Point::new(5, 5);

        assert_eq!(s.click(a), Transition::Started { start: a });
        assert_eq!(s, Selection::AwaitingEnd { start: a });
        assert_eq!(s.prompt(), "Select end point");

        assert_eq!(s.click(b), Transition::Completed { start: a, end: b });
        assert_eq!(s.start(), Some(a));
        assert_eq!(s.end(), Some(b));
        assert!(s.is_resolved());

        assert_eq!(s.click(Point::new(9, 9)), Transition::Reset);
        assert_eq!(s, Selection::Idle);
        assert_eq!(s.prompt(), "Select start point");
    }

    #[test]
    fn start_and_end_may_coincide() {
        let mut s = Selection::default();
        let a = Point::new(3, 3);
        s.click(a);
        assert_eq!(s.click(a), Transition::Completed { start: a, end: a });
    }

    fn cell() -> impl Strategy<Value = Point> {
        (0..20i32, 0..20i32).prop_map(|(x, y)| Point::new(x, y))
    }

    proptest! {
        #[test]
        fn end_never_without_start(clicks in prop::collection::vec(cell(), 0..40)) {
            let mut s = Selection::default();
            for c in clicks {
                s.click(c);
                if s.end().is_some() {
                    prop_assert!(s.start().is_some());
                }
            }
        }

        #[test]
        fn one_request_per_completed_pair(clicks in prop::collection::vec(cell(), 0..40)) {
            let mut s = Selection::default();
            let mut completed = 0;
            for c in &clicks {
                let before = s;
                let t = s.click(*c);
                // At most one of start/end is newly assigned per click.
                let new_start = before.start().is_none() && s.start().is_some();
                let new_end = before.end().is_none() && s.end().is_some();
                prop_assert!(!(new_start && new_end));
                if let Transition::Completed { start, end } = t {
                    prop_assert_eq!(Some(start), before.start());
                    prop_assert_eq!(end, *c);
                    completed += 1;
                }
            }
            // Clicks cycle Idle → AwaitingEnd → Resolved → Idle.
            let expected = clicks.len() / 3 + usize::from(clicks.len() % 3 == 2);
            prop_assert_eq!(completed, expected);
        }
    }
}
