//! Events produced by the visualizer's own effects.

use gridpath_client::PathRequestError;
use gridpath_core::Point;

use crate::animation::Step;

/// Application events fed back into the update loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The path service answered the request issued in cycle `cycle`.
    PathResolved {
        cycle: u64,
        result: Result<Vec<Point>, PathRequestError>,
    },
    /// The animation ticker asks for the next cell to be revealed.
    Reveal(Step),
}
