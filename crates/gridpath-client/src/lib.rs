//! **gridpath-client**: talks to the external path-finding service.
//!
//! The service is opaque: it receives a start and an end cell and answers
//! with an ordered list of cells (possibly empty). [`PathService`] is the
//! seam the visualizer depends on; [`HttpPathClient`] is the production
//! implementation.

pub mod error;
pub mod http;
pub mod wire;

use std::sync::Arc;

use gridpath_core::Point;

pub use error::PathRequestError;
pub use http::HttpPathClient;
pub use wire::{PathRequest, PathResponse};

/// Something that can resolve a path between two cells.
///
/// Implementations block until the exchange completes; callers run them off
/// the UI loop.
pub trait PathService: Send + Sync {
    /// Request the ordered path from `start` to `end`.
    ///
    /// An empty vector means "no path found".
    fn request_path(&self, start: Point, end: Point) -> Result<Vec<Point>, PathRequestError>;
}

impl<S: PathService + ?Sized> PathService for Arc<S> {
    fn request_path(&self, start: Point, end: Point) -> Result<Vec<Point>, PathRequestError> {
        (**self).request_path(start, end)
    }
}
