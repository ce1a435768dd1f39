//! **gridpath**: pick a start and an end cell on a square grid, ask an
//! external path-finding service for the route between them, and watch it
//! being revealed one cell at a time.

pub mod animation;
pub mod colors;
pub mod config;
pub mod event;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod selection;

pub use event::Event;
pub use model::{Settings, Snapshot, Visualizer};
pub use presentation::{DisplayCategory, DisplayTable};
pub use selection::Selection;
