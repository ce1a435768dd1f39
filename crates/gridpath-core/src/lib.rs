//! **gridpath-core**: grid geometry, styled screen cells, input messages and
//! the Elm-architecture application loop used by the *gridpath* visualizer.

pub mod app;
pub mod cell;
pub mod geom;
pub mod grid;
pub mod messages;
pub mod style;

pub use app::{App, AppConfig, Context, Driver, Effect, Model};
pub use cell::Cell;
pub use geom::{Point, Range};
pub use grid::{Frame, Grid};
pub use messages::*;
pub use style::{AttrMask, Color, Style};
