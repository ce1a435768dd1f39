//! The [`Grid`] screen buffer and the [`Frame`] diff sent to drivers.

use crate::cell::Cell;
use crate::geom::{Point, Range};
use crate::style::Style;

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A 2D screen buffer of [`Cell`]s, addressed in screen coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    bounds: Range,
}

impl Grid {
    /// Create a new grid of the given dimensions, filled with default cells.
    pub fn new(width: i32, height: i32) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            cells: vec![Cell::default(); bounds.len()],
            bounds,
        }
    }

    /// The bounding range of this grid.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.bounds.contains(p) {
            Some((p.y as usize) * (self.width() as usize) + (p.x as usize))
        } else {
            None
        }
    }

    /// Read the cell at `p`. Returns `Cell::default()` outside bounds.
    pub fn at(&self, p: Point) -> Cell {
        self.index(p).map(|i| self.cells[i]).unwrap_or_default()
    }

    /// Set the cell at `p`. No-op outside bounds.
    pub fn set(&mut self, p: Point, cell: Cell) {
        if let Some(i) = self.index(p) {
            self.cells[i] = cell;
        }
    }

    /// Fill every cell with `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Write `text` starting at `p`, one character per column, clipped to
    /// the grid. Returns the number of columns written.
    pub fn print(&mut self, p: Point, text: &str, style: Style) -> i32 {
        let mut written = 0;
        for (i, ch) in text.chars().enumerate() {
            let q = p.shift(i as i32, 0);
            if !self.bounds.contains(q) {
                break;
            }
            self.set(q, Cell::new(ch, style));
            written += 1;
        }
        written
    }

    /// Row-major iterator over `(Point, Cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.bounds.iter().zip(self.cells.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Frame / FrameCell / compute_frame
// ---------------------------------------------------------------------------

/// A single cell that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameCell {
    pub cell: Cell,
    pub pos: Point,
}

/// A set of cell changes (a diff frame).
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// Compute the difference between two grids.
///
/// Returns a [`Frame`] containing only the cells of `curr` that differ from
/// `prev`. If the sizes differ every cell of `curr` is included.
pub fn compute_frame(prev: &Grid, curr: &Grid) -> Frame {
    let bounds = curr.bounds();
    let full = prev.bounds() != bounds;
    let cells = curr
        .iter()
        .filter(|&(p, c)| full || prev.at(p) != c)
        .map(|(pos, cell)| FrameCell { cell, pos })
        .collect();
    Frame {
        cells,
        width: bounds.width(),
        height: bounds.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn grid_set_and_get() {
        let mut g = Grid::new(4, 3);
        g.set(Point::new(2, 1), Cell::default().with_char('X'));
        assert_eq!(g.at(Point::new(2, 1)).ch, 'X');
        assert_eq!(g.at(Point::new(10, 10)), Cell::default());
    }

    #[test]
    fn grid_set_out_of_bounds_is_noop() {
        let mut g = Grid::new(2, 2);
        g.set(Point::new(-1, 0), Cell::default().with_char('X'));
        g.set(Point::new(2, 0), Cell::default().with_char('X'));
        assert!(g.iter().all(|(_, c)| c == Cell::default()));
    }

    #[test]
    fn print_clips_at_right_edge() {
        let mut g = Grid::new(4, 1);
        let style = Style::default().with_fg(Color::from_rgb(1, 2, 3));
        let n = g.print(Point::new(1, 0), "hello", style);
        assert_eq!(n, 3);
        assert_eq!(g.at(Point::new(1, 0)).ch, 'h');
        assert_eq!(g.at(Point::new(3, 0)).ch, 'l');
        assert_eq!(g.at(Point::new(3, 0)).style, style);
    }

    #[test]
    fn compute_frame_diff() {
        let a = Grid::new(3, 2);
        let mut b = Grid::new(3, 2);
        b.set(Point::new(1, 0), Cell::default().with_char('A'));
        let frame = compute_frame(&a, &b);
        assert_eq!(frame.cells.len(), 1);
        assert_eq!(frame.cells[0].pos, Point::new(1, 0));
        assert_eq!(frame.cells[0].cell.ch, 'A');
    }

    #[test]
    fn compute_frame_after_resize_is_full() {
        let a = Grid::new(2, 2);
        let b = Grid::new(3, 2);
        assert_eq!(compute_frame(&a, &b).cells.len(), 6);
    }
}
