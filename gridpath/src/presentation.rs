//! Presentation mapper: the logical display category of every cell.
//!
//! Pure functions of the selection and the revealed path; the renderer
//! turns categories into colours (see [`crate::colors`]).

use gridpath_core::{Point, Range};

use crate::selection::Selection;

/// What a cell shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DisplayCategory {
    Start,
    End,
    OnPath,
    Empty,
}

/// Classify one cell. Precedence: Start > End > OnPath > Empty.
pub fn classify(cell: Point, selection: &Selection, revealed: &[Point]) -> DisplayCategory {
    if selection.start() == Some(cell) {
        DisplayCategory::Start
    } else if selection.end() == Some(cell) {
        DisplayCategory::End
    } else if revealed.contains(&cell) {
        DisplayCategory::OnPath
    } else {
        DisplayCategory::Empty
    }
}

/// The category of every cell of a `size × size` grid, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayTable {
    size: i32,
    cells: Vec<DisplayCategory>,
}

impl DisplayTable {
    pub fn compute(size: i32, selection: &Selection, revealed: &[Point]) -> Self {
        let cells = Range::square(size)
            .iter()
            .map(|p| classify(p, selection, revealed))
            .collect();
        Self { size, cells }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Category at `cell`, `None` outside the grid.
    pub fn at(&self, cell: Point) -> Option<DisplayCategory> {
        if !cell.in_square(self.size) {
            return None;
        }
        self.cells
            .get((cell.y * self.size + cell.x) as usize)
            .copied()
    }

    /// Row-major iterator over `(cell, category)`.
    pub fn iter(&self) -> impl Iterator<Item = (Point, DisplayCategory)> + '_ {
        Range::square(self.size).iter().zip(self.cells.iter().copied())
    }

    /// How many cells show `category`.
    pub fn count(&self, category: DisplayCategory) -> usize {
        self.cells.iter().filter(|&&c| c == category).count()
    }
}
