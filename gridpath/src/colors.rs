//! Palette for the terminal board.

use gridpath_core::{AttrMask, Color, Style};

use crate::presentation::DisplayCategory;

pub const COL_START: Color = Color::from_rgb(34, 197, 94);
pub const COL_END: Color = Color::from_rgb(239, 68, 68);
pub const COL_PATH: Color = Color::from_rgb(59, 130, 246);
pub const COL_EMPTY: Color = Color::from_rgb(229, 231, 235);
pub const COL_HOVER: Color = Color::from_rgb(209, 213, 219);

/// Style of a board cell. The hover shade only applies to empty cells.
pub fn cell_style(category: DisplayCategory, hovered: bool) -> Style {
    let bg = match category {
        DisplayCategory::Start => COL_START,
        DisplayCategory::End => COL_END,
        DisplayCategory::OnPath => COL_PATH,
        DisplayCategory::Empty if hovered => COL_HOVER,
        DisplayCategory::Empty => COL_EMPTY,
    };
    Style::default().with_bg(bg)
}

pub fn title_style() -> Style {
    Style::default().with_attrs(AttrMask::BOLD)
}

pub fn status_style() -> Style {
    Style::default()
}
