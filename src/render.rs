//! Text rendering of a maze
//!
//! Each visited cell becomes one box-drawing glyph picked by its openings;
//! unvisited cells are left blank.

use itertools::Itertools;

use crate::{Cell, Grid, Point};

/// Glyph for a visited cell without any openings
pub const PLACEHOLDER: char = 'x';
/// Glyph for an unvisited cell
pub const BLANK: char = ' ';

/// Glyphs indexed by [Cell::pattern]: bits are East, South, West, North
/// from the lowest up.
pub const GLYPHS: [char; 16] = [
    PLACEHOLDER, // ....
    '╞',         // E...
    '╥',         // .S..
    '╔',         // ES..
    '╡',         // ..W.
    '═',         // E.W.
    '╗',         // .SW.
    '╦',         // ESW.
    '╨',         // ...N
    '╚',         // E..N
    '║',         // .S.N
    '╠',         // ES.N
    '╝',         // ..WN
    '╩',         // E.WN
    '╣',         // .SWN
    '╬',         // ESWN
];

pub fn glyph(cell: &Cell) -> char {
    if cell.is_visited() {
        GLYPHS[cell.pattern() as usize]
    } else {
        BLANK
    }
}

/// Rows of a rendered grid, top to bottom
///
/// Rows are produced on demand. Clone the iterator, or call [render]
/// again, to go over the same grid another time.
#[derive(Clone)]
pub struct Rows<'a> {
    grid: &'a Grid,
    y: usize,
}

impl Iterator for Rows<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.y >= self.grid.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(
            (0..self.grid.width())
                .filter_map(|x| self.grid.cell(Point { x, y }))
                .map(glyph)
                .collect(),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.grid.height().saturating_sub(self.y);
        (left, Some(left))
    }
}

impl ExactSizeIterator for Rows<'_> {}

pub fn render(grid: &Grid) -> Rows<'_> {
    Rows { grid, y: 0 }
}

/// Whole grid as one string, rows separated by newlines
pub fn render_to_string(grid: &Grid) -> String {
    render(grid).join("\n")
}
