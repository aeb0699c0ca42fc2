//! Terminal output

use std::io::{self, BufRead, Write};

use crate::render::render;
use crate::Grid;

/// Clear the screen and move the cursor to the top left corner
const CLEAR: &str = "\x1B[2J\x1B[1;1H";

/// Text sink the maze is drawn on
pub struct Screen<W: Write> {
    out: W,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn clear(&mut self) -> io::Result<()> {
        write!(self.out, "{}", CLEAR)
    }

    /// Replace screen contents with the rendered grid
    pub fn draw(&mut self, grid: &Grid) -> io::Result<()> {
        self.clear()?;
        for row in render(grid) {
            writeln!(self.out, "{}", row)?;
        }
        self.out.flush()
    }

    /// Prompt for Enter and block until a line is read from `input`
    pub fn wait_for_key<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        write!(self.out, "Press Enter to exit")?;
        self.out.flush()?;
        let mut line = String::new();
        input.read_line(&mut line)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
