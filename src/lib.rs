//! Carve a random maze and draw it with box-drawing glyphs
//!
//! The maze lives on a [Grid] of [Cell]s. Every cell records which of its
//! four sides are open, and whether the generator has carved through it.
//! [maze_generator::MazeGenerator] fills the grid, [render] turns it into
//! rows of glyphs and [display::Screen] writes those rows to a terminal.
//!
//! # Examples
//! ```
//! use glyph_maze::{maze_generator::MazeGenerator, render};
//!
//! let mut gen = MazeGenerator::new(Some(3), 7).unwrap();
//! let grid = gen.generate(12, 6).unwrap();
//! assert!(grid.is_complete());
//! assert_eq!(grid.region_count(), 1);
//!
//! for row in render::render(&grid) {
//!     println!("{}", row);
//! }
//! ```
//!
//! ## Carving by hand
//! ```
//! use glyph_maze::{Direction, Grid, Point};
//!
//! let mut grid = Grid::new(2, 1).unwrap();
//! let dir = grid
//!     .open_passage(Point { x: 0, y: 0 }, Point { x: 1, y: 0 })
//!     .unwrap();
//! assert_eq!(dir, Direction::East);
//! assert!(grid.cell(Point { x: 1, y: 0 }).unwrap().has_opening(Direction::West));
//! ```

pub mod display;
pub mod maze_generator;
pub mod render;

use std::fmt;
use std::mem;

use itertools::Itertools;
use petgraph::algo::connected_components;
use petgraph::graph::NodeIndex;
use petgraph::{Graph, Undirected};
use thiserror::Error;

/// Location in the maze
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Absolute direction of a cell side
///
/// The discriminant is the index into [Cell::openings].
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Direction {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl Direction {
    /// All directions, in the order the generator inspects them
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Bit of this side in [Cell::pattern]
    pub fn bit(self) -> u8 {
        1 << self as u8
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::North => Direction::South,
        }
    }

    /// Unit step (dx, dy); y grows downwards
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::North => (0, -1),
        }
    }

    /// Direction of the step `from` -> `to`, if the points are neighbors.
    pub fn between(from: Point, to: Point) -> Option<Self> {
        let dx = to.x as isize - from.x as isize;
        let dy = to.y as isize - from.y as isize;
        Self::ALL.into_iter().find(|dir| dir.offset() == (dx, dy))
    }
}

/// Errors raised while building or carving a maze
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze dimensions must be positive, got {width}x{height}")]
    InvalidDimension { width: usize, height: usize },
    #[error("loop chance must be at least 1")]
    InvalidLoopChance,
    #[error("cells {from} and {to} are not neighbors")]
    NotAdjacent { from: Point, to: Point },
    #[error("point {point} is outside the grid")]
    OutOfBounds { point: Point },
    #[error("walk is stranded with {remaining} cells left unvisited")]
    Stranded { remaining: usize },
}

/// Generation parameters
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,
    /// A visited neighbor is offered to the walk with probability
    /// `1 / loop_chance`. Larger values give fewer loops.
    pub loop_chance: u32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 25,
            loop_chance: 7,
        }
    }
}

impl MazeConfig {
    pub fn validate(&self) -> Result<(), MazeError> {
        cell_count(self.width, self.height)?;
        if self.loop_chance == 0 {
            return Err(MazeError::InvalidLoopChance);
        }
        Ok(())
    }
}

/// Number of cells in a `width` x `height` grid
///
/// Zero sizes, and sizes whose cell array cannot be addressed, are
/// rejected.
fn cell_count(width: usize, height: usize) -> Result<usize, MazeError> {
    width
        .checked_mul(height)
        .filter(|&n| n > 0)
        .filter(|&n| {
            n.checked_mul(mem::size_of::<Cell>())
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(MazeError::InvalidDimension { width, height })
}

/// Single grid position
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Cell {
    openings: [bool; 4],
    visited: bool,
}

impl Cell {
    /// Open sides, indexed by [Direction::index]
    pub fn openings(&self) -> &[bool; 4] {
        &self.openings
    }

    pub fn has_opening(&self, dir: Direction) -> bool {
        self.openings[dir.index()]
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Openings packed into four bits, East being the lowest
    pub fn pattern(&self) -> u8 {
        Direction::ALL
            .into_iter()
            .filter(|dir| self.has_opening(*dir))
            .map(Direction::bit)
            .sum()
    }
}

/// Rectangular array of cells
///
/// Openings are always set in pairs: if a cell is open towards a
/// neighbor, the neighbor is open back towards the cell.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major
    cells: Vec<Cell>,
    /// Number of cells not yet visited
    unvisited: usize,
}

impl Grid {
    /// Create empty grid: nothing visited, nothing open.
    ///
    /// Returns error, if either dimension is zero or the cell count
    /// overflows.
    pub fn new(width: usize, height: usize) -> Result<Self, MazeError> {
        let count = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::default(); count],
            unvisited: count,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x < self.width && p.y < self.height
    }

    pub fn cell(&self, p: Point) -> Option<&Cell> {
        self.contains(p).then(|| &self.cells[self.index(p)])
    }

    /// All points, row by row
    pub fn points(&self) -> impl Iterator<Item = Point> {
        (0..self.height)
            .cartesian_product(0..self.width)
            .map(|(y, x)| Point { x, y })
    }

    /// Neighbor of `p` towards `dir`, if it is inside the grid.
    pub fn neighbor(&self, p: Point, dir: Direction) -> Option<Point> {
        let (dx, dy) = dir.offset();
        let x = p.x.checked_add_signed(dx)?;
        let y = p.y.checked_add_signed(dy)?;
        let n = Point { x, y };
        self.contains(n).then_some(n)
    }

    /// True when every cell has been visited
    pub fn is_complete(&self) -> bool {
        self.unvisited == 0
    }

    pub fn unvisited(&self) -> usize {
        self.unvisited
    }

    pub fn is_visited(&self, p: Point) -> bool {
        self.cell(p).is_some_and(Cell::is_visited)
    }

    pub fn mark_visited(&mut self, p: Point) -> Result<(), MazeError> {
        let idx = self.checked_index(p)?;
        let cell = &mut self.cells[idx];
        if !cell.visited {
            cell.visited = true;
            self.unvisited -= 1;
        }
        Ok(())
    }

    /// Open the wall between two neighboring cells, on both sides.
    ///
    /// Returns the direction from `from` to `to`.
    pub fn open_passage(&mut self, from: Point, to: Point) -> Result<Direction, MazeError> {
        let a = self.checked_index(from)?;
        let b = self.checked_index(to)?;
        let dir = Direction::between(from, to).ok_or(MazeError::NotAdjacent { from, to })?;

        self.cells[a].openings[dir.index()] = true;
        self.cells[b].openings[dir.opposite().index()] = true;
        Ok(dir)
    }

    /// Number of open walls between cells
    pub fn passage_count(&self) -> usize {
        // Every passage shows up once as an East or South opening
        self.cells
            .iter()
            .map(|c| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter(|dir| c.has_opening(*dir))
                    .count()
            })
            .sum()
    }

    /// Number of separate regions among the visited cells
    ///
    /// Visited cells are the nodes and passages the edges of an undirected
    /// graph; the result is its count of connected components.
    pub fn region_count(&self) -> usize {
        let mut graph: Graph<Point, (), Undirected> = Graph::new_undirected();
        let nodes: Vec<Option<NodeIndex>> = self
            .points()
            .map(|p| self.is_visited(p).then(|| graph.add_node(p)))
            .collect();

        for p in self.points() {
            let Some(node_a) = nodes[self.index(p)] else {
                continue;
            };
            // Undirected graph, so East and South cover every edge
            for dir in [Direction::East, Direction::South] {
                if !self.cells[self.index(p)].has_opening(dir) {
                    continue;
                }
                if let Some(node_b) = self.neighbor(p, dir).and_then(|n| nodes[self.index(n)]) {
                    graph.add_edge(node_a, node_b, ());
                }
            }
        }
        connected_components(&graph)
    }

    fn index(&self, p: Point) -> usize {
        p.y * self.width + p.x
    }

    fn checked_index(&self, p: Point) -> Result<usize, MazeError> {
        if self.contains(p) {
            Ok(self.index(p))
        } else {
            Err(MazeError::OutOfBounds { point: p })
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Direction, Grid, MazeConfig, MazeError, Point};

    fn pt(x: usize, y: usize) -> Point {
        Point { x, y }
    }

    #[test]
    fn new_grid_is_empty() {
        let grid = Grid::new(4, 3).unwrap();
        assert_eq!(grid.unvisited(), 12);
        assert!(!grid.is_complete());
        assert!(grid
            .points()
            .all(|p| { !grid.is_visited(p) && grid.cell(p).unwrap().pattern() == 0 }));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert_eq!(
            Grid::new(0, 5),
            Err(MazeError::InvalidDimension {
                width: 0,
                height: 5
            })
        );
        assert!(Grid::new(5, 0).is_err());
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert_eq!(
            Grid::new(1 << (usize::BITS - 1), 2),
            Err(MazeError::InvalidDimension {
                width: 1 << (usize::BITS - 1),
                height: 2
            })
        );
        assert!(Grid::new(usize::MAX, usize::MAX).is_err());
        assert!(Grid::new(usize::MAX / 2, 1).is_err());

        let config = MazeConfig {
            width: usize::MAX,
            height: 3,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MazeError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn points_are_row_major() {
        let grid = Grid::new(2, 2).unwrap();
        let points: Vec<_> = grid.points().collect();
        assert_eq!(points, vec![pt(0, 0), pt(1, 0), pt(0, 1), pt(1, 1)]);
    }

    #[test]
    fn neighbors_stay_in_bounds() {
        let grid = Grid::new(3, 2).unwrap();
        assert_eq!(grid.neighbor(pt(0, 0), Direction::West), None);
        assert_eq!(grid.neighbor(pt(0, 0), Direction::North), None);
        assert_eq!(grid.neighbor(pt(2, 1), Direction::East), None);
        assert_eq!(grid.neighbor(pt(2, 1), Direction::South), None);
        assert_eq!(grid.neighbor(pt(1, 0), Direction::South), Some(pt(1, 1)));
    }

    #[test]
    fn open_passage_is_mirrored() {
        let mut grid = Grid::new(3, 3).unwrap();

        assert_eq!(grid.open_passage(pt(1, 1), pt(1, 0)), Ok(Direction::North));
        assert!(grid.cell(pt(1, 1)).unwrap().has_opening(Direction::North));
        assert!(grid.cell(pt(1, 0)).unwrap().has_opening(Direction::South));

        assert_eq!(grid.open_passage(pt(1, 1), pt(0, 1)), Ok(Direction::West));
        assert!(grid.cell(pt(0, 1)).unwrap().has_opening(Direction::East));
        assert_eq!(grid.passage_count(), 2);
    }

    #[test]
    fn open_passage_requires_neighbors() {
        let mut grid = Grid::new(3, 3).unwrap();
        assert_eq!(
            grid.open_passage(pt(0, 0), pt(1, 1)),
            Err(MazeError::NotAdjacent {
                from: pt(0, 0),
                to: pt(1, 1)
            })
        );
        assert!(matches!(
            grid.open_passage(pt(0, 0), pt(0, 0)),
            Err(MazeError::NotAdjacent { .. })
        ));
        assert_eq!(
            grid.open_passage(pt(2, 2), pt(3, 2)),
            Err(MazeError::OutOfBounds { point: pt(3, 2) })
        );
        assert_eq!(grid.passage_count(), 0);
    }

    #[test]
    fn mark_visited_counts_once() {
        let mut grid = Grid::new(2, 1).unwrap();
        grid.mark_visited(pt(0, 0)).unwrap();
        grid.mark_visited(pt(0, 0)).unwrap();
        assert_eq!(grid.unvisited(), 1);

        grid.mark_visited(pt(1, 0)).unwrap();
        assert!(grid.is_complete());
        assert!(grid.mark_visited(pt(2, 0)).is_err());
    }

    #[test]
    fn cell_pattern_bits() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.open_passage(pt(1, 1), pt(2, 1)).unwrap();
        grid.open_passage(pt(1, 1), pt(1, 0)).unwrap();
        assert_eq!(grid.cell(pt(1, 1)).unwrap().pattern(), 0b1001);
        assert_eq!(grid.cell(pt(2, 1)).unwrap().pattern(), 0b0100);
    }

    #[test]
    fn separate_regions_are_counted() {
        let mut grid = Grid::new(4, 1).unwrap();
        for x in 0..4 {
            grid.mark_visited(pt(x, 0)).unwrap();
        }
        grid.open_passage(pt(0, 0), pt(1, 0)).unwrap();
        grid.open_passage(pt(2, 0), pt(3, 0)).unwrap();
        assert_eq!(grid.region_count(), 2);

        grid.open_passage(pt(1, 0), pt(2, 0)).unwrap();
        assert_eq!(grid.region_count(), 1);
    }

    #[test]
    fn unvisited_cells_are_not_regions() {
        let mut grid = Grid::new(3, 3).unwrap();
        assert_eq!(grid.region_count(), 0);
        grid.mark_visited(pt(1, 1)).unwrap();
        assert_eq!(grid.region_count(), 1);
    }

    #[test]
    fn config_validation() {
        assert_eq!(MazeConfig::default().validate(), Ok(()));
        let config = MazeConfig {
            loop_chance: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(MazeError::InvalidLoopChance));
        let config = MazeConfig {
            height: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(MazeError::InvalidDimension { .. })
        ));
    }
}
