//! Maze generation

use log::{debug, trace};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::{Direction, Grid, MazeError, Point};

/// One completed generation step, as reported to observers
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Step {
    /// The walk moved from `from` into its neighbor `to`.
    ///
    /// `loop_back` is set when `to` had been visited before.
    Carve {
        from: Point,
        to: Point,
        loop_back: bool,
    },
    /// The walk was stuck. Unvisited `cell` was joined to the visited
    /// `neighbor` and the walk continues from `cell`.
    Stitch { cell: Point, neighbor: Point },
}

/// Counters of a finished generation
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct GenerationStats {
    pub steps: usize,
    /// Walk steps, loop-backs included
    pub carves: usize,
    pub loop_backs: usize,
    pub stitches: usize,
}

/// Random-walk maze generator
///
/// The walk starts from the top left corner and carves into a random
/// neighbor on each step. Unvisited neighbors are always eligible, visited
/// ones only with probability `1 / loop_chance`, which is where loops
/// come from. When nothing is eligible, the first unvisited cell next to
/// the carved area is attached to it and the walk resumes from there.
pub struct MazeGenerator<R = StdRng> {
    random: R,
    loop_chance: u32,
}

impl MazeGenerator<StdRng> {
    /// Generator with a seeded or an entropy-based random source
    pub fn new(seed: Option<u64>, loop_chance: u32) -> Result<Self, MazeError> {
        let random = if let Some(state) = seed {
            StdRng::seed_from_u64(state)
        } else {
            StdRng::from_entropy()
        };
        Self::with_rng(random, loop_chance)
    }
}

impl<R: Rng> MazeGenerator<R> {
    /// Returns error, if `loop_chance` is zero.
    pub fn with_rng(random: R, loop_chance: u32) -> Result<Self, MazeError> {
        if loop_chance == 0 {
            return Err(MazeError::InvalidLoopChance);
        }
        Ok(Self {
            random,
            loop_chance,
        })
    }

    /// Generate a maze covering every cell of a `width` x `height` grid
    pub fn generate(&mut self, width: usize, height: usize) -> Result<Grid, MazeError> {
        self.generate_with(width, height, |_, _| ())
            .map(|(grid, _)| grid)
    }

    /// Generate a maze, calling `observer` after each step
    ///
    /// The observer sees the grid only between steps, so it can render
    /// intermediate snapshots.
    pub fn generate_with<F>(
        &mut self,
        width: usize,
        height: usize,
        mut observer: F,
    ) -> Result<(Grid, GenerationStats), MazeError>
    where
        F: FnMut(&Grid, &Step),
    {
        let grid = Grid::new(width, height)?;
        let mut walk = Walk::start(grid, &mut self.random, self.loop_chance)?;

        while !walk.grid.is_complete() {
            let step = walk.step()?;
            observer(&walk.grid, &step);
        }

        debug!(
            "Generated {}x{} maze in {} steps ({} loop-backs, {} stitches)",
            width, height, walk.stats.steps, walk.stats.loop_backs, walk.stats.stitches
        );
        Ok((walk.grid, walk.stats))
    }
}

/// State of one generation run
struct Walk<'a, R> {
    grid: Grid,
    cursor: Point,
    random: &'a mut R,
    loop_chance: u32,
    stats: GenerationStats,
}

impl<'a, R: Rng> Walk<'a, R> {
    fn start(mut grid: Grid, random: &'a mut R, loop_chance: u32) -> Result<Self, MazeError> {
        let cursor = Point { x: 0, y: 0 };
        grid.mark_visited(cursor)?;
        Ok(Self {
            grid,
            cursor,
            random,
            loop_chance,
            stats: GenerationStats::default(),
        })
    }

    fn step(&mut self) -> Result<Step, MazeError> {
        let candidates = self.candidates();
        let step = match candidates.choose(&mut *self.random) {
            Some(&to) => self.carve(to)?,
            None => self.stitch()?,
        };
        self.stats.steps += 1;
        Ok(step)
    }

    /// Neighbors of the cursor that the walk may move into
    ///
    /// Each visited neighbor gets its own draw.
    fn candidates(&mut self) -> Vec<Point> {
        let mut candidates = Vec::with_capacity(Direction::ALL.len());
        for dir in Direction::ALL {
            let Some(n) = self.grid.neighbor(self.cursor, dir) else {
                continue;
            };
            if !self.grid.is_visited(n) || self.random.gen_range(0..self.loop_chance) == 0 {
                candidates.push(n);
            }
        }
        candidates
    }

    fn carve(&mut self, to: Point) -> Result<Step, MazeError> {
        let from = self.cursor;
        let loop_back = self.grid.is_visited(to);

        self.grid.mark_visited(from)?;
        // Opens both sides of the shared wall
        self.grid.open_passage(from, to)?;
        self.cursor = to;
        self.grid.mark_visited(to)?;

        self.stats.carves += 1;
        if loop_back {
            self.stats.loop_backs += 1;
        }
        Ok(Step::Carve {
            from,
            to,
            loop_back,
        })
    }

    /// Attach the first unvisited cell that borders the carved area
    ///
    /// Cells are scanned row by row. The cell is joined to one of its
    /// visited neighbors at random, and the cursor moves onto it.
    fn stitch(&mut self) -> Result<Step, MazeError> {
        let found = self
            .grid
            .points()
            .filter(|p| !self.grid.is_visited(*p))
            .find_map(|p| {
                let visited = self.visited_neighbors(p);
                (!visited.is_empty()).then_some((p, visited))
            });
        let stranded = MazeError::Stranded {
            remaining: self.grid.unvisited(),
        };
        let Some((cell, visited)) = found else {
            return Err(stranded);
        };
        let &neighbor = visited.choose(&mut *self.random).ok_or(stranded)?;

        self.grid.open_passage(cell, neighbor)?;
        self.grid.mark_visited(cell)?;
        self.cursor = cell;

        self.stats.stitches += 1;
        trace!("Walk stuck, stitched {} to {}", cell, neighbor);
        Ok(Step::Stitch { cell, neighbor })
    }

    fn visited_neighbors(&self, p: Point) -> Vec<Point> {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| self.grid.neighbor(p, dir))
            .filter(|n| self.grid.is_visited(*n))
            .collect()
    }
}
