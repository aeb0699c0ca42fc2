//! CLI for maze generation

use std::io;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use glyph_maze::display::Screen;
use glyph_maze::maze_generator::{MazeGenerator, Step};
use glyph_maze::MazeConfig;
use log::info;

/// Random maze drawn with box-drawing characters
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze width in cells
    #[arg(long, default_value_t = MazeConfig::default().width)]
    width: usize,

    /// Maze height in cells
    #[arg(long, default_value_t = MazeConfig::default().height)]
    height: usize,

    /// Inverse probability of looping back into carved maze. Larger values
    /// give fewer loops.
    #[arg(long, default_value_t = MazeConfig::default().loop_chance)]
    loop_chance: u32,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Redraw the maze every time the walk gets stuck and is stitched
    #[arg(short, long)]
    animate: bool,

    /// Animation frame length in milliseconds
    #[arg(short, long, default_value_t = 50)]
    frame_length: u64,

    /// Exit right after drawing, without waiting for Enter
    #[arg(long)]
    no_wait: bool,
}

impl Args {
    fn config(&self) -> MazeConfig {
        MazeConfig {
            width: self.width,
            height: self.height,
            loop_chance: self.loop_chance,
        }
    }
}

/// Generate maze, draw it on the terminal
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = args.config();
    config.validate().context("Invalid maze parameters")?;

    let mut gen = MazeGenerator::new(args.seed, config.loop_chance)?;
    let mut screen = Screen::new(io::stdout().lock());
    let frame = Duration::from_millis(args.frame_length);

    let mut draw_error = None;
    let (grid, stats) = gen
        .generate_with(config.width, config.height, |grid, step| {
            if !args.animate || draw_error.is_some() || !matches!(step, Step::Stitch { .. }) {
                return;
            }
            match screen.draw(grid) {
                Ok(()) => thread::sleep(frame),
                Err(e) => draw_error = Some(e),
            }
        })
        .context("Maze generation failed")?;
    if let Some(e) = draw_error {
        return Err(e).context("Could not draw snapshot");
    }
    info!(
        "Maze done: {} steps, {} loop-backs, {} stitches",
        stats.steps, stats.loop_backs, stats.stitches
    );

    screen.draw(&grid).context("Could not draw maze")?;
    if !args.no_wait {
        screen.wait_for_key(io::stdin().lock())?;
    }
    Ok(())
}
