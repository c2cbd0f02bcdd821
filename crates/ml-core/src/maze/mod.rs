//! Maze generation pipeline.
//!
//! Transforms a freshly allocated grid into a fully typed maze: wall
//! lattice, corridors carrying monotonically assigned depth tags, organic
//! room clusters, near-depth shortcuts, a unique start and end, doors, and
//! treasure placements. The pipeline runs in a fixed phase order; each phase
//! sweeps the whole grid. A round that places zero treasures is thrown away
//! and regenerated on the same grid.

mod carve;
mod post;

use ml_rng::GameRng;
use serde::{Deserialize, Serialize};

use crate::consts::{
    MAZE_CUT_PERCENT, MAZE_DEAD_BONUS_PERCENT, MAZE_NEAR_PERCENT, MAZE_ROOM_BONUS_PERCENT,
    MAZE_ROOM_PERCENT,
};
use crate::errors::GenerateError;
use crate::grid::Grid;

/// Tunable generation parameters. The defaults are the tuned set from
/// [`crate::consts`]; they interact and should be changed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Percent chance of spawning a room carve at each corridor step.
    pub room_percent: i32,
    /// Percent chance of keeping a near-depth wall closed.
    pub near_percent: i32,
    /// Percent chance of forcing a dead end on a deep path.
    pub cut_percent: i32,
    /// Percent of room cells that receive a treasure.
    pub room_bonus_percent: i32,
    /// Percent of dead-end cells that receive a treasure.
    pub dead_bonus_percent: i32,
    /// Cap on whole-grid regeneration rounds when no treasure was placed.
    /// `None` retries indefinitely, which is the reference behavior.
    pub max_retries: Option<u32>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            room_percent: MAZE_ROOM_PERCENT,
            near_percent: MAZE_NEAR_PERCENT,
            cut_percent: MAZE_CUT_PERCENT,
            room_bonus_percent: MAZE_ROOM_BONUS_PERCENT,
            dead_bonus_percent: MAZE_DEAD_BONUS_PERCENT,
            max_retries: None,
        }
    }
}

/// Generate a maze in place, returning the flat index of the start cell.
///
/// The grid is reinitialized first, so the same grid can be regenerated any
/// number of times. Fails only when `options.max_retries` is set and every
/// round ended with zero treasures.
pub fn generate(
    grid: &mut Grid,
    rng: &mut GameRng,
    options: &GenerateOptions,
) -> Result<usize, GenerateError> {
    let mut attempts = 0u32;
    loop {
        attempts += 1;

        carve::init_lattice(grid, rng);
        let end = carve::place_end(grid, rng);
        carve::carve_passages(grid, rng, end, options);
        post::stitch_near_depths(grid, rng, options);
        post::open_isolated_walls(grid);
        let start = post::select_start(grid);
        post::count_neighbors(grid);
        post::mark_room_borders(grid);
        post::place_room_doors(grid);
        post::place_junction_doors(grid);
        post::place_dead_end_bonuses(grid, rng, options);
        post::place_room_bonuses(grid, rng, options);

        if grid.bonus_count() > 0 {
            return Ok(start);
        }
        if let Some(max) = options.max_retries {
            if attempts > max {
                return Err(GenerateError::RetriesExhausted { attempts });
            }
        }
    }
}
