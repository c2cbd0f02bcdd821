//! Player session: owns the grid, the viewpoint, and the flood pass counter.
//!
//! Front ends drive a session through [`Session::step`] and read cell state
//! back for rendering. All randomness flows through the session's own
//! [`GameRng`], so a session is fully determined by its dimensions and seed.

use ml_rng::GameRng;
use serde::{Deserialize, Serialize};

use crate::consts::MAZE_VISIBILITY_MAX;
use crate::errors::GenerateError;
use crate::grid::{Direction, Grid, tags};
use crate::maze::{GenerateOptions, generate};
use crate::visibility;

/// What a single step attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// The target cell is a wall (or outside the grid); nothing changed.
    Blocked,
    /// The viewpoint moved onto an open cell.
    Moved,
    /// A door was opened in place; the viewpoint did not move.
    DoorOpened,
    /// A treasure was picked up and the viewpoint moved onto its cell.
    BonusCollected,
    /// The end cell was reached with treasures still uncollected.
    EndReached,
    /// The end cell was reached with every treasure collected.
    Finished,
}

/// A running maze game: grid, viewpoint, collected-treasure counter, RNG,
/// and the monotonic flood pass counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    grid: Grid,
    rng: GameRng,
    options: GenerateOptions,
    viewpoint: usize,
    collected: u32,
    pass: u64,
}

impl Session {
    /// Generate a maze of (roughly) the requested dimensions and flood the
    /// initial view from the start cell.
    pub fn new(width: i32, height: i32, seed: u64) -> Result<Self, GenerateError> {
        Self::with_options(width, height, seed, GenerateOptions::default())
    }

    /// As [`Session::new`] with explicit generation options. Fails only when
    /// the options cap regeneration retries and the cap is hit.
    pub fn with_options(
        width: i32,
        height: i32,
        seed: u64,
        options: GenerateOptions,
    ) -> Result<Self, GenerateError> {
        let mut grid = Grid::new(width, height);
        let mut rng = GameRng::new(seed);
        let start = generate(&mut grid, &mut rng, &options)?;
        let mut session = Self {
            grid,
            rng,
            options,
            viewpoint: start,
            collected: 0,
            pass: 0,
        };
        session.reflood();
        Ok(session)
    }

    /// Throw the current maze away and generate a fresh one from `seed` on
    /// the same grid dimensions.
    pub fn reset(&mut self, seed: u64) -> Result<(), GenerateError> {
        self.rng = GameRng::new(seed);
        let start = generate(&mut self.grid, &mut self.rng, &self.options)?;
        self.viewpoint = start;
        self.collected = 0;
        self.reflood();
        Ok(())
    }

    /// Attempt to move the viewpoint one cell. Doors open in place on the
    /// first bump; treasures are collected by walking onto them; the end
    /// cell finishes the maze only once every treasure is collected.
    pub fn step(&mut self, direction: Direction) -> StepOutcome {
        let (x, y) = self.grid.at(self.viewpoint).position();
        let (dx, dy) = direction.offset();
        let Some(target) = self.grid.index(x + dx, y + dy) else {
            return StepOutcome::Blocked;
        };

        let tag = self.grid.at(target).tag;
        if tag <= tags::WALL {
            return StepOutcome::Blocked;
        }

        let outcome = match tag {
            tags::DOOR => {
                self.grid.at_mut(target).tag = tags::OPEN;
                StepOutcome::DoorOpened
            }
            tags::BONUS => {
                self.grid.at_mut(target).tag = tags::OPEN;
                self.collected += 1;
                self.viewpoint = target;
                StepOutcome::BonusCollected
            }
            tags::END => {
                self.viewpoint = target;
                if self.collected == self.grid.bonus_count() {
                    StepOutcome::Finished
                } else {
                    StepOutcome::EndReached
                }
            }
            _ => {
                self.viewpoint = target;
                StepOutcome::Moved
            }
        };
        self.reflood();
        outcome
    }

    /// Flood visibility from the current viewpoint under a fresh pass id.
    fn reflood(&mut self) {
        self.pass += 1;
        visibility::flood_index(
            &mut self.grid,
            self.viewpoint,
            MAZE_VISIBILITY_MAX,
            self.pass,
        );
    }

    /// The maze being played.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Viewpoint coordinates.
    pub fn position(&self) -> (i32, i32) {
        self.grid.at(self.viewpoint).position()
    }

    /// Treasures picked up so far.
    pub const fn collected(&self) -> u32 {
        self.collected
    }

    /// Treasures still on the grid.
    pub fn remaining(&self) -> u32 {
        self.grid.bonus_count() - self.collected
    }

    /// Flood pass id of the most recent visibility update. Cells whose
    /// stamp differs are stale and should render as unseen.
    pub const fn pass_id(&self) -> u64 {
        self.pass
    }

    #[cfg(test)]
    fn from_parts(grid: Grid, viewpoint: usize) -> Self {
        let mut session = Self {
            grid,
            rng: GameRng::new(0),
            options: GenerateOptions::default(),
            viewpoint,
            collected: 0,
            pass: 0,
        };
        session.reflood();
        session
    }
}

/// Pick grid dimensions for a difficulty class: a base side of
/// `11 + 2^class` stretched by a random 0.7–1.3 aspect ratio, floored at 9
/// per side. The class is clamped to `2..=8`.
pub fn random_dimensions(size_class: u32, rng: &mut GameRng) -> (i32, i32) {
    let class = size_class.clamp(2, 8);
    let size = 11 + 2i32.pow(class);
    let prop = rng.range(7, 13) as f32 / 10.0;
    let width = ((size as f32 * prop) as i32).max(9);
    let height = ((size as f32 / prop) as i32).max(9);
    (width, height)
}
