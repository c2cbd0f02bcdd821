//! Tuning constants for generation and visibility.
//!
//! The percentages below are empirically tuned as a set; changing one
//! (notably the near-depth threshold hard-coded in the stitching pass)
//! requires re-tuning the others.

/// Maximum depth fed into the visibility flood.
pub const MAZE_VISIBILITY_MAX: f32 = 30.0;

/// Percent chance of spawning a room carve at each corridor step.
pub const MAZE_ROOM_PERCENT: i32 = 80;

/// Percent chance of keeping a near-depth wall closed during stitching.
pub const MAZE_NEAR_PERCENT: i32 = 40;

/// Percent chance of forcing a dead end once a path is deep enough.
pub const MAZE_CUT_PERCENT: i32 = 10;

/// Percent of room cells that receive a treasure.
pub const MAZE_ROOM_BONUS_PERCENT: i32 = 15;

/// Percent of dead-end corridor cells that receive a treasure.
pub const MAZE_DEAD_BONUS_PERCENT: i32 = 60;

/// Smallest usable grid side; dimensions are rounded up to odd values with
/// this floor.
pub const MIN_GRID_SIDE: i32 = 7;
