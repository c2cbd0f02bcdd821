//! ml-core: maze generation and visibility engine
//!
//! This crate contains the full generation pipeline (wall lattice, corridor
//! carving, rooms, doors, treasures, start selection) and the depth-limited
//! visibility flood, with no I/O dependencies. Rendering, input handling and
//! audio live in front-end crates and only read the per-cell state exposed
//! here.

pub mod grid;
pub mod maze;
pub mod session;
pub mod visibility;

mod consts;
mod errors;

pub use consts::*;
pub use errors::{GenerateError, GridError};
pub use grid::{Cell, CellFlags, CellKind, Direction, Grid};
pub use maze::{GenerateOptions, generate};
pub use session::{Session, StepOutcome, random_dimensions};
pub use visibility::flood;
