//! Error taxonomy for the engine.
//!
//! Out-of-bounds access is a reported error rather than undefined behavior;
//! generation failure is only possible when a retry cap is configured.

use thiserror::Error;

/// Errors from bounds-checked grid access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

/// Errors from maze generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// Every attempt ended with zero treasures placed. Only reachable when
    /// [`GenerateOptions::max_retries`](crate::GenerateOptions) is set; the
    /// default behavior retries indefinitely.
    #[error("maze generation placed no treasures after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}
