//! Depth-limited, obstruction-aware visibility flood.
//!
//! Propagates a decaying depth value outward from a viewpoint cell. Walls
//! and doors are marked visible but stop propagation; open space attenuates
//! the depth by `5 - neighbor_count / 2` per step, so rooms carry light
//! further than narrow corridors. Each touched cell is stamped with the
//! pass id so one flood never reprocesses a cell it has already reached at
//! equal or greater depth.
//!
//! The reference formulation is depth-first recursion over the 8 neighbor
//! directions. The skip rule is order-sensitive, so the explicit stack here
//! mirrors the call/return order exactly: a frame resumes at the direction
//! it left off, and each neighbor is re-examined against current cell state
//! at the moment it is visited.

use crate::errors::GridError;
use crate::grid::{CellFlags, Grid, tags};

/// One simulated recursion frame.
struct Frame {
    index: usize,
    /// Depth to propagate into the neighbors, fixed at frame entry.
    child_depth: f32,
    /// Next direction to examine.
    dir: usize,
}

/// Enter a cell: stamp it, resolve its visibility, and return the depth to
/// propagate onward, or `None` when propagation stops here.
fn enter(grid: &mut Grid, index: usize, depth: f32, pass_id: u64) -> Option<f32> {
    let cell = grid.at_mut(index);
    cell.depth = depth;
    cell.stamp = pass_id;

    if depth < 0.0 {
        cell.flags.insert(CellFlags::INVISIBLE);
        return None;
    }
    let attenuation = 5 - i32::from(cell.neighbor_count / 2);
    cell.flags.remove(CellFlags::INVISIBLE);

    // walls and doors are visible themselves but block sight beyond
    if cell.tag <= tags::WALL || cell.tag == tags::DOOR {
        return None;
    }
    Some(depth - attenuation as f32)
}

/// Flood visibility from the cell at `(x, y)`.
///
/// `pass_id` must be distinct per invocation (monotonically increasing);
/// cells not stamped with the latest pass id are stale and must be treated
/// as invisible by readers.
pub fn flood(
    grid: &mut Grid,
    x: i32,
    y: i32,
    max_depth: f32,
    pass_id: u64,
) -> Result<(), GridError> {
    grid.cell(x, y)?;
    let origin = grid.flat(x, y);
    flood_index(grid, origin, max_depth, pass_id);
    Ok(())
}

/// Flood from a flat cell index already known to be in bounds.
pub(crate) fn flood_index(grid: &mut Grid, origin: usize, max_depth: f32, pass_id: u64) {
    let mut stack: Vec<Frame> = Vec::with_capacity(64);
    if let Some(child_depth) = enter(grid, origin, max_depth, pass_id) {
        stack.push(Frame {
            index: origin,
            child_depth,
            dir: 0,
        });
    }

    while let Some(top) = stack.last_mut() {
        if top.dir == 8 {
            stack.pop();
            continue;
        }
        let dir = top.dir;
        top.dir += 1;
        let index = top.index;
        let depth = top.child_depth;

        let Some(neighbor) = grid.neighbor8(index, dir) else {
            continue;
        };
        let cell = grid.at(neighbor);
        // skip cells this pass already reached at equal or greater depth
        if cell.stamp == pass_id && cell.depth >= depth {
            continue;
        }
        if let Some(child_depth) = enter(grid, neighbor, depth, pass_id) {
            stack.push(Frame {
                index: neighbor,
                child_depth,
                dir: 0,
            });
        }
    }
}
