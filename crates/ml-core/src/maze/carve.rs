//! Wall lattice and corridor/room carving.
//!
//! The primary carve is a randomized backtracker over the odd/odd cell
//! lattice. Depth tags are assigned through the raw cell tag: a freshly
//! opened cell holds the `OPEN` sentinel and receives its final depth when
//! the walk retreats through it, so the sentinel doubles as the breadcrumb
//! the backtracker follows.

use ml_rng::GameRng;

use super::GenerateOptions;
use crate::grid::{CellFlags, Grid, OFFSETS4, tags};

/// Phase 1: force the wall lattice and randomly knock out part of the inset
/// ring so the maze silhouette is not a plain rectangle.
pub(super) fn init_lattice(grid: &mut Grid, rng: &mut GameRng) {
    for cell in grid.iter_mut() {
        cell.tag = if cell.x % 2 == 0 || cell.y % 2 == 0 {
            tags::WALL
        } else {
            tags::UNVISITED
        };
        cell.flags = CellFlags::INVISIBLE;
        cell.depth = 0.0;
        cell.stamp = 0;
        cell.neighbor_count = 0;
    }
    grid.set_bonus_count(0);

    let (w, h) = (grid.width(), grid.height());
    for x in [1, w - 2] {
        for y in (1..h).step_by(2) {
            if rng.coin() {
                continue;
            }
            let index = grid.flat(x, y);
            grid.at_mut(index).tag = tags::WALL;
        }
    }
    for y in [1, h - 2] {
        for x in (1..w).step_by(2) {
            if rng.coin() {
                continue;
            }
            let index = grid.flat(x, y);
            grid.at_mut(index).tag = tags::WALL;
        }
    }
}

/// Pick a random odd/odd end cell away from the border and mark it.
pub(super) fn place_end(grid: &mut Grid, rng: &mut GameRng) -> usize {
    let x = rng.range(3, grid.width() - 4) | 1;
    let y = rng.range(3, grid.height() - 4) | 1;
    let end = grid.flat(x, y);
    grid.at_mut(end).tag = tags::END;
    end
}

/// Phase 2: the primary carve. Walks from the end cell in 2-cell jumps,
/// opening the intervening walls, until every reachable odd/odd cell has
/// been claimed.
pub(super) fn carve_passages(
    grid: &mut Grid,
    rng: &mut GameRng,
    end: usize,
    options: &GenerateOptions,
) {
    let mut cell = end;
    let mut depth_tag = tags::OPEN;

    loop {
        let mut dir = rng.range(0, 3) as usize;
        let turn = (1 + rng.range(0, 1) * 2) as usize;

        // scan up to 4 candidate directions for an unvisited 2-step neighbor
        let mut attempts = 0;
        while attempts < 4 {
            // random sudden cuts manufacture extra dead ends
            if depth_tag > tags::OPEN + 6 && rng.percent(options.cut_percent) {
                attempts = 4;
                break;
            }

            let (cx, cy) = grid.at(cell).position();
            let (dx, dy) = OFFSETS4[dir];
            let Some(next) = grid.index(cx + dx * 2, cy + dy * 2) else {
                attempts += 1;
                dir = (dir + turn) % 4;
                continue;
            };
            if grid.at(next).tag > tags::UNVISITED {
                attempts += 1;
                dir = (dir + turn) % 4;
                continue;
            }

            // open the target and the wall in between
            grid.at_mut(next).tag = tags::OPEN;
            let mid = grid.flat(cx + dx, cy + dy);
            grid.at_mut(mid).tag = tags::OPEN;
            cell = next;
            depth_tag += 2;

            if rng.percent(options.room_percent) {
                // room carve rooted at the position the step came from
                carve_room(grid, rng, cx, cy, depth_tag, 1);
            }
            break;
        }

        if attempts < 4 {
            continue;
        }

        // dead end
        let tag = grid.at(cell).tag;
        if tag != tags::END && tag != tags::END_TEMP {
            backtrack(grid, &mut cell, &mut depth_tag);
        } else {
            // a path root was reached; retire it and look for a fresh branch
            if tag == tags::END_TEMP {
                grid.at_mut(cell).tag = depth_tag;
            }
            match find_branch_root(grid) {
                Some((root, counter)) => {
                    cell = root;
                    depth_tag = counter;
                }
                None => break,
            }
        }
    }
}

/// Retreat one 2-cell step along the `OPEN` breadcrumb, stamping decreasing
/// depth tags on the way out.
fn backtrack(grid: &mut Grid, cell: &mut usize, depth_tag: &mut i32) {
    grid.at_mut(*cell).tag = *depth_tag;
    *depth_tag -= 1;

    for dir in 0..4 {
        let Some(between) = grid.neighbor4(*cell, dir) else {
            continue;
        };
        if grid.at(between).tag != tags::OPEN {
            continue;
        }
        grid.at_mut(between).tag = *depth_tag;
        *depth_tag -= 1;
        *cell = grid
            .neighbor4(between, dir)
            .unwrap_or_else(|| panic!("maze carve: backtrack stepped outside the grid"));
        return;
    }

    let (x, y) = grid.at(*cell).position();
    panic!("maze carve: no open neighbor to backtrack into at ({x}, {y}), depth tag {depth_tag}");
}

/// Row-major scan for the first unvisited odd/odd cell that touches already
/// carved space. Opens the wall toward the carved neighbor, marks the cell
/// as a temporary end, and returns it with the depth counter to resume at.
fn find_branch_root(grid: &mut Grid) -> Option<(usize, i32)> {
    for y in (1..grid.height()).step_by(2) {
        for x in (1..grid.width()).step_by(2) {
            let cell = grid.flat(x, y);
            if grid.at(cell).tag != tags::UNVISITED {
                continue;
            }
            for dir in 0..4 {
                let (dx, dy) = OFFSETS4[dir];
                let Some(neighbor) = grid.index(x + dx * 2, y + dy * 2) else {
                    continue;
                };
                if grid.at(neighbor).tag > tags::OPEN {
                    let between_tag = grid.at(neighbor).tag + 1;
                    let between = grid.flat(x + dx, y + dy);
                    grid.at_mut(between).tag = between_tag;
                    grid.at_mut(cell).tag = tags::END_TEMP;
                    return Some((cell, between_tag + 1));
                }
            }
        }
    }
    None
}

/// Phase 3: recursive room carve, written as the tail loop it is.
///
/// Claims a 2x2 block of odd/odd cells (the origin plus three corners),
/// fills the spanned rectangle with a shared depth tag, stitches toward
/// corridors whose depth is within 3 by opening the intervening wall, and
/// may continue growing from one of the new corners while the budget lasts.
fn carve_room(grid: &mut Grid, rng: &mut GameRng, x0: i32, y0: i32, tag0: i32, budget0: i32) {
    let (mut x, mut y) = (x0, y0);
    let mut tag = tag0;
    let mut budget = budget0;

    loop {
        let at = grid.at(grid.flat(x, y)).tag;
        if at == tags::END || at == tags::END_TEMP {
            return;
        }

        let mut dir = rng.range(0, 3) as usize;
        let turn = (1 + rng.range(0, 1) * 2) as usize;

        let mut corners = None;
        for _attempt in 0..4 {
            let (dx, dy) = OFFSETS4[dir];
            let dir2 = (dir + turn) % 4;
            let (dx2, dy2) = OFFSETS4[dir2];

            let c1 = (x + dx * 2, y + dy * 2);
            let c2 = (x + dx2 * 2, y + dy2 * 2);
            let c3 = (x + (dx + dx2) * 2, y + (dy + dy2) * 2);
            let unvisited = [c1, c2, c3].into_iter().all(|(cx, cy)| {
                grid.index(cx, cy)
                    .is_some_and(|i| grid.at(i).tag == tags::UNVISITED)
            });
            if !unvisited {
                dir = (dir + turn) % 4;
                continue;
            }

            fill_block(grid, x, y, dx + dx2, dy + dy2, tag);
            corners = Some([c1, c2, c3]);
            break;
        }

        let Some(corners) = corners else {
            return;
        };
        if budget > 0 {
            budget -= 1;
            tag += 4;
            let (nx, ny) = corners[rng.rn2(3) as usize];
            (x, y) = (nx, ny);
        } else {
            return;
        }
    }
}

/// Fill the 3x3 rectangle spanned by the room origin and its diagonal
/// corner, stitching each newly claimed cell toward nearby corridors.
fn fill_block(grid: &mut Grid, x: i32, y: i32, span_x: i32, span_y: i32, tag: i32) {
    let x_last = x + span_x * 3;
    let y_last = y + span_y * 3;
    let step_x = span_x.signum();
    let step_y = span_y.signum();

    let mut fx = x;
    while fx != x_last {
        let mut fy = y;
        while fy != y_last {
            let cell = grid.flat(fx, fy);
            if grid.at(cell).tag <= tags::START {
                grid.at_mut(cell).tag = tag;
                for dir in 0..4 {
                    let (dx, dy) = OFFSETS4[dir];
                    let Some(neighbor) = grid.index(fx + dx * 2, fy + dy * 2) else {
                        continue;
                    };
                    if (grid.at(neighbor).tag - tag).abs() < 3 {
                        let between = grid.flat(fx + dx, fy + dy);
                        grid.at_mut(between).tag = tag;
                    }
                }
            }
            fy += step_y;
        }
        fx += step_x;
    }
}
