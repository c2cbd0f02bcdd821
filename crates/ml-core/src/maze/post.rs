//! Post-carve passes: shortcuts, cleanup, start selection, room and door
//! detection, treasure placement.
//!
//! Pass order matters: start selection reads raw depth tags, room detection
//! rewrites them, and treasure placement reads the neighbor counts computed
//! in between.

use ml_rng::GameRng;

use super::GenerateOptions;
use crate::grid::{Grid, OFFSETS4, OFFSETS8, tags};

/// Phase 4: open walls between corridors of near depth, adding cycles to
/// the otherwise tree-shaped maze.
///
/// The depth-difference threshold of 6 and the `a + b/2` merge formula are
/// tuned together with the cut/room percentages; both are kept exactly as
/// the reference behaves.
pub(super) fn stitch_near_depths(grid: &mut Grid, rng: &mut GameRng, options: &GenerateOptions) {
    for y in (3..grid.height() - 3).step_by(2) {
        for x in (3..grid.width() - 3).step_by(2) {
            let cell = grid.flat(x, y);
            if grid.at(cell).tag < tags::OPEN {
                continue;
            }
            for (dx, dy) in OFFSETS4 {
                let neighbor = grid.flat(x + dx * 2, y + dy * 2);
                if grid.at(neighbor).tag < tags::OPEN {
                    continue;
                }
                if rng.percent(options.near_percent) {
                    continue;
                }
                let (a, b) = (grid.at(cell).tag, grid.at(neighbor).tag);
                if (b - a).abs() < 6 {
                    let between = grid.flat(x + dx, y + dy);
                    grid.at_mut(between).tag = a + b / 2;
                }
            }
        }
    }
}

/// Phase 5: convert interior walls whose whole 8-neighborhood is navigable
/// into corridors. The new depth is the reference's running-average
/// approximation over the neighborhood (start/end markers contribute the
/// `OPEN` sentinel through the running term), kept bit-for-bit.
pub(super) fn open_isolated_walls(grid: &mut Grid) {
    for y in 2..grid.height() - 2 {
        for x in 2..grid.width() - 2 {
            let cell = grid.flat(x, y);
            if grid.at(cell).tag != tags::WALL {
                continue;
            }
            let mut acc = 0i32;
            let mut dir = 0usize;
            while dir < 8 {
                let (dx, dy) = OFFSETS8[dir];
                let neighbor_tag = grid.at(grid.flat(x + dx, y + dy)).tag;
                if neighbor_tag < tags::START {
                    break;
                }
                if neighbor_tag <= tags::END {
                    if acc < tags::OPEN {
                        acc = tags::OPEN;
                    } else {
                        acc += acc / (dir as i32 + 1);
                    }
                } else {
                    acc += neighbor_tag;
                }
                dir += 1;
            }
            if dir == 8 {
                grid.at_mut(cell).tag = acc / 8;
            }
        }
    }
}

/// Phase 6: pick the start cell. Inset rings are scanned outside-in (odd
/// insets only; every odd/odd cell sits on one); the highest depth tag on
/// the first ring holding any navigable cell wins, first encountered on
/// ties.
pub(super) fn select_start(grid: &mut Grid) -> usize {
    let (w, h) = (grid.width(), grid.height());
    let mut best = grid.flat(0, 0);

    let mut inset = 1;
    while inset < w / 2 {
        for x in [inset, w - 1 - inset] {
            for y in (inset..h).step_by(2) {
                let cell = grid.flat(x, y);
                if grid.at(cell).tag > grid.at(best).tag {
                    best = cell;
                }
            }
        }
        for y in [inset, h - 1 - inset] {
            for x in (inset..w).step_by(2) {
                let cell = grid.flat(x, y);
                if grid.at(cell).tag > grid.at(best).tag {
                    best = cell;
                }
            }
        }
        if grid.at(best).tag > tags::WALL {
            break;
        }
        inset += 2;
    }

    grid.at_mut(best).tag = tags::START;
    best
}

/// Phase 7: count navigable 8-neighbors for every interior cell; a fully
/// enclosed corridor cell becomes a room center. Start and end markers keep
/// their kind.
pub(super) fn count_neighbors(grid: &mut Grid) {
    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            let cell = grid.flat(x, y);
            grid.at_mut(cell).neighbor_count = 0;
            if grid.at(cell).tag < tags::START {
                continue;
            }
            let mut count = 0u8;
            for (dx, dy) in OFFSETS8 {
                if grid.at(grid.flat(x + dx, y + dy)).tag >= tags::START {
                    count += 1;
                }
            }
            grid.at_mut(cell).neighbor_count = count;
            if count == 8 && grid.at(cell).tag >= tags::OPEN {
                grid.at_mut(cell).tag = tags::ROOM_CENTER;
            }
        }
    }
}

/// Phase 8a: every corridor cell touching a room center becomes part of the
/// room border.
pub(super) fn mark_room_borders(grid: &mut Grid) {
    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            let cell = grid.flat(x, y);
            if grid.at(cell).tag < tags::OPEN {
                continue;
            }
            for (dx, dy) in OFFSETS8 {
                if grid.at(grid.flat(x + dx, y + dy)).tag == tags::ROOM_CENTER {
                    grid.at_mut(cell).tag = tags::ROOM_BORDER;
                    break;
                }
            }
        }
    }
}

/// Phase 8b: corridor cells cardinally touching a room border become doors.
pub(super) fn place_room_doors(grid: &mut Grid) {
    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            let cell = grid.flat(x, y);
            if grid.at(cell).tag < tags::OPEN {
                continue;
            }
            for (dx, dy) in OFFSETS4 {
                if grid.at(grid.flat(x + dx, y + dy)).tag == tags::ROOM_BORDER {
                    grid.at_mut(cell).tag = tags::DOOR;
                    break;
                }
            }
        }
    }
}

/// Phase 8c: at every corridor junction with more than two open exits, the
/// cheapest (lowest-depth) cardinal neighbor becomes a door.
pub(super) fn place_junction_doors(grid: &mut Grid) {
    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            let cell = grid.flat(x, y);
            if grid.at(cell).tag < tags::OPEN {
                continue;
            }
            let mut open_exits = 0;
            let mut cheapest = cell;
            for (dx, dy) in OFFSETS4 {
                let neighbor = grid.flat(x + dx, y + dy);
                if grid.at(neighbor).tag < tags::OPEN {
                    continue;
                }
                open_exits += 1;
                if grid.at(neighbor).tag >= grid.at(cheapest).tag {
                    continue;
                }
                cheapest = neighbor;
            }
            if cheapest != cell && open_exits > 2 {
                grid.at_mut(cheapest).tag = tags::DOOR;
            }
        }
    }
}

/// Phase 9a: dead-end corridor cells may hold a treasure.
pub(super) fn place_dead_end_bonuses(grid: &mut Grid, rng: &mut GameRng, options: &GenerateOptions) {
    for y in (1..grid.height() - 1).step_by(2) {
        for x in (1..grid.width() - 1).step_by(2) {
            let cell = grid.flat(x, y);
            if grid.at(cell).tag < tags::OPEN {
                continue;
            }
            if grid.at(cell).neighbor_count != 1 {
                continue;
            }
            if !rng.percent(options.dead_bonus_percent) {
                continue;
            }
            grid.at_mut(cell).tag = tags::BONUS;
            grid.add_bonus();
        }
    }
}

/// Phase 9b: room cells (centers and borders) may hold a treasure.
pub(super) fn place_room_bonuses(grid: &mut Grid, rng: &mut GameRng, options: &GenerateOptions) {
    for x in 1..grid.width() - 1 {
        for y in 1..grid.height() - 1 {
            let cell = grid.flat(x, y);
            let tag = grid.at(cell).tag;
            if tag < tags::ROOM_CENTER || tag > tags::ROOM_BORDER {
                continue;
            }
            if !rng.percent(options.room_bonus_percent) {
                continue;
            }
            grid.at_mut(cell).tag = tags::BONUS;
            grid.add_bonus();
        }
    }
}
