//! Grid cell state.
//!
//! Generation works on a raw integer tag per cell: the low values are
//! reserved kinds, and anything at or above [`tags::OPEN`] is a corridor
//! whose tag doubles as its carve-depth identifier. Depth arithmetic
//! (averaging, near-depth comparisons) operates directly on the tag, so the
//! encoding is part of the algorithm, not an implementation detail. The
//! typed [`CellKind`] view is derived from the tag for callers.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Raw tag values. Ordering is load-bearing: `>= START` is navigable,
/// `> WALL` is walkable, `>= OPEN` is an open corridor carrying a depth tag.
pub(crate) mod tags {
    pub const UNVISITED: i32 = 0;
    pub const WALL: i32 = 1;
    pub const START: i32 = 2;
    pub const END_TEMP: i32 = 3;
    pub const END: i32 = 4;
    pub const ROOM_CENTER: i32 = 5;
    pub const ROOM_BORDER: i32 = 6;
    pub const DOOR: i32 = 7;
    pub const BONUS: i32 = 8;
    /// Reserved sentinel below all user corridor depths. A freshly opened
    /// cell holds exactly `OPEN` until the walk assigns its depth.
    pub const OPEN: i32 = 10;
}

/// Cell kind as seen by collaborators (renderer, movement logic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum CellKind {
    Unvisited,
    Wall,
    Start,
    EndTemp,
    End,
    RoomCenter,
    RoomBorder,
    Door,
    Bonus,
    /// Open corridor; the payload is the carve-depth tag (generation order,
    /// not graph distance).
    Corridor(i32),
}

bitflags! {
    /// Per-cell flag word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        const INVISIBLE = 0x01;
    }
}

// Manual serde impl for CellFlags
impl Serialize for CellFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CellFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(CellFlags::from_bits_truncate(bits))
    }
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Grid x coordinate, fixed at creation.
    pub x: i32,
    /// Grid y coordinate, fixed at creation.
    pub y: i32,
    /// Raw kind/depth tag. See [`tags`].
    pub(crate) tag: i32,
    /// Count of navigable 8-neighbors, recomputed during post-processing.
    pub neighbor_count: u8,
    /// Visibility depth written by the flood; negative means invisible.
    pub depth: f32,
    /// Flood pass id that last touched this cell.
    pub stamp: u64,
    /// Flag word.
    pub flags: CellFlags,
}

impl Cell {
    /// Create an unvisited, invisible cell at the given position.
    pub(crate) fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            tag: tags::UNVISITED,
            neighbor_count: 0,
            depth: 0.0,
            stamp: 0,
            flags: CellFlags::INVISIBLE,
        }
    }

    /// Position as an `(x, y)` pair.
    pub const fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Typed view of the raw tag.
    pub fn kind(&self) -> CellKind {
        match self.tag {
            tags::UNVISITED => CellKind::Unvisited,
            tags::WALL => CellKind::Wall,
            tags::START => CellKind::Start,
            tags::END_TEMP => CellKind::EndTemp,
            tags::END => CellKind::End,
            tags::ROOM_CENTER => CellKind::RoomCenter,
            tags::ROOM_BORDER => CellKind::RoomBorder,
            tags::DOOR => CellKind::Door,
            tags::BONUS => CellKind::Bonus,
            depth => CellKind::Corridor(depth),
        }
    }

    /// Set the raw tag from a typed kind.
    pub fn set_kind(&mut self, kind: CellKind) {
        self.tag = match kind {
            CellKind::Unvisited => tags::UNVISITED,
            CellKind::Wall => tags::WALL,
            CellKind::Start => tags::START,
            CellKind::EndTemp => tags::END_TEMP,
            CellKind::End => tags::END,
            CellKind::RoomCenter => tags::ROOM_CENTER,
            CellKind::RoomBorder => tags::ROOM_BORDER,
            CellKind::Door => tags::DOOR,
            CellKind::Bonus => tags::BONUS,
            CellKind::Corridor(depth) => depth,
        };
    }

    /// Navigable space: anything from the start marker upward.
    pub const fn is_navigable(&self) -> bool {
        self.tag >= tags::START
    }

    /// Legal to step onto: anything above a wall.
    pub const fn is_walkable(&self) -> bool {
        self.tag > tags::WALL
    }

    /// Open corridor carrying a depth tag.
    pub const fn is_open_corridor(&self) -> bool {
        self.tag >= tags::OPEN
    }

    /// Walls and doors block line of sight beyond themselves; unvisited
    /// pockets count as solid.
    pub const fn blocks_sight(&self) -> bool {
        self.tag <= tags::WALL || self.tag == tags::DOOR
    }

    /// Whether the last flood pass left this cell visible.
    pub const fn visible(&self) -> bool {
        !self.flags.contains(CellFlags::INVISIBLE)
    }

    /// Display character for ASCII dumps.
    pub fn symbol(&self) -> char {
        match self.kind() {
            CellKind::Unvisited => ' ',
            CellKind::Wall => '#',
            CellKind::Start => '<',
            CellKind::EndTemp => '?',
            CellKind::End => '>',
            CellKind::RoomCenter => '_',
            CellKind::RoomBorder => ',',
            CellKind::Door => '+',
            CellKind::Bonus => '$',
            CellKind::Corridor(_) => '.',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        let mut cell = Cell::new(3, 5);
        for kind in [
            CellKind::Unvisited,
            CellKind::Wall,
            CellKind::Start,
            CellKind::EndTemp,
            CellKind::End,
            CellKind::RoomCenter,
            CellKind::RoomBorder,
            CellKind::Door,
            CellKind::Bonus,
            CellKind::Corridor(37),
        ] {
            cell.set_kind(kind);
            assert_eq!(cell.kind(), kind);
        }
    }

    #[test]
    fn test_predicates() {
        let mut cell = Cell::new(0, 0);
        assert!(!cell.is_navigable());
        assert!(!cell.is_walkable());
        assert!(cell.blocks_sight());

        cell.set_kind(CellKind::Wall);
        assert!(!cell.is_walkable());
        assert!(cell.blocks_sight());

        cell.set_kind(CellKind::Door);
        assert!(cell.is_walkable());
        assert!(cell.is_navigable());
        assert!(cell.blocks_sight());

        cell.set_kind(CellKind::Corridor(tags::OPEN));
        assert!(cell.is_walkable());
        assert!(cell.is_open_corridor());
        assert!(!cell.blocks_sight());
    }

    #[test]
    fn test_cells_compare_by_state() {
        let a = Cell::new(2, 4);
        let mut b = Cell::new(2, 4);
        assert_eq!(a, b);
        b.set_kind(CellKind::Door);
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_cell_is_invisible() {
        let cell = Cell::new(1, 1);
        assert!(!cell.visible());
        assert_eq!(cell.depth, 0.0);
        assert_eq!(cell.stamp, 0);
    }
}
