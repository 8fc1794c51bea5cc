//! Tile module - a wired hex piece and its per-edge path ids

use crate::types::{PathId, TileId, EDGE_COUNT};
use crate::wiring::Wiring;

/// A hex tile: wiring plus the path identity currently carried by each edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    wiring: Wiring,
    /// Path id per edge; [`PathId::UNASSIGNED`] until the tile is placed.
    pub(crate) paths: [PathId; EDGE_COUNT],
    rotation_count: i32,
    is_static: bool,
}

impl Tile {
    /// Create an unplaced, player-controlled tile.
    pub fn new(id: TileId, wiring: Wiring) -> Self {
        Self {
            id,
            wiring,
            paths: [PathId::UNASSIGNED; EDGE_COUNT],
            rotation_count: 0,
            is_static: false,
        }
    }

    /// Create a level-defined tile that cannot be rotated.
    pub fn new_static(id: TileId, wiring: Wiring) -> Self {
        Self {
            is_static: true,
            ..Self::new(id, wiring)
        }
    }

    pub fn wiring(&self) -> &Wiring {
        &self.wiring
    }

    pub fn paths(&self) -> &[PathId; EDGE_COUNT] {
        &self.paths
    }

    pub fn path(&self, edge: usize) -> PathId {
        self.paths[edge]
    }

    pub fn rotation_count(&self) -> i32 {
        self.rotation_count
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// True once every edge carries a path id.
    pub fn is_fully_assigned(&self) -> bool {
        self.paths.iter().all(PathId::is_assigned)
    }

    /// Rotate one step right. Static tiles refuse and return false.
    pub fn rotate_right(&mut self) -> bool {
        if self.is_static {
            return false;
        }
        self.wiring.rotate_right();
        self.rotation_count += 1;
        true
    }

    /// Rotate one step left. Static tiles refuse and return false.
    pub fn rotate_left(&mut self) -> bool {
        if self.is_static {
            return false;
        }
        self.wiring.rotate_left();
        self.rotation_count -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiring::PATTERNS;

    #[test]
    fn test_new_tile_is_unassigned() {
        let t = Tile::new(TileId(1), PATTERNS[4]);
        assert!(t.paths().iter().all(|p| !p.is_assigned()));
        assert!(!t.is_fully_assigned());
        assert!(!t.is_static());
        assert_eq!(t.rotation_count(), 0);
    }

    #[test]
    fn test_rotation_tracks_count() {
        let mut t = Tile::new(TileId(1), PATTERNS[1]);
        assert!(t.rotate_right());
        assert!(t.rotate_right());
        assert!(t.rotate_left());
        assert_eq!(t.rotation_count(), 1);
        assert_eq!(*t.wiring(), PATTERNS[1].rotated_right(1));
    }

    #[test]
    fn test_static_tile_refuses_rotation() {
        let mut t = Tile::new_static(TileId(1), PATTERNS[1]);
        assert!(!t.rotate_right());
        assert!(!t.rotate_left());
        assert_eq!(*t.wiring(), PATTERNS[1]);
        assert_eq!(t.rotation_count(), 0);
    }
}
