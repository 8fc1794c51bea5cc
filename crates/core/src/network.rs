//! Path network - incremental path identity across placed tiles
//!
//! Every edge of a placed tile carries a [`PathId`]. When a tile is dropped
//! next to others, the ids flowing in from its neighbors are pushed through
//! its wiring. Two different ids meeting on one route are merged by repainting
//! the old id everywhere; the same id meeting itself means the route closed on
//! itself, which is a circuit.
//!
//! There is no parent-pointer structure: identity lives only in the tiles'
//! `paths` arrays, and a merge rewrites them all. Boards are a few dozen cells,
//! so a merge is a linear scan over placed tiles.

use arrayvec::ArrayVec;
use derive_more::{Display, Error};
use tracing::{debug, trace};

use crate::board::{Cell, HexBoard};
use crate::tile::Tile;
use crate::types::{AxialCoord, Direction, PathId, EDGE_COUNT};

/// Why a placement was rejected. Rejected placements never mutate anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum InvalidPlacement {
    #[display("session is not accepting placements")]
    NotInPlay,
    #[display("no tile is held")]
    NoHeldTile,
    #[display("{coord} is not on the board")]
    OutOfBounds { coord: AxialCoord },
    #[display("{coord} already holds a tile")]
    Occupied { coord: AxialCoord },
}

impl InvalidPlacement {
    pub fn code(self) -> &'static str {
        match self {
            InvalidPlacement::NotInPlay => "not_in_play",
            InvalidPlacement::NoHeldTile => "no_held_tile",
            InvalidPlacement::OutOfBounds { .. } | InvalidPlacement::Occupied { .. } => {
                "invalid_cell"
            }
        }
    }
}

/// Hooks fired while paths grow. All methods default to no-ops.
pub trait PathObserver {
    /// A path entered a tile on a dead-end edge and stops there.
    fn on_dead_end(&mut self, _coord: AxialCoord, _edge: usize, _id: PathId) {}

    /// An edge of the tile at `coord` joined an existing path.
    fn on_path_extended(&mut self, _coord: AxialCoord, _edge: usize, _id: PathId) {}

    /// `old` was repainted to `new` on `repainted` edges.
    fn on_merge(&mut self, _old: PathId, _new: PathId, _repainted: usize) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PathObserver for NoopObserver {}

/// Observer that reports every hook as a trace event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PathObserver for TracingObserver {
    fn on_dead_end(&mut self, coord: AxialCoord, edge: usize, id: PathId) {
        trace!(%coord, edge, %id, "path ends in dead end");
    }

    fn on_path_extended(&mut self, coord: AxialCoord, edge: usize, id: PathId) {
        trace!(%coord, edge, %id, "path extended");
    }

    fn on_merge(&mut self, old: PathId, new: PathId, repainted: usize) {
        trace!(%old, %new, repainted, "paths merged");
    }
}

/// Result of a single [`PathNetwork::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    /// The surviving id.
    pub id: PathId,
    /// The merge was a self-merge: the path closed into a loop.
    pub circuit: bool,
    /// Edges rewritten from the old id.
    pub repainted: usize,
}

/// What happened while placing one tile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    /// Every path id that closed into a loop, in detection order.
    pub circuits: ArrayVec<PathId, EDGE_COUNT>,
    /// Ids allocated for edges nothing flowed into.
    pub fresh_ids: ArrayVec<PathId, EDGE_COUNT>,
    /// Non-circuit merges performed.
    pub merges: usize,
}

impl Placement {
    /// The first loop closed by this placement, if any.
    pub fn circuit(&self) -> Option<PathId> {
        self.circuits.first().copied()
    }
}

/// Allocator and merge engine for path ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNetwork {
    next_id: u32,
}

impl PathNetwork {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Restart id allocation at 1 (used on level load).
    pub fn reset(&mut self) {
        self.next_id = 1;
    }

    /// The id the next fresh allocation will return.
    pub fn peek_next_id(&self) -> PathId {
        PathId(self.next_id)
    }

    fn allocate(&mut self) -> PathId {
        let id = PathId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Place `tile` at `coord`, connect it to its neighbors and commit it.
    pub fn place_tile(
        &mut self,
        board: &mut HexBoard,
        coord: AxialCoord,
        mut tile: Tile,
        observer: &mut dyn PathObserver,
    ) -> Result<Placement, InvalidPlacement> {
        match board.get(coord) {
            None => return Err(InvalidPlacement::OutOfBounds { coord }),
            Some(cell) if cell.occupant.is_tile() => {
                return Err(InvalidPlacement::Occupied { coord })
            }
            Some(_) => {}
        }

        let mut placement = Placement::default();

        for dir in Direction::ALL {
            let Some(neighbor) = board.tile(coord.neighbor(dir)) else {
                continue;
            };
            let incoming = neighbor.path(dir.opposite().index());
            if incoming.is_assigned() {
                self.propagate(
                    board,
                    coord,
                    &mut tile,
                    dir.index(),
                    incoming,
                    observer,
                    &mut placement,
                );
            }
        }

        for edge in 0..EDGE_COUNT {
            if tile.paths[edge].is_assigned() {
                continue;
            }
            let id = self.allocate();
            tile.paths[edge] = id;
            let paired = tile.wiring().partner(edge);
            if !tile.paths[paired].is_assigned() {
                tile.paths[paired] = id;
            }
            placement.fresh_ids.push(id);
        }

        debug!(
            %coord,
            tile = %tile.id,
            wiring = %tile.wiring().to_digits(),
            fresh = placement.fresh_ids.len(),
            merges = placement.merges,
            circuits = placement.circuits.len(),
            "tile placed"
        );

        board.set(Cell::with_tile(coord, tile));
        Ok(placement)
    }

    /// Push `incoming` into `edge` of the tile being placed and on through
    /// its wiring.
    #[allow(clippy::too_many_arguments)]
    fn propagate(
        &mut self,
        board: &mut HexBoard,
        coord: AxialCoord,
        tile: &mut Tile,
        edge: usize,
        incoming: PathId,
        observer: &mut dyn PathObserver,
        placement: &mut Placement,
    ) {
        let current = tile.paths[edge];
        let acting = if current.is_assigned() {
            self.merge_with(board, tile, current, incoming, observer, placement)
        } else {
            tile.paths[edge] = incoming;
            observer.on_path_extended(coord, edge, incoming);
            incoming
        };

        let paired = tile.wiring().partner(edge);
        if paired == edge {
            observer.on_dead_end(coord, edge, acting);
            return;
        }

        let other = tile.paths[paired];
        if !other.is_assigned() {
            tile.paths[paired] = acting;
            observer.on_path_extended(coord, paired, acting);
        } else if other != acting {
            self.merge_with(board, tile, other, acting, observer, placement);
        }
    }

    /// Merge across the board and the tile still in hand.
    fn merge_with(
        &mut self,
        board: &mut HexBoard,
        tile: &mut Tile,
        old: PathId,
        new: PathId,
        observer: &mut dyn PathObserver,
        placement: &mut Placement,
    ) -> PathId {
        let merge = self.merge(board, old, new);
        if merge.circuit {
            placement.circuits.push(merge.id);
            return merge.id;
        }

        let repainted = merge.repainted + repaint(&mut tile.paths, old, new);
        placement.merges += 1;
        observer.on_merge(old, new, repainted);
        merge.id
    }

    /// Fold `old` into `new` across every placed tile.
    ///
    /// Merging an id with itself repaints nothing and reports a circuit.
    pub fn merge(&self, board: &mut HexBoard, old: PathId, new: PathId) -> Merge {
        if old == new {
            debug!(id = %new, "circuit closed");
            return Merge {
                id: new,
                circuit: true,
                repainted: 0,
            };
        }

        let repainted = board
            .tiles_mut()
            .map(|t| repaint(&mut t.paths, old, new))
            .sum();

        Merge {
            id: new,
            circuit: false,
            repainted,
        }
    }
}

impl Default for PathNetwork {
    fn default() -> Self {
        Self::new()
    }
}

fn repaint(paths: &mut [PathId; EDGE_COUNT], old: PathId, new: PathId) -> usize {
    let mut n = 0;
    for p in paths.iter_mut().filter(|p| **p == old) {
        *p = new;
        n += 1;
    }
    n
}
