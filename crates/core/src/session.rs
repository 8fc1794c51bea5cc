//! Session module - level lifecycle and the placement state machine
//!
//! ```text
//! Loading(i) ──► InPlay ──place──► InPlay            (no signal, next tile spawned)
//!                  │
//!                  ├──circuit──► CircuitComplete ──advance──► Transitioning(next)
//!                  └──full─────► BoardFull ────────advance──► Transitioning(i)
//!
//! Transitioning(j) ──advance──► Loading(j) ──► InPlay
//! ```
//!
//! The session never waits. Pauses between phases belong to the front-end,
//! which calls [`PuzzleSession::advance`] when it is ready.

use std::mem;

use tracing::{debug, info, warn};

use crate::board::{Cell, HexBoard};
use crate::level::{LevelDef, LevelLoadError, LevelSet};
use crate::network::{InvalidPlacement, PathNetwork, PathObserver, Placement, TracingObserver};
use crate::rng::{RandomSource, SimpleRng, TileSpawner};
use crate::snapshot::{CellSnapshot, SessionSnapshot, TileSnapshot};
use crate::tile::Tile;
use crate::types::{AxialCoord, PathId, SessionPhase, TileId};

/// Session start-up settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Seed for the default tile generator.
    pub seed: u32,
    /// Level index loaded first.
    pub start_level: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            start_level: 0,
        }
    }
}

/// Notifications for the front-end, drained with [`PuzzleSession::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LevelLoaded { index: usize, edge_size: u32 },
    TileSpawned(Tile),
    TilePlaced { coord: AxialCoord, tile: TileId },
    CursorHint(Option<AxialCoord>),
    CircuitComplete(PathId),
    BoardFull,
}

/// Terminal signal raised by a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    CircuitComplete(PathId),
    BoardFull,
}

/// Result of a successful [`PuzzleSession::place_held`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementOutcome {
    pub coord: AxialCoord,
    pub tile: TileId,
    pub placement: Placement,
    pub signal: Option<Signal>,
}

struct BuiltLevel {
    def: LevelDef,
    board: HexBoard,
    network: PathNetwork,
}

/// Build a fresh board for level `index` and replay its static tiles.
/// Nothing outside the returned value is touched except tile id allocation.
fn build_level(
    levels: &LevelSet,
    index: usize,
    spawner: &mut TileSpawner,
    observer: &mut dyn PathObserver,
) -> Result<BuiltLevel, LevelLoadError> {
    let def = levels.get(index)?;
    let mut board = HexBoard::new(def.edge_size).map_err(|_| LevelLoadError::BadEdgeSize {
        line: 1,
        text: def.edge_size.to_string(),
    })?;
    let mut network = PathNetwork::new();

    for (i, st) in def.statics.iter().enumerate() {
        let line = i + 2;
        let tile = Tile::new_static(spawner.next_id(), st.wiring);
        let placement = network
            .place_tile(&mut board, st.coord, tile, observer)
            .map_err(|e| match e {
                InvalidPlacement::Occupied { coord } => LevelLoadError::Duplicate { line, coord },
                _ => LevelLoadError::OffBoard {
                    line,
                    coord: st.coord,
                },
            })?;
        if let Some(id) = placement.circuit() {
            return Err(LevelLoadError::ClosedByStatics { line, id });
        }
    }
    if board.is_full() {
        return Err(LevelLoadError::NoFreeCell);
    }

    Ok(BuiltLevel {
        def,
        board,
        network,
    })
}

/// One player's run through the level set.
pub struct PuzzleSession {
    levels: LevelSet,
    level: usize,
    theme: Vec<String>,
    board: HexBoard,
    network: PathNetwork,
    spawner: TileSpawner,
    held: Option<Tile>,
    phase: SessionPhase,
    hint: Option<AxialCoord>,
    events: Vec<SessionEvent>,
    observer: Box<dyn PathObserver>,
}

impl PuzzleSession {
    /// Start a session with the seeded default generator.
    pub fn new(levels: LevelSet, config: SessionConfig) -> Result<Self, LevelLoadError> {
        Self::with_rng(levels, config, Box::new(SimpleRng::new(config.seed)))
    }

    /// Start a session drawing tiles from `rng`.
    pub fn with_rng(
        levels: LevelSet,
        config: SessionConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, LevelLoadError> {
        let mut spawner = TileSpawner::new(rng);
        let mut observer: Box<dyn PathObserver> = Box::new(TracingObserver);
        let BuiltLevel {
            def,
            board,
            network,
        } = build_level(&levels, config.start_level, &mut spawner, observer.as_mut())?;

        let mut session = Self {
            levels,
            level: config.start_level,
            theme: def.theme,
            board,
            network,
            spawner,
            held: None,
            phase: SessionPhase::Loading(config.start_level),
            hint: None,
            events: Vec::new(),
            observer,
        };
        session.enter_level(def.statics.len());
        Ok(session)
    }

    /// Replace the path observer (defaults to [`TracingObserver`]).
    pub fn set_observer(&mut self, observer: Box<dyn PathObserver>) {
        self.observer = observer;
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        if self.phase != phase {
            info!(from = %self.phase, to = %phase, "phase change");
            self.phase = phase;
        }
    }

    /// Load level `index`. On failure the previous level stays in play.
    pub fn load_level(&mut self, index: usize) -> Result<(), LevelLoadError> {
        let previous = self.phase;
        self.set_phase(SessionPhase::Loading(index));

        match build_level(&self.levels, index, &mut self.spawner, self.observer.as_mut()) {
            Ok(built) => {
                self.commit_level(index, built);
                Ok(())
            }
            Err(e) => {
                warn!(level = index, error = %e, "level load failed");
                self.set_phase(previous);
                Err(e)
            }
        }
    }

    fn commit_level(&mut self, index: usize, built: BuiltLevel) {
        self.level = index;
        self.theme = built.def.theme;
        self.board = built.board;
        self.network = built.network;
        if self.hint.take().is_some() {
            self.events.push(SessionEvent::CursorHint(None));
        }
        self.held = None;
        self.enter_level(built.def.statics.len());
    }

    fn enter_level(&mut self, statics: usize) {
        info!(
            level = self.level,
            name = self.levels.name(self.level).unwrap_or_default(),
            edge_size = self.board.edge_size(),
            statics,
            "level loaded"
        );
        self.events.push(SessionEvent::LevelLoaded {
            index: self.level,
            edge_size: self.board.edge_size(),
        });
        self.set_phase(SessionPhase::InPlay);
        self.spawn_held();
    }

    fn spawn_held(&mut self) {
        let tile = self.spawner.spawn();
        self.held = Some(tile);
        self.events.push(SessionEvent::TileSpawned(tile));
    }

    /// Drop the held tile at `coord`.
    pub fn place_held(&mut self, coord: AxialCoord) -> Result<PlacementOutcome, InvalidPlacement> {
        if !self.phase.is_in_play() {
            return Err(InvalidPlacement::NotInPlay);
        }
        let tile = self.held.ok_or(InvalidPlacement::NoHeldTile)?;

        let placement =
            self.network
                .place_tile(&mut self.board, coord, tile, self.observer.as_mut())?;
        self.held = None;
        if self.hint.take().is_some() {
            self.events.push(SessionEvent::CursorHint(None));
        }
        self.events.push(SessionEvent::TilePlaced {
            coord,
            tile: tile.id,
        });

        let signal = if let Some(id) = placement.circuit() {
            self.events.push(SessionEvent::CircuitComplete(id));
            self.set_phase(SessionPhase::CircuitComplete(id));
            Some(Signal::CircuitComplete(id))
        } else if self.board.is_full() {
            self.events.push(SessionEvent::BoardFull);
            self.set_phase(SessionPhase::BoardFull);
            Some(Signal::BoardFull)
        } else {
            self.spawn_held();
            None
        };

        debug!(
            %coord,
            placed = self.board.placed_count(),
            total = self.board.total_cells(),
            ?signal,
            "placement resolved"
        );

        Ok(PlacementOutcome {
            coord,
            tile: tile.id,
            placement,
            signal,
        })
    }

    /// Turn the held tile one step right. False if nothing turned.
    pub fn rotate_held_right(&mut self) -> bool {
        self.rotate_held(Tile::rotate_right)
    }

    /// Turn the held tile one step left. False if nothing turned.
    pub fn rotate_held_left(&mut self) -> bool {
        self.rotate_held(Tile::rotate_left)
    }

    fn rotate_held(&mut self, rotate: fn(&mut Tile) -> bool) -> bool {
        if !self.phase.is_in_play() {
            return false;
        }
        match self.held.as_mut() {
            Some(tile) => rotate(tile),
            None => false,
        }
    }

    /// Report the cell under the pointer. Emits a `CursorHint` when the
    /// placeable target changes.
    pub fn hover(&mut self, coord: Option<AxialCoord>) -> Option<AxialCoord> {
        let hint = coord.filter(|&c| self.phase.is_in_play() && self.can_place(c));
        if hint != self.hint {
            self.hint = hint;
            self.events.push(SessionEvent::CursorHint(hint));
        }
        hint
    }

    /// Move past a finished phase.
    ///
    /// `CircuitComplete` goes to the next level, `BoardFull` to the same one,
    /// and `Transitioning` loads it. Other phases are left alone.
    pub fn advance(&mut self) -> Result<(), LevelLoadError> {
        match self.phase {
            SessionPhase::CircuitComplete(_) => {
                let next = self.levels.next_index(self.level);
                self.set_phase(SessionPhase::Transitioning(next));
                Ok(())
            }
            SessionPhase::BoardFull => {
                self.set_phase(SessionPhase::Transitioning(self.level));
                Ok(())
            }
            SessionPhase::Transitioning(index) => self.load_level(index),
            SessionPhase::Loading(_) | SessionPhase::InPlay => Ok(()),
        }
    }

    /// Reload the current level from scratch.
    pub fn restart(&mut self) -> Result<(), LevelLoadError> {
        self.load_level(self.level)
    }

    /// Take every event raised since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        mem::take(&mut self.events)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn level_index(&self) -> usize {
        self.level
    }

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    pub fn board(&self) -> &HexBoard {
        &self.board
    }

    pub fn held(&self) -> Option<&Tile> {
        self.held.as_ref()
    }

    pub fn hint(&self) -> Option<AxialCoord> {
        self.hint
    }

    pub fn get_cell(&self, coord: AxialCoord) -> Option<&Cell> {
        self.board.get(coord)
    }

    pub fn can_place(&self, coord: AxialCoord) -> bool {
        self.board.can_place(coord)
    }

    pub fn placed_tiles(&self) -> impl Iterator<Item = (AxialCoord, &Tile)> + '_ {
        self.board.tiles()
    }

    /// Fill `out` with the current state, reusing its allocations.
    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.clear();
        out.level = self.level;
        out.level_name
            .push_str(self.levels.name(self.level).unwrap_or_default());
        out.theme.extend(self.theme.iter().cloned());
        out.edge_size = self.board.edge_size();
        out.phase = self.phase;
        out.cells.extend(self.board.cells().iter().map(|cell| CellSnapshot {
            coord: cell.coord,
            tile: cell.occupant.tile().map(TileSnapshot::from),
        }));
        out.held = self.held.as_ref().map(TileSnapshot::from);
        out.placed = self.board.placed_count();
        out.total = self.board.total_cells();
        out.hint = self.hint;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl std::fmt::Debug for PuzzleSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PuzzleSession")
            .field("level", &self.level)
            .field("phase", &self.phase)
            .field("placed", &self.board.placed_count())
            .field("held", &self.held)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelSource;
    use crate::types::Direction;

    fn levels(texts: &[&str]) -> LevelSet {
        LevelSet::new(
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| LevelSource {
                    name: format!("{i}.txt"),
                    text: t.to_string(),
                })
                .collect(),
        )
        .unwrap()
    }

    /// Always draws 0: pattern 0 (all dead ends), no turns.
    struct Zeros;

    impl RandomSource for Zeros {
        fn next_u32(&mut self) -> u32 {
            0
        }
    }

    fn dead_end_session(texts: &[&str]) -> PuzzleSession {
        PuzzleSession::with_rng(levels(texts), SessionConfig::default(), Box::new(Zeros)).unwrap()
    }

    #[test]
    fn test_new_session_is_in_play_with_held_tile() {
        let mut s = dead_end_session(&["2"]);
        assert_eq!(s.phase(), SessionPhase::InPlay);
        assert!(s.held().is_some());

        let events = s.drain_events();
        assert_eq!(
            events[0],
            SessionEvent::LevelLoaded {
                index: 0,
                edge_size: 2
            }
        );
        assert!(matches!(events[1], SessionEvent::TileSpawned(_)));
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_single_cell_board_fills() {
        let mut s = dead_end_session(&["1"]);
        let out = s.place_held(AxialCoord::new(0, 0)).unwrap();
        assert_eq!(out.signal, Some(Signal::BoardFull));
        assert_eq!(out.placement.fresh_ids.len(), 6);
        assert_eq!(s.phase(), SessionPhase::BoardFull);
        assert!(s.held().is_none());
    }

    #[test]
    fn test_rejected_placement_changes_nothing() {
        let mut s = dead_end_session(&["2"]);
        let c = s.board().center();
        s.place_held(c).unwrap();
        s.drain_events();
        let before = s.snapshot();

        assert_eq!(
            s.place_held(c),
            Err(InvalidPlacement::Occupied { coord: c })
        );
        assert_eq!(
            s.place_held(AxialCoord::new(5, 5)),
            Err(InvalidPlacement::OutOfBounds {
                coord: AxialCoord::new(5, 5)
            })
        );
        assert_eq!(s.snapshot(), before);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_not_in_play_rejects() {
        let mut s = dead_end_session(&["1"]);
        s.place_held(AxialCoord::new(0, 0)).unwrap();
        assert_eq!(
            s.place_held(AxialCoord::new(0, 0)),
            Err(InvalidPlacement::NotInPlay)
        );
        assert!(!s.rotate_held_right());
    }

    #[test]
    fn test_board_full_reloads_same_level() {
        let mut s = dead_end_session(&["1", "2"]);
        s.place_held(AxialCoord::new(0, 0)).unwrap();
        s.advance().unwrap();
        assert_eq!(s.phase(), SessionPhase::Transitioning(0));
        s.advance().unwrap();
        assert_eq!(s.phase(), SessionPhase::InPlay);
        assert_eq!(s.level_index(), 0);
        assert_eq!(s.board().placed_count(), 0);
    }

    #[test]
    fn test_circuit_moves_to_next_level() {
        // Statics route NE's SW-SE and E's NW-W; a centre E-NE curve closes the triangle.
        let text = "2\n2,0|012354\n2,1|013245";
        let mut s = dead_end_session(&[text, "1"]);
        let c = s.board().center();

        // Hand-build the held tile: short curve between edges 0 and 1.
        s.held = Some(Tile::new(TileId(99), crate::wiring::Wiring::new([1, 0, 2, 3, 4, 5]).unwrap()));
        let out = s.place_held(c).unwrap();
        assert!(matches!(out.signal, Some(Signal::CircuitComplete(_))));

        s.advance().unwrap();
        assert_eq!(s.phase(), SessionPhase::Transitioning(1));
        s.advance().unwrap();
        assert_eq!(s.level_index(), 1);
        assert_eq!(s.board().edge_size(), 1);
    }

    #[test]
    fn test_hover_hints_only_free_cells() {
        let mut s = dead_end_session(&["2"]);
        let c = s.board().center();
        s.drain_events();

        assert_eq!(s.hover(Some(c)), Some(c));
        assert_eq!(s.hover(Some(c)), Some(c));
        s.place_held(c).unwrap();
        s.drain_events();
        assert_eq!(s.hover(Some(c)), None);
        assert_eq!(s.hover(Some(c.neighbor(Direction::East))), Some(c.neighbor(Direction::East)));

        let events = s.drain_events();
        assert_eq!(
            events,
            vec![SessionEvent::CursorHint(Some(c.neighbor(Direction::East)))]
        );
    }

    #[test]
    fn test_failed_load_keeps_current_level() {
        let mut s = dead_end_session(&["2", "2\n9,9|012345"]);
        let c = s.board().center();
        s.place_held(c).unwrap();

        assert!(s.load_level(1).is_err());
        assert_eq!(s.phase(), SessionPhase::InPlay);
        assert_eq!(s.level_index(), 0);
        assert_eq!(s.board().placed_count(), 1);
    }

    #[test]
    fn test_unplayable_static_layouts_rejected() {
        let full = PuzzleSession::with_rng(
            levels(&["1\n0,0|012345"]),
            SessionConfig::default(),
            Box::new(Zeros),
        )
        .unwrap_err();
        assert!(matches!(full, LevelLoadError::NoFreeCell));

        let closed = PuzzleSession::with_rng(
            levels(&["2\n2,0|012354\n2,1|013245\n1,1|102345"]),
            SessionConfig::default(),
            Box::new(Zeros),
        )
        .unwrap_err();
        assert!(matches!(closed, LevelLoadError::ClosedByStatics { line: 4, .. }));

        let mut s = dead_end_session(&["2", "1\n0,0|012345"]);
        assert!(matches!(s.load_level(1), Err(LevelLoadError::NoFreeCell)));
        assert_eq!(s.phase(), SessionPhase::InPlay);
        assert_eq!(s.level_index(), 0);
    }

    #[test]
    fn test_static_tiles_are_placed_on_load() {
        let s = dead_end_session(&["3\n2,2|345012"]);
        let tile = s.board().tile(AxialCoord::new(2, 2)).unwrap();
        assert!(tile.is_static());
        assert!(tile.is_fully_assigned());
        assert_eq!(s.board().placed_count(), 1);
    }
}
