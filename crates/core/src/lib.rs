//! Core puzzle logic - pure, deterministic, and testable
//!
//! This crate holds the connectivity engine and the level state machine. It has
//! no knowledge of terminals or input devices.
//!
//! # Module Structure
//!
//! - [`board`]: hexagon-shaped cell storage with a live placed-tile count
//! - [`wiring`]: six-edge pairing tables, rotation, and the canonical pattern set
//! - [`tile`]: a wired tile plus the path id carried on each edge
//! - [`network`]: path id allocation, propagation, merging, circuit detection
//! - [`level`]: level text parsing and the ordered level set
//! - [`rng`]: seeded random source and the tile spawner
//! - [`session`]: the level lifecycle driven by the front-end
//! - [`snapshot`]: plain-data session view for renderers
//!
//! # Rules
//!
//! - The player holds one tile at a time and may rotate it before dropping it.
//! - Dropped tiles are fixed. Their edges inherit path ids from neighbors.
//! - A path id meeting itself inside a tile closes a **circuit**: the level is won.
//! - Filling every cell without a circuit is a **board full**: the level restarts.
//!
//! # Example
//!
//! ```
//! use hexloop_core::{LevelSet, PuzzleSession, SessionConfig};
//! use hexloop_types::SessionPhase;
//!
//! let mut session = PuzzleSession::new(LevelSet::builtin(), SessionConfig::default()).unwrap();
//! assert_eq!(session.phase(), SessionPhase::InPlay);
//!
//! let target = session
//!     .board()
//!     .coords()
//!     .find(|&c| session.can_place(c))
//!     .unwrap();
//! session.rotate_held_right();
//! session.place_held(target).unwrap();
//! assert!(session.board().placed_count() >= 2);
//! ```

pub mod board;
pub mod level;
pub mod network;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod tile;
pub mod wiring;

pub use hexloop_types as types;

pub use board::{BoardError, Cell, HexBoard, Occupant, MAX_EDGE_SIZE};
pub use level::{LevelDef, LevelLoadError, LevelSet, LevelSource, StaticTile};
pub use network::{
    InvalidPlacement, Merge, NoopObserver, PathNetwork, PathObserver, Placement, TracingObserver,
};
pub use rng::{RandomSource, SimpleRng, TileSpawner};
pub use session::{PlacementOutcome, PuzzleSession, SessionConfig, SessionEvent, Signal};
pub use snapshot::{CellSnapshot, SessionSnapshot, TileSnapshot};
pub use tile::Tile;
pub use wiring::{Wiring, WiringError, PATTERNS};
