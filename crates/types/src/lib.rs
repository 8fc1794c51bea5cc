//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental value types used throughout the workspace.
//! Everything here is plain data with no knowledge of boards or sessions, so it
//! can be used from the core engine, the terminal renderer and the input layer.
//!
//! # Hex Addressing
//!
//! Cells are addressed with axial coordinates `(q, r)`. The six neighbor
//! directions, in edge-index order, are:
//!
//! | Index | Direction | Vector |
//! |-------|-----------|--------|
//! | 0 | `East` | (1, 0) |
//! | 1 | `NorthEast` | (1, -1) |
//! | 2 | `NorthWest` | (0, -1) |
//! | 3 | `West` | (-1, 0) |
//! | 4 | `SouthWest` | (-1, 1) |
//! | 5 | `SouthEast` | (0, 1) |
//!
//! Direction `i` and direction `(i + 3) % 6` are opposites. Tile edges use the
//! same indices: edge `i` of a tile faces the neighbor in direction `i`.
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Front-end frame interval |
//! | `CIRCUIT_PAUSE_MS` | 1500 | Pause before leaving a completed level |
//! | `BOARD_FULL_PAUSE_MS` | 1500 | Pause before retrying a full board |
//!
//! # Examples
//!
//! ```
//! use hexloop_types::{AxialCoord, Direction};
//!
//! let c = AxialCoord::new(2, 2);
//! assert_eq!(c.neighbor(Direction::East), AxialCoord::new(3, 2));
//! assert_eq!(Direction::East.opposite(), Direction::West);
//! assert_eq!(c.to_string(), "2,2");
//! ```

use std::ops::{Add, Sub};

use derive_more::Display;

/// Number of edges on a hex tile.
pub const EDGE_COUNT: usize = 6;

/// Front-end frame interval in milliseconds.
pub const TICK_MS: u32 = 16;

/// How long the front-end shows a completed circuit before moving on.
pub const CIRCUIT_PAUSE_MS: u32 = 1500;

/// How long the front-end shows a full board before reloading the level.
pub const BOARD_FULL_PAUSE_MS: u32 = 1500;

/// Axial hex coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Display)]
#[display("{q},{r}")]
pub struct AxialCoord {
    pub q: i32,
    pub r: i32,
}

impl AxialCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The implicit third cube component.
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    pub fn neighbor(&self, dir: Direction) -> Self {
        *self + dir.vector()
    }

    /// All six neighbors in edge-index order.
    pub fn neighbors(&self) -> [Self; EDGE_COUNT] {
        Direction::ALL.map(|d| self.neighbor(d))
    }

    /// Hex distance between two coordinates.
    pub fn distance(&self, other: Self) -> i32 {
        let d = *self - other;
        (d.q.abs() + d.r.abs() + d.s().abs()) / 2
    }
}

impl Add for AxialCoord {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl Sub for AxialCoord {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.q - rhs.q, self.r - rhs.r)
    }
}

/// The six neighbor directions, doubling as tile edge indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl Direction {
    /// Every direction in edge-index order.
    pub const ALL: [Direction; EDGE_COUNT] = [
        Direction::East,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// Look up a direction by edge index.
    ///
    /// ```
    /// use hexloop_types::Direction;
    ///
    /// assert_eq!(Direction::from_index(3), Some(Direction::West));
    /// assert_eq!(Direction::from_index(6), None);
    /// ```
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            Direction::East => 0,
            Direction::NorthEast => 1,
            Direction::NorthWest => 2,
            Direction::West => 3,
            Direction::SouthWest => 4,
            Direction::SouthEast => 5,
        }
    }

    pub fn opposite(&self) -> Self {
        Self::ALL[(self.index() + 3) % EDGE_COUNT]
    }

    /// Unit axial offset for this direction.
    pub fn vector(&self) -> AxialCoord {
        match self {
            Direction::East => AxialCoord::new(1, 0),
            Direction::NorthEast => AxialCoord::new(1, -1),
            Direction::NorthWest => AxialCoord::new(0, -1),
            Direction::West => AxialCoord::new(-1, 0),
            Direction::SouthWest => AxialCoord::new(-1, 1),
            Direction::SouthEast => AxialCoord::new(0, 1),
        }
    }
}

/// A point in front-end space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pointy-top hex layout for mapping coordinates to front-end positions.
///
/// `size` is the hex radius along each axis, so non-square cells (like
/// terminal glyphs) can be expressed by giving different x and y sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub size: Point,
    pub origin: Point,
}

const SQRT_3: f64 = 1.732_050_807_568_877_2;

impl Layout {
    pub const fn new(size: Point, origin: Point) -> Self {
        Self { size, origin }
    }

    pub fn to_pixel(&self, c: AxialCoord) -> Point {
        let q = c.q as f64;
        let r = c.r as f64;
        let x = (SQRT_3 * q + SQRT_3 / 2.0 * r) * self.size.x;
        let y = (1.5 * r) * self.size.y;
        Point::new(x + self.origin.x, y + self.origin.y)
    }

    /// Inverse of [`Layout::to_pixel`], rounded to the containing hex.
    pub fn from_pixel(&self, p: Point) -> AxialCoord {
        let px = (p.x - self.origin.x) / self.size.x;
        let py = (p.y - self.origin.y) / self.size.y;
        let q = SQRT_3 / 3.0 * px - py / 3.0;
        let r = 2.0 / 3.0 * py;
        round_cube(q, r, -q - r)
    }
}

fn round_cube(q: f64, r: f64, s: f64) -> AxialCoord {
    let mut qi = q.round();
    let mut ri = r.round();
    let si = s.round();
    let q_diff = (qi - q).abs();
    let r_diff = (ri - r).abs();
    let s_diff = (si - s).abs();

    if q_diff > r_diff && q_diff > s_diff {
        qi = -ri - si;
    } else if r_diff > s_diff {
        ri = -qi - si;
    }

    AxialCoord::new(qi as i32, ri as i32)
}

/// Identity tag shared by every edge on the same pipe segment.
///
/// `0` is the "unassigned" sentinel; real ids start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Display)]
#[display("#{_0}")]
pub struct PathId(pub u32);

impl PathId {
    pub const UNASSIGNED: PathId = PathId(0);

    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

/// Per-session tile identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Display)]
#[display("tile-{_0}")]
pub struct TileId(pub u32);

/// Lifecycle phase of a puzzle session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SessionPhase {
    /// Building the board for the given level index.
    #[display("loading level {_0}")]
    Loading(usize),
    /// Accepting placements.
    #[display("in play")]
    InPlay,
    /// A closed loop was formed by the given path.
    #[display("circuit complete ({_0})")]
    CircuitComplete(PathId),
    /// Every cell is filled and no loop formed.
    #[display("board full")]
    BoardFull,
    /// Waiting to load the given level index.
    #[display("transitioning to level {_0}")]
    Transitioning(usize),
}

impl SessionPhase {
    pub fn is_in_play(&self) -> bool {
        matches!(self, SessionPhase::InPlay)
    }
}

/// Player actions a front-end can feed into the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move the placement cursor one cell.
    MoveCursor(Direction),
    /// Rotate the held tile one step right.
    RotateRight,
    /// Rotate the held tile one step left.
    RotateLeft,
    /// Drop the held tile at the cursor.
    Place,
    /// Reload the current level.
    Restart,
}
