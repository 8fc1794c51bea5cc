//! Wiring module - a tile's internal edge pairing and its rotation
//!
//! A wiring is a six-entry table where `edges[i]` names the edge that edge `i`
//! is connected to inside the tile. The table is always an involution
//! (`edges[edges[i]] == i`); an edge paired with itself is a dead end.
//!
//! Rotation shifts the table one slot and relabels every entry by the same
//! amount, which keeps the pairing self-consistent.

use arrayvec::ArrayVec;
use derive_more::{Display, Error};

use crate::types::EDGE_COUNT;

/// Edge index inside a tile (0..6).
pub type EdgeIndex = u8;

/// Reasons a table cannot be used as a wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum WiringError {
    #[display("edge {edge} points at {target}, which is not an edge")]
    EdgeOutOfRange { edge: usize, target: u8 },
    #[display("edge {edge} points at {target}, but {target} points at {back}")]
    NotInvolution { edge: usize, target: u8, back: u8 },
    #[display("wiring must be exactly six digits")]
    BadLength,
    #[display("'{ch}' is not an edge digit")]
    BadDigit { ch: char },
}

/// Validated six-edge pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wiring {
    edges: [EdgeIndex; EDGE_COUNT],
}

impl Wiring {
    /// Every edge a dead end.
    pub const DEAD_ENDS: Wiring = Wiring {
        edges: [0, 1, 2, 3, 4, 5],
    };

    /// Validate and wrap a pairing table.
    ///
    /// ```
    /// use hexloop_core::wiring::{Wiring, WiringError};
    ///
    /// assert!(Wiring::new([3, 4, 5, 0, 1, 2]).is_ok());
    /// assert!(matches!(
    ///     Wiring::new([1, 2, 0, 3, 4, 5]),
    ///     Err(WiringError::NotInvolution { .. })
    /// ));
    /// ```
    pub fn new(edges: [EdgeIndex; EDGE_COUNT]) -> Result<Self, WiringError> {
        for (edge, &target) in edges.iter().enumerate() {
            if target as usize >= EDGE_COUNT {
                return Err(WiringError::EdgeOutOfRange { edge, target });
            }
        }
        for (edge, &target) in edges.iter().enumerate() {
            let back = edges[target as usize];
            if back as usize != edge {
                return Err(WiringError::NotInvolution { edge, target, back });
            }
        }
        Ok(Self { edges })
    }

    /// Parse the six-digit level-file notation, e.g. `"345012"`.
    pub fn from_digits(s: &str) -> Result<Self, WiringError> {
        let mut edges = [0u8; EDGE_COUNT];
        let mut n = 0usize;
        for ch in s.chars() {
            if n == EDGE_COUNT {
                return Err(WiringError::BadLength);
            }
            let d = ch.to_digit(10).ok_or(WiringError::BadDigit { ch })?;
            if d as usize >= EDGE_COUNT {
                return Err(WiringError::BadDigit { ch });
            }
            edges[n] = d as u8;
            n += 1;
        }
        if n != EDGE_COUNT {
            return Err(WiringError::BadLength);
        }
        Self::new(edges)
    }

    pub fn edges(&self) -> &[EdgeIndex; EDGE_COUNT] {
        &self.edges
    }

    /// The edge internally connected to `edge`.
    pub fn partner(&self, edge: usize) -> usize {
        self.edges[edge] as usize
    }

    pub fn is_dead_end(&self, edge: usize) -> bool {
        self.partner(edge) == edge
    }

    pub fn dead_ends(&self) -> ArrayVec<usize, EDGE_COUNT> {
        (0..EDGE_COUNT).filter(|&e| self.is_dead_end(e)).collect()
    }

    /// Through-routes as `(low, high)` edge pairs.
    pub fn pairs(&self) -> ArrayVec<(usize, usize), 3> {
        (0..EDGE_COUNT)
            .filter_map(|e| {
                let p = self.partner(e);
                (e < p).then_some((e, p))
            })
            .collect()
    }

    /// Shift one slot right, relabelling every entry by +1.
    pub fn rotate_right(&mut self) {
        let old = self.edges;
        for (i, &target) in old.iter().enumerate() {
            self.edges[(i + 1) % EDGE_COUNT] = (target + 1) % EDGE_COUNT as u8;
        }
    }

    /// Shift one slot left, relabelling every entry by -1.
    pub fn rotate_left(&mut self) {
        let old = self.edges;
        let step = EDGE_COUNT - 1;
        for (i, &target) in old.iter().enumerate() {
            self.edges[(i + step) % EDGE_COUNT] = (target + step as u8) % EDGE_COUNT as u8;
        }
    }

    pub fn rotated_right(mut self, times: usize) -> Self {
        for _ in 0..times {
            self.rotate_right();
        }
        self
    }

    /// Level-file notation (inverse of [`Wiring::from_digits`]).
    pub fn to_digits(&self) -> String {
        self.edges
            .iter()
            .map(|&e| char::from(b'0' + e))
            .collect()
    }
}

impl Default for Wiring {
    fn default() -> Self {
        Self::DEAD_ENDS
    }
}

/// Canonical wiring patterns used for randomly spawned tiles.
///
/// Short curves join neighboring edges, long curves skip one edge, and
/// straights join opposite edges.
pub const PATTERNS: [Wiring; 17] = [
    // All dead ends
    Wiring { edges: [0, 1, 2, 3, 4, 5] },
    // One short curve
    Wiring { edges: [1, 0, 2, 3, 4, 5] },
    // Two short curves, side by side
    Wiring { edges: [1, 0, 3, 2, 4, 5] },
    // Two short curves, split
    Wiring { edges: [1, 0, 2, 4, 3, 5] },
    // Three short curves
    Wiring { edges: [1, 0, 3, 2, 5, 4] },
    // One long curve
    Wiring { edges: [2, 1, 0, 3, 4, 5] },
    // Two long curves, back to back
    Wiring { edges: [2, 1, 0, 5, 4, 3] },
    // Two long curves, crossing
    Wiring { edges: [2, 3, 0, 1, 4, 5] },
    // Long curve with a short curve after it
    Wiring { edges: [2, 1, 0, 4, 3, 5] },
    // Long curve with a short curve opposite
    Wiring { edges: [2, 1, 0, 3, 5, 4] },
    // One straight
    Wiring { edges: [3, 1, 2, 0, 4, 5] },
    // Two straights
    Wiring { edges: [3, 4, 2, 0, 1, 5] },
    // Three straights
    Wiring { edges: [3, 4, 5, 0, 1, 2] },
    // Straight with a short curve
    Wiring { edges: [3, 2, 1, 0, 4, 5] },
    // Straight with two short curves
    Wiring { edges: [3, 2, 1, 0, 5, 4] },
    // Two long curves around a straight
    Wiring { edges: [2, 4, 0, 5, 1, 3] },
    // Long curve crossing a straight
    Wiring { edges: [2, 4, 0, 3, 1, 5] },
];
