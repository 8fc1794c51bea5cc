//! Board module - hexagon-shaped cell storage
//!
//! A board of edge size `n` has `2n - 1` rows. Row `r` holds
//! `(2n - 1) - |n - 1 - r|` cells and its first column sits at axial
//! `q = max(0, n - 1 - r)`, so the member set is the hexagon of radius `n - 1`
//! centred on `(n - 1, n - 1)`.
//!
//! Cells live in one flat row-major vector; `row_starts` maps a row to its first
//! slot.

use arrayvec::ArrayVec;
use derive_more::{Display, Error};

use crate::tile::Tile;
use crate::types::{AxialCoord, Direction, EDGE_COUNT};

/// Largest supported edge size (11 719 cells).
pub const MAX_EDGE_SIZE: u32 = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    #[display("board edge size must be at least 1")]
    ZeroEdgeSize,
    #[display("board edge size {size} exceeds {}", MAX_EDGE_SIZE)]
    TooLarge { size: u32 },
}

/// What a board cell currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Occupant {
    #[default]
    Empty,
    /// Board fill; free for placement.
    Decoration,
    Tile(Tile),
}

impl Occupant {
    pub fn tile(&self) -> Option<&Tile> {
        match self {
            Occupant::Tile(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_tile(&self) -> bool {
        matches!(self, Occupant::Tile(_))
    }
}

/// A board cell: its coordinate plus occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub coord: AxialCoord,
    pub occupant: Occupant,
}

impl Cell {
    pub fn new(coord: AxialCoord, occupant: Occupant) -> Self {
        Self { coord, occupant }
    }

    pub fn with_tile(coord: AxialCoord, tile: Tile) -> Self {
        Self::new(coord, Occupant::Tile(tile))
    }
}

/// Hexagon-shaped board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexBoard {
    edge_size: u32,
    cells: Vec<Cell>,
    /// Flat index of the first cell in each row, plus one trailing end marker.
    row_starts: Vec<usize>,
    placed: usize,
}

impl HexBoard {
    /// Build an empty board of the given edge size, every cell decorated.
    pub fn new(edge_size: u32) -> Result<Self, BoardError> {
        if edge_size == 0 {
            return Err(BoardError::ZeroEdgeSize);
        }
        if edge_size > MAX_EDGE_SIZE {
            return Err(BoardError::TooLarge { size: edge_size });
        }

        let n = edge_size as i32;
        let rows = 2 * n - 1;
        let mut cells = Vec::with_capacity(Self::cell_count(edge_size));
        let mut row_starts = Vec::with_capacity(rows as usize + 1);

        for r in 0..rows {
            row_starts.push(cells.len());
            let offset = Self::row_offset(n, r);
            for col in 0..Self::row_len(n, r) {
                cells.push(Cell::new(AxialCoord::new(col + offset, r), Occupant::Decoration));
            }
        }
        row_starts.push(cells.len());

        Ok(Self {
            edge_size,
            cells,
            row_starts,
            placed: 0,
        })
    }

    /// Cells on a board of edge size `n`: `3n(n-1) + 1`. Saturates instead of
    /// overflowing.
    pub fn cell_count(edge_size: u32) -> usize {
        let n = edge_size as usize;
        if n == 0 {
            return 0;
        }
        n.saturating_mul(n - 1)
            .saturating_mul(3)
            .saturating_add(1)
    }

    #[inline(always)]
    fn row_len(n: i32, r: i32) -> i32 {
        (2 * n - 1) - (n - 1 - r).abs()
    }

    #[inline(always)]
    fn row_offset(n: i32, r: i32) -> i32 {
        (n - 1 - r).max(0)
    }

    /// Flat index for a coordinate, or None if it is not on the board.
    #[inline(always)]
    fn index(&self, c: AxialCoord) -> Option<usize> {
        let n = self.edge_size as i32;
        if c.r < 0 || c.r > 2 * n - 2 {
            return None;
        }
        let col = c.q - Self::row_offset(n, c.r);
        if col < 0 || col >= Self::row_len(n, c.r) {
            return None;
        }
        Some(self.row_starts[c.r as usize] + col as usize)
    }

    pub fn edge_size(&self) -> u32 {
        self.edge_size
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn placed_count(&self) -> usize {
        self.placed
    }

    pub fn is_full(&self) -> bool {
        self.placed == self.cells.len()
    }

    /// The middle cell of the hexagon.
    pub fn center(&self) -> AxialCoord {
        let c = self.edge_size as i32 - 1;
        AxialCoord::new(c, c)
    }

    pub fn contains(&self, c: AxialCoord) -> bool {
        self.index(c).is_some()
    }

    pub fn get(&self, c: AxialCoord) -> Option<&Cell> {
        self.index(c).map(|i| &self.cells[i])
    }

    /// Overwrite the cell at `cell.coord`.
    /// Returns false if the coordinate is off the board.
    pub fn set(&mut self, cell: Cell) -> bool {
        let Some(i) = self.index(cell.coord) else {
            return false;
        };

        let was_tile = self.cells[i].occupant.is_tile();
        let is_tile = cell.occupant.is_tile();
        match (was_tile, is_tile) {
            (false, true) => self.placed += 1,
            (true, false) => self.placed -= 1,
            _ => {}
        }

        self.cells[i] = cell;
        true
    }

    /// True if the cell exists and holds no tile.
    pub fn can_place(&self, c: AxialCoord) -> bool {
        matches!(self.get(c), Some(cell) if !cell.occupant.is_tile())
    }

    pub fn tile(&self, c: AxialCoord) -> Option<&Tile> {
        self.get(c).and_then(|cell| cell.occupant.tile())
    }

    /// Neighbors of `c` that hold tiles, with the direction they lie in.
    pub fn occupied_neighbors(&self, c: AxialCoord) -> ArrayVec<(Direction, AxialCoord), EDGE_COUNT> {
        Direction::ALL
            .iter()
            .map(|&d| (d, c.neighbor(d)))
            .filter(|&(_, n)| self.tile(n).is_some())
            .collect()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Every member coordinate, row-major.
    pub fn coords(&self) -> impl Iterator<Item = AxialCoord> + '_ {
        self.cells.iter().map(|cell| cell.coord)
    }

    /// Every placed tile with its coordinate, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = (AxialCoord, &Tile)> + '_ {
        self.cells
            .iter()
            .filter_map(|cell| cell.occupant.tile().map(|t| (cell.coord, t)))
    }

    /// Mutable access to every placed tile, row-major.
    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> + '_ {
        self.cells.iter_mut().filter_map(|cell| match &mut cell.occupant {
            Occupant::Tile(t) => Some(t),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileId;
    use crate::wiring::Wiring;

    #[test]
    fn test_zero_edge_size_rejected() {
        assert_eq!(HexBoard::new(0), Err(BoardError::ZeroEdgeSize));
    }

    #[test]
    fn test_oversized_edge_rejected() {
        assert!(HexBoard::new(MAX_EDGE_SIZE).is_ok());
        for size in [MAX_EDGE_SIZE + 1, 100_000, 3_000_000_000, u32::MAX] {
            assert_eq!(HexBoard::new(size), Err(BoardError::TooLarge { size }));
        }
        assert!(HexBoard::cell_count(u32::MAX) > HexBoard::cell_count(MAX_EDGE_SIZE));
    }

    #[test]
    fn test_row_lengths_and_offsets() {
        let board = HexBoard::new(3).unwrap();
        let rows: Vec<&[Cell]> = board
            .row_starts
            .windows(2)
            .map(|w| &board.cells[w[0]..w[1]])
            .collect();
        let lens: Vec<usize> = rows.iter().map(|r| r.len()).collect();
        assert_eq!(lens, vec![3, 4, 5, 4, 3]);

        let first_q: Vec<i32> = rows.iter().map(|r| r[0].coord.q).collect();
        assert_eq!(first_q, vec![2, 1, 0, 0, 0]);
    }

    #[test]
    fn test_index_is_row_major() {
        let board = HexBoard::new(2).unwrap();
        assert_eq!(board.index(AxialCoord::new(1, 0)), Some(0));
        assert_eq!(board.index(AxialCoord::new(2, 0)), Some(1));
        assert_eq!(board.index(AxialCoord::new(0, 1)), Some(2));
        assert_eq!(board.index(AxialCoord::new(2, 1)), Some(4));
        assert_eq!(board.index(AxialCoord::new(1, 2)), Some(6));
        assert_eq!(board.index(AxialCoord::new(0, 0)), None);
        assert_eq!(board.index(AxialCoord::new(2, 2)), None);
    }

    #[test]
    fn test_every_member_within_radius_of_center() {
        for n in 1..=5 {
            let board = HexBoard::new(n).unwrap();
            let center = board.center();
            for c in board.coords() {
                assert!(center.distance(c) <= n as i32 - 1);
            }
        }
    }

    #[test]
    fn test_replacing_tile_keeps_count_honest() {
        let mut board = HexBoard::new(2).unwrap();
        let c = board.center();
        let tile = Tile::new(TileId(1), Wiring::DEAD_ENDS);

        assert!(board.set(Cell::with_tile(c, tile)));
        assert!(board.set(Cell::with_tile(c, tile)));
        assert_eq!(board.placed_count(), 1);

        assert!(board.set(Cell::new(c, Occupant::Decoration)));
        assert_eq!(board.placed_count(), 0);
    }
}
