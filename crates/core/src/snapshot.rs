use crate::tile::Tile;
use crate::types::{AxialCoord, PathId, SessionPhase, TileId, EDGE_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSnapshot {
    pub id: TileId,
    pub wiring: [u8; EDGE_COUNT],
    pub paths: [PathId; EDGE_COUNT],
    pub rotation_count: i32,
    pub is_static: bool,
}

impl From<&Tile> for TileSnapshot {
    fn from(value: &Tile) -> Self {
        Self {
            id: value.id,
            wiring: *value.wiring().edges(),
            paths: *value.paths(),
            rotation_count: value.rotation_count(),
            is_static: value.is_static(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSnapshot {
    pub coord: AxialCoord,
    pub tile: Option<TileSnapshot>,
}

/// Plain-data view of a session for renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub level: usize,
    pub level_name: String,
    pub theme: Vec<String>,
    pub edge_size: u32,
    pub phase: SessionPhase,
    /// Row-major, same order as the board.
    pub cells: Vec<CellSnapshot>,
    pub held: Option<TileSnapshot>,
    pub placed: usize,
    pub total: usize,
    pub hint: Option<AxialCoord>,
}

impl SessionSnapshot {
    pub fn clear(&mut self) {
        self.level = 0;
        self.level_name.clear();
        self.theme.clear();
        self.edge_size = 0;
        self.phase = SessionPhase::Loading(0);
        self.cells.clear();
        self.held = None;
        self.placed = 0;
        self.total = 0;
        self.hint = None;
    }

    pub fn cell(&self, coord: AxialCoord) -> Option<&CellSnapshot> {
        self.cells.iter().find(|c| c.coord == coord)
    }

    /// Distinct path ids in play, ascending.
    pub fn path_ids(&self) -> Vec<PathId> {
        let mut ids: Vec<PathId> = self
            .cells
            .iter()
            .filter_map(|c| c.tile.as_ref())
            .flat_map(|t| t.paths)
            .filter(PathId::is_assigned)
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            level: 0,
            level_name: String::new(),
            theme: Vec::new(),
            edge_size: 0,
            phase: SessionPhase::Loading(0),
            cells: Vec::new(),
            held: None,
            placed: 0,
            total: 0,
            hint: None,
        }
    }
}
