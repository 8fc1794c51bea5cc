//! Level module - level text parsing and the level set
//!
//! A level is plain text:
//!
//! ```text
//! 3|teal|night
//! 2,0|102345
//! 4,2|315042
//! ```
//!
//! Line 1 is the board edge size, optionally followed by `|`-separated theme
//! fields that only the front-end looks at. Every later non-blank line places a
//! static tile: `q,r|dddddd`, axial coordinates in the board's own frame and a
//! six-digit wiring.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use derive_more::{Display, Error};
use tracing::{debug, info};

use crate::board::HexBoard;
use crate::types::{AxialCoord, PathId};
use crate::wiring::{Wiring, WiringError};

#[derive(Debug, Display, Error)]
pub enum LevelLoadError {
    #[display("level text is empty")]
    Empty,
    #[display("line {line}: bad edge size '{text}'")]
    BadEdgeSize { line: usize, text: String },
    #[display("line {line}: expected 'q,r|dddddd', got '{text}'")]
    MalformedLine { line: usize, text: String },
    #[display("line {line}: bad coordinate '{text}'")]
    BadCoordinate { line: usize, text: String },
    #[display("line {line}: bad wiring digits '{text}'")]
    BadWiringDigits { line: usize, text: String },
    #[display("line {line}: {source}")]
    InvalidWiring { line: usize, source: WiringError },
    #[display("line {line}: {coord} is not on the board")]
    OffBoard { line: usize, coord: AxialCoord },
    #[display("line {line}: {coord} already has a tile")]
    Duplicate { line: usize, coord: AxialCoord },
    #[display("line {line}: static tiles already close path {id}")]
    ClosedByStatics { line: usize, id: PathId },
    #[display("static tiles leave no free cell")]
    NoFreeCell,
    #[display("cannot read {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[display("level set is empty")]
    EmptySet,
    #[display("level {index} does not exist ({count} levels)")]
    NoSuchLevel { index: usize, count: usize },
}

/// A pre-placed, non-rotatable tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticTile {
    pub coord: AxialCoord,
    pub wiring: Wiring,
}

/// A parsed level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDef {
    pub edge_size: u32,
    /// Cosmetic fields after the edge size, in file order.
    pub theme: Vec<String>,
    /// Static tiles in file order.
    pub statics: Vec<StaticTile>,
}

impl LevelDef {
    /// Parse level text. Coordinates are checked against the declared board.
    pub fn parse(text: &str) -> Result<Self, LevelLoadError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (header_line, header) = lines.next().ok_or(LevelLoadError::Empty)?;
        let mut fields = header.split('|').map(str::trim);
        let size_text = fields.next().unwrap_or_default();
        let edge_size: u32 = match size_text.parse() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(LevelLoadError::BadEdgeSize {
                    line: header_line,
                    text: size_text.to_string(),
                })
            }
        };
        let theme = fields.map(str::to_string).collect();

        let board = HexBoard::new(edge_size).map_err(|_| LevelLoadError::BadEdgeSize {
            line: header_line,
            text: size_text.to_string(),
        })?;

        let mut seen = HashSet::new();
        let mut statics = Vec::new();
        for (line, body) in lines {
            let tile = parse_static(line, body)?;
            if !board.contains(tile.coord) {
                return Err(LevelLoadError::OffBoard {
                    line,
                    coord: tile.coord,
                });
            }
            if !seen.insert(tile.coord) {
                return Err(LevelLoadError::Duplicate {
                    line,
                    coord: tile.coord,
                });
            }
            statics.push(tile);
        }

        Ok(Self {
            edge_size,
            theme,
            statics,
        })
    }
}

fn parse_static(line: usize, body: &str) -> Result<StaticTile, LevelLoadError> {
    let malformed = || LevelLoadError::MalformedLine {
        line,
        text: body.to_string(),
    };

    let (coord_text, digits) = body.split_once('|').ok_or_else(malformed)?;
    let (q, r) = coord_text.split_once(',').ok_or_else(malformed)?;
    let bad_coord = || LevelLoadError::BadCoordinate {
        line,
        text: coord_text.trim().to_string(),
    };
    let q: i32 = q.trim().parse().map_err(|_| bad_coord())?;
    let r: i32 = r.trim().parse().map_err(|_| bad_coord())?;

    let digits = digits.trim();
    let wiring = Wiring::from_digits(digits).map_err(|e| match e {
        WiringError::BadLength | WiringError::BadDigit { .. } => LevelLoadError::BadWiringDigits {
            line,
            text: digits.to_string(),
        },
        source => LevelLoadError::InvalidWiring { line, source },
    })?;

    Ok(StaticTile {
        coord: AxialCoord::new(q, r),
        wiring,
    })
}

/// Raw level text plus the name it was loaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSource {
    pub name: String,
    pub text: String,
}

/// Ordered, non-empty list of levels. Text is parsed when a level is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSet {
    sources: Vec<LevelSource>,
}

const BUILTIN: [(&str, &str); 3] = [
    ("01-center.txt", include_str!("../levels/01-center.txt")),
    ("02-corners.txt", include_str!("../levels/02-corners.txt")),
    ("03-wide.txt", include_str!("../levels/03-wide.txt")),
];

impl LevelSet {
    pub fn new(sources: Vec<LevelSource>) -> Result<Self, LevelLoadError> {
        if sources.is_empty() {
            return Err(LevelLoadError::EmptySet);
        }
        Ok(Self { sources })
    }

    /// The levels compiled into the crate.
    pub fn builtin() -> Self {
        Self {
            sources: BUILTIN
                .iter()
                .map(|(name, text)| LevelSource {
                    name: name.to_string(),
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    /// Every `*.txt` file in `dir`, ordered by file name.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, LevelLoadError> {
        let dir = dir.as_ref();
        let io_err = |path: &Path, source| LevelLoadError::Io {
            path: path.display().to_string(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
            let path = entry.map_err(|e| io_err(dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let text = fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!(%name, "level file read");
            sources.push(LevelSource { name, text });
        }

        info!(dir = %dir.display(), count = sources.len(), "level set loaded");
        Self::new(sources)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.sources.get(index).map(|s| s.name.as_str())
    }

    /// Parse level `index`.
    pub fn get(&self, index: usize) -> Result<LevelDef, LevelLoadError> {
        let source = self.sources.get(index).ok_or(LevelLoadError::NoSuchLevel {
            index,
            count: self.sources.len(),
        })?;
        LevelDef::parse(&source.text)
    }

    /// The level after `index`, wrapping to the first.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.sources.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_and_statics() {
        let def = LevelDef::parse("3|teal|night\n\n2,0|102345\n 4,2 | 315042 \n").unwrap();
        assert_eq!(def.edge_size, 3);
        assert_eq!(def.theme, vec!["teal".to_string(), "night".to_string()]);
        assert_eq!(def.statics.len(), 2);
        assert_eq!(def.statics[1].coord, AxialCoord::new(4, 2));
        assert_eq!(def.statics[1].wiring.edges(), &[3, 1, 5, 0, 4, 2]);
    }

    #[test]
    fn test_header_only() {
        let def = LevelDef::parse("1").unwrap();
        assert_eq!(def.edge_size, 1);
        assert!(def.theme.is_empty());
        assert!(def.statics.is_empty());
    }

    #[test]
    fn test_bad_inputs() {
        assert!(matches!(LevelDef::parse("  \n"), Err(LevelLoadError::Empty)));
        assert!(matches!(
            LevelDef::parse("0|x"),
            Err(LevelLoadError::BadEdgeSize { line: 1, .. })
        ));
        assert!(matches!(
            LevelDef::parse("3\n2,2 345012"),
            Err(LevelLoadError::MalformedLine { line: 2, .. })
        ));
        assert!(matches!(
            LevelDef::parse("3\n2,x|345012"),
            Err(LevelLoadError::BadCoordinate { line: 2, .. })
        ));
        assert!(matches!(
            LevelDef::parse("3\n2,2|34501"),
            Err(LevelLoadError::BadWiringDigits { line: 2, .. })
        ));
        assert!(matches!(
            LevelDef::parse("3\n2,2|120345"),
            Err(LevelLoadError::InvalidWiring { line: 2, .. })
        ));
        assert!(matches!(
            LevelDef::parse("3\n0,0|012345"),
            Err(LevelLoadError::OffBoard { line: 2, .. })
        ));
        assert!(matches!(
            LevelDef::parse("3\n2,2|012345\n2,2|345012"),
            Err(LevelLoadError::Duplicate { line: 3, .. })
        ));
    }

    #[test]
    fn test_oversized_edge_is_a_load_error() {
        for text in ["3000000000", "100000", "64|teal"] {
            match LevelDef::parse(text) {
                Err(LevelLoadError::BadEdgeSize { line: 1, text: bad }) => {
                    assert_eq!(bad, text.split('|').next().unwrap())
                }
                other => panic!("{text}: expected BadEdgeSize, got {other:?}"),
            }
        }
        let set = LevelSet::new(vec![LevelSource {
            name: "huge.txt".to_string(),
            text: "3000000000".to_string(),
        }])
        .unwrap();
        assert!(matches!(set.get(0), Err(LevelLoadError::BadEdgeSize { .. })));
        assert_eq!(LevelDef::parse("63").unwrap().edge_size, 63);
    }

    #[test]
    fn test_builtin_levels_parse() {
        let set = LevelSet::builtin();
        assert!(!set.is_empty());
        for i in 0..set.len() {
            set.get(i).unwrap();
        }
    }

    #[test]
    fn test_next_index_cycles() {
        let set = LevelSet::builtin();
        assert_eq!(set.next_index(0), 1);
        assert_eq!(set.next_index(set.len() - 1), 0);
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(matches!(LevelSet::new(vec![]), Err(LevelLoadError::EmptySet)));
    }

    #[test]
    fn test_missing_index() {
        let set = LevelSet::builtin();
        assert!(matches!(
            set.get(99),
            Err(LevelLoadError::NoSuchLevel { index: 99, .. })
        ));
    }
}
