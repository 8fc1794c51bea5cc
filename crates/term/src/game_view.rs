//! GameView: maps a [`SessionSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Hex centres sit at `x = 6q + 3r`, `y = 2r` (plus an origin). Each tile
//! draws one glyph per edge around its centre:
//!
//! ```text
//!    \ /        NW  NE
//!   - ● -      W   *   E
//!    / \        SW  SE
//! ```
//!
//! Facing edges of two neighbors land on different terminal cells, so both
//! halves of a connection stay visible.

use crate::core::{CellSnapshot, SessionSnapshot, TileSnapshot, MAX_EDGE_SIZE};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{AxialCoord, Layout, PathId, Point, SessionPhase, EDGE_COUNT};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const COLS_PER_Q: f64 = 6.0;
const ROWS_PER_R: f64 = 2.0;

/// Hex size that yields the `6q + 3r`, `2r` character grid.
const HEX_SIZE: Point = Point::new(COLS_PER_Q / 1.732_050_807_568_877_2, ROWS_PER_R / 1.5);

const BG: Rgb = Rgb::new(0, 0, 0);
const BOARD_BG: Rgb = Rgb::new(24, 26, 36);
const CURSOR_BG: Rgb = Rgb::new(60, 64, 90);
const BLOCKED_BG: Rgb = Rgb::new(80, 30, 30);

const PALETTE: [Rgb; 8] = [
    Rgb::new(80, 200, 220),
    Rgb::new(240, 200, 80),
    Rgb::new(200, 120, 220),
    Rgb::new(110, 220, 120),
    Rgb::new(230, 110, 90),
    Rgb::new(100, 140, 240),
    Rgb::new(250, 160, 40),
    Rgb::new(190, 190, 190),
];

const CIRCUIT_FG: Rgb = Rgb::new(255, 255, 255);

/// Where the board frame landed on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// A lightweight terminal renderer for the hex puzzle.
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    fn frame(&self, edge_size: u32, viewport: Viewport) -> Frame {
        let span = edge_size.saturating_sub(1).min(MAX_EDGE_SIZE) as u16;
        // Centre span plus two edge glyphs and one blank column per side.
        let w = 12 * span + 7 + 2;
        let h = 4 * span + 5 + 2;
        let x = viewport.width.saturating_sub(w + 24) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h) / 2,
            AnchorY::Top => 0,
        };
        Frame { x, y, w, h }
    }

    fn layout(&self, edge_size: u32, frame: Frame) -> Layout {
        let span = edge_size.saturating_sub(1) as f64;
        // Leftmost centre is (0, n-1) at x = 3(n-1); topmost is r = 0.
        let origin = Point::new(
            frame.x as f64 + 4.0 - 3.0 * span,
            frame.y as f64 + 3.0,
        );
        Layout::new(HEX_SIZE, origin)
    }

    /// Terminal position of a hex centre.
    pub fn cell_origin(&self, snap: &SessionSnapshot, viewport: Viewport, c: AxialCoord) -> (i32, i32) {
        let layout = self.layout(snap.edge_size, self.frame(snap.edge_size, viewport));
        let p = layout.to_pixel(c);
        (p.x.round() as i32, p.y.round() as i32)
    }

    /// The board cell under a terminal position, if any.
    pub fn pick(&self, snap: &SessionSnapshot, viewport: Viewport, x: u16, y: u16) -> Option<AxialCoord> {
        let layout = self.layout(snap.edge_size, self.frame(snap.edge_size, viewport));
        let c = layout.from_pixel(Point::new(x as f64, y as f64));
        snap.cell(c).map(|cell| cell.coord)
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &SessionSnapshot,
        cursor: Option<AxialCoord>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(BG, BG).cell(' '));
        if snap.edge_size == 0 {
            return;
        }

        let frame = self.frame(snap.edge_size, viewport);
        let layout = self.layout(snap.edge_size, frame);
        let border = CellStyle::new(Rgb::new(200, 200, 200), BG);

        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            frame.w.saturating_sub(2),
            frame.h.saturating_sub(2),
            ' ',
            CellStyle::new(BOARD_BG, BOARD_BG),
        );
        draw_border(fb, frame, border);

        let circuit = match snap.phase {
            SessionPhase::CircuitComplete(id) => Some(id),
            _ => None,
        };

        for cell in &snap.cells {
            let p = layout.to_pixel(cell.coord);
            let (cx, cy) = (p.x.round() as i32, p.y.round() as i32);
            let under_cursor = cursor == Some(cell.coord);
            draw_cell(fb, cx, cy, cell, under_cursor, circuit);

            // Preview the held tile where it would land.
            if under_cursor && cell.tile.is_none() && snap.phase.is_in_play() {
                if let Some(held) = &snap.held {
                    draw_tile(fb, cx, cy, held, CURSOR_BG, |edge, _| {
                        pair_color(held, edge).darken(3, 4)
                    });
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        match snap.phase {
            SessionPhase::CircuitComplete(_) => draw_overlay_text(fb, frame, "CIRCUIT COMPLETE"),
            SessionPhase::BoardFull => draw_overlay_text(fb, frame, "BOARD FULL"),
            SessionPhase::Loading(_) | SessionPhase::Transitioning(_) => {
                draw_overlay_text(fb, frame, "LOADING")
            }
            SessionPhase::InPlay => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &SessionSnapshot,
        cursor: Option<AxialCoord>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, cursor, viewport, &mut fb);
        fb
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(3);
        if panel_x.saturating_add(12) > viewport.width {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), BG);
        let dim = value.dim();

        let mut y = frame.y;
        fb.put_str(panel_x, y, "LEVEL", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.level as u32 + 1, value);
        fb.put_str(panel_x + 4, y, &snap.level_name, dim);
        y += 1;
        fb.put_str(panel_x, y, &snap.theme.join(" "), dim);
        y += 2;

        fb.put_str(panel_x, y, "TILES", label);
        y += 1;
        let count = format!("{}/{}", snap.placed, snap.total);
        fb.put_str(panel_x, y, &count, value);
        y += 2;

        fb.put_str(panel_x, y, "HELD", label);
        y += 2;
        match &snap.held {
            Some(held) => {
                draw_tile(fb, panel_x as i32 + 3, y as i32, held, BG, |edge, _| {
                    pair_color(held, edge)
                });
                fb.put_str(panel_x + 7, y, &format!("rot {}", held.rotation_count.rem_euclid(6)), dim);
            }
            None => fb.put_str(panel_x, y, "-", value),
        }
        y += 3;

        for line in ["w e a d z x  move", ", .          rotate", "space        place", "r restart  q quit"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, dim);
            y += 1;
        }
    }
}

/// Terminal offset and glyph of each edge marker, in edge-index order.
const EDGE_MARKS: [(i32, i32, char); EDGE_COUNT] = [
    (2, 0, '─'),
    (1, -1, '╱'),
    (-1, -1, '╲'),
    (-2, 0, '─'),
    (-1, 1, '╱'),
    (1, 1, '╲'),
];

fn draw_cell(
    fb: &mut FrameBuffer,
    cx: i32,
    cy: i32,
    cell: &CellSnapshot,
    under_cursor: bool,
    circuit: Option<PathId>,
) {
    let bg = match (under_cursor, cell.tile.is_some()) {
        (true, false) => CURSOR_BG,
        (true, true) => BLOCKED_BG,
        _ => BOARD_BG,
    };

    match &cell.tile {
        Some(tile) => draw_tile(fb, cx, cy, tile, bg, |_, id| match circuit {
            Some(c) if c == id => CIRCUIT_FG,
            Some(_) => path_color(id).darken(1, 2),
            None => path_color(id),
        }),
        None => {
            let style = CellStyle::new(Rgb::new(90, 90, 110), bg).dim();
            fb.plot(cx, cy, '·', style);
            if under_cursor {
                fb.plot(cx - 1, cy, ' ', style);
                fb.plot(cx + 1, cy, ' ', style);
            }
        }
    }
}

/// Draw a tile centred at `(cx, cy)`, coloring each edge with `color(edge, path)`.
fn draw_tile(
    fb: &mut FrameBuffer,
    cx: i32,
    cy: i32,
    tile: &TileSnapshot,
    bg: Rgb,
    color: impl Fn(usize, PathId) -> Rgb,
) {
    let center = if tile.is_static { '◆' } else { '●' };
    fb.plot(cx, cy, center, CellStyle::new(Rgb::new(230, 230, 230), bg));

    for (edge, &(dx, dy, glyph)) in EDGE_MARKS.iter().enumerate() {
        let fg = color(edge, tile.paths[edge]);
        let dead_end = tile.wiring[edge] as usize == edge;
        let style = if tile.paths[edge] == PathId::UNASSIGNED || dead_end {
            CellStyle::new(fg, bg).dim()
        } else {
            CellStyle::new(fg, bg).bold()
        };
        let ch = if dead_end { 'o' } else { glyph };
        fb.plot(cx + dx, cy + dy, ch, style);
    }
}

fn path_color(id: PathId) -> Rgb {
    if !id.is_assigned() {
        return Rgb::new(120, 120, 120);
    }
    PALETTE[(id.0 as usize - 1) % PALETTE.len()]
}

/// Unplaced tiles have no path ids; color by which pair the edge belongs to.
fn pair_color(tile: &TileSnapshot, edge: usize) -> Rgb {
    let partner = tile.wiring[edge] as usize;
    if partner == edge {
        return Rgb::new(120, 120, 120);
    }
    let low = edge.min(partner);
    let pair = (0..low)
        .filter(|&e| (tile.wiring[e] as usize) > e)
        .count();
    PALETTE[pair % PALETTE.len()]
}

fn draw_border(fb: &mut FrameBuffer, f: Frame, style: CellStyle) {
    if f.w < 2 || f.h < 2 {
        return;
    }

    fb.put_char(f.x, f.y, '┌', style);
    fb.put_char(f.x + f.w - 1, f.y, '┐', style);
    fb.put_char(f.x, f.y + f.h - 1, '└', style);
    fb.put_char(f.x + f.w - 1, f.y + f.h - 1, '┘', style);

    for dx in 1..f.w - 1 {
        fb.put_char(f.x + dx, f.y, '─', style);
        fb.put_char(f.x + dx, f.y + f.h - 1, '─', style);
    }
    for dy in 1..f.h - 1 {
        fb.put_char(f.x, f.y + dy, '│', style);
        fb.put_char(f.x + f.w - 1, f.y + dy, '│', style);
    }
}

fn draw_overlay_text(fb: &mut FrameBuffer, f: Frame, text: &str) {
    let text_w = text.chars().count() as u16;
    let x = f.x.saturating_add(f.w.saturating_sub(text_w) / 2);
    let y = f.y.saturating_add(f.h - 1);
    fb.put_str(x, y, text, CellStyle::new(Rgb::new(255, 255, 255), BG).bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AxialCoord, TileId};

    fn snapshot(edge_size: u32) -> SessionSnapshot {
        let n = edge_size as i32;
        let mut cells = Vec::new();
        for r in 0..2 * n - 1 {
            let q0 = (n - 1 - r).max(0);
            let len = (2 * n - 1) - (n - 1 - r).abs();
            for q in q0..q0 + len {
                cells.push(CellSnapshot {
                    coord: AxialCoord::new(q, r),
                    tile: None,
                });
            }
        }
        SessionSnapshot {
            edge_size,
            phase: SessionPhase::InPlay,
            total: cells.len(),
            cells,
            ..SessionSnapshot::default()
        }
    }

    fn tile(wiring: [u8; 6], paths: [u32; 6]) -> TileSnapshot {
        TileSnapshot {
            id: TileId(1),
            wiring,
            paths: paths.map(PathId),
            rotation_count: 0,
            is_static: false,
        }
    }

    #[test]
    fn test_neighbor_centres_follow_grid() {
        let view = GameView::default();
        let snap = snapshot(3);
        let vp = Viewport::new(80, 24);
        let (x0, y0) = view.cell_origin(&snap, vp, AxialCoord::new(2, 2));
        let (x1, y1) = view.cell_origin(&snap, vp, AxialCoord::new(3, 2));
        let (x2, y2) = view.cell_origin(&snap, vp, AxialCoord::new(2, 3));
        assert_eq!((x1 - x0, y1 - y0), (6, 0));
        assert_eq!((x2 - x0, y2 - y0), (3, 2));
    }

    #[test]
    fn test_pick_inverts_cell_origin() {
        let view = GameView::default();
        let snap = snapshot(3);
        let vp = Viewport::new(80, 24);
        for cell in &snap.cells {
            let (x, y) = view.cell_origin(&snap, vp, cell.coord);
            assert_eq!(view.pick(&snap, vp, x as u16, y as u16), Some(cell.coord));
        }
        assert_eq!(view.pick(&snap, vp, 0, 0), None);
    }

    #[test]
    fn test_board_fits_inside_frame() {
        let view = GameView::default();
        let snap = snapshot(4);
        let vp = Viewport::new(100, 30);
        let frame = view.frame(4, vp);
        for cell in &snap.cells {
            let (x, y) = view.cell_origin(&snap, vp, cell.coord);
            assert!(x - 2 > frame.x as i32 && x + 2 < (frame.x + frame.w - 1) as i32);
            assert!(y - 1 > frame.y as i32 && y + 1 < (frame.y + frame.h - 1) as i32);
        }
    }

    #[test]
    fn test_tile_draws_edge_glyphs() {
        let view = GameView::default();
        let mut snap = snapshot(2);
        let c = AxialCoord::new(1, 1);
        snap.cells[3].tile = Some(tile([3, 4, 5, 0, 1, 2], [1, 2, 3, 1, 2, 3]));
        let vp = Viewport::new(80, 24);
        let fb = view.render(&snap, None, vp);

        let (x, y) = view.cell_origin(&snap, vp, c);
        let at = |dx: i32, dy: i32| fb.get((x + dx) as u16, (y + dy) as u16).map(|cell| cell.ch);
        assert_eq!(at(0, 0), Some('●'));
        assert_eq!(at(2, 0), Some('─'));
        assert_eq!(at(-2, 0), Some('─'));
        assert_eq!(at(1, -1), Some('╱'));
        assert_eq!(at(1, 1), Some('╲'));
    }

    #[test]
    fn test_dead_ends_and_overlay() {
        let view = GameView::default();
        let mut snap = snapshot(1);
        snap.cells[0].tile = Some(tile([0, 1, 2, 3, 4, 5], [1, 2, 3, 4, 5, 6]));
        snap.phase = SessionPhase::BoardFull;
        let vp = Viewport::new(60, 20);
        let fb = view.render(&snap, None, vp);

        let (x, y) = view.cell_origin(&snap, vp, AxialCoord::new(0, 0));
        assert_eq!(fb.get((x + 2) as u16, y as u16).map(|c| c.ch), Some('o'));
        assert!((0..fb.height()).any(|row| fb.row_text(row).contains("BOARD FULL")));
    }

    #[test]
    fn test_side_panel_shows_counts() {
        let view = GameView::default();
        let mut snap = snapshot(2);
        snap.placed = 3;
        snap.held = Some(tile([1, 0, 2, 3, 4, 5], [0; 6]));
        let fb = view.render(&snap, Some(AxialCoord::new(1, 1)), Viewport::new(80, 24));
        assert!((0..fb.height()).any(|row| fb.row_text(row).contains("3/7")));
        assert!((0..fb.height()).any(|row| fb.row_text(row).contains("HELD")));
    }

    #[test]
    fn test_huge_edge_size_does_not_overflow_frame() {
        let view = GameView::default();
        let mut snap = snapshot(1);
        snap.edge_size = 100_000;
        let fb = view.render(&snap, None, Viewport::new(80, 24));
        assert_eq!(fb.width(), 80);
    }

    #[test]
    fn test_pair_colors_distinguish_routes() {
        let t = tile([3, 4, 5, 0, 1, 2], [0; 6]);
        assert_eq!(pair_color(&t, 0), pair_color(&t, 3));
        assert_ne!(pair_color(&t, 0), pair_color(&t, 1));
        assert_ne!(pair_color(&t, 1), pair_color(&t, 2));
    }
}
