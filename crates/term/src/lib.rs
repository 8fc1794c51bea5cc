//! Terminal "game renderer" module.
//!
//! A small rendering layer for terminal play. Nothing here uses a widget
//! toolkit: the hex board is plotted glyph by glyph into a framebuffer, and the
//! framebuffer is diffed against the previous frame before it reaches the
//! terminal.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use hexloop_core as core;
pub use hexloop_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
