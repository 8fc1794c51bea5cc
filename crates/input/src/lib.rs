//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. The puzzle is
//! turn-based, so every key press is one action and key repeat is left to the
//! terminal.

pub mod map;

pub use hexloop_types as types;

pub use map::{handle_key_event, should_quit};
