//! Hexloop (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof, plus the runner's
//! command-line configuration and logging setup.

pub mod config;
pub mod logging;

pub use hexloop_core as core;
pub use hexloop_input as input;
pub use hexloop_term as term;
pub use hexloop_types as types;
