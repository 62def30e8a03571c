//! Terminal character-grid rendering.
//!
//! Drawing is two-phase. Callers stage cell writes into a [`GridRenderer`];
//! `flush` then pushes only the cells that differ from what is already on
//! screen to a [`Surface`], in one pass. Redundant writes cost a compare and
//! nothing else.
//!
//! - [`grid`]: the staged buffer and dirty tracking
//! - [`surface`]: the physical-surface trait and an instrumented in-memory
//!   surface for tests
//! - [`renderer`]: the crossterm-backed terminal surface and session guard

pub mod grid;
pub mod renderer;
pub mod surface;

pub use arctui_types as types;

pub use grid::GridRenderer;
pub use renderer::{encode_run_into, TerminalSession, TerminalSurface};
pub use surface::{RecordingSurface, Surface};
