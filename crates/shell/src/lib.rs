//! Game shell: menu, loader and the frame loop state machine.
//!
//! The shell owns the [`GridRenderer`](arctui_term::GridRenderer) and alternates
//! between two states:
//!
//! - **Menu**: draws the title screen and the [`Catalog`]; Up/Down move the
//!   selection, Enter starts loading the selected game.
//! - **Active**: a [`Game`] owns the grid; each tick calls `update` then
//!   `render` and flushes once. Escape tears the game down and returns to
//!   the menu.
//!
//! Loading is the only asynchronous step. The entry's load future runs on a
//! private runtime and the shell checks it once per tick, so the menu keeps
//! rendering while it is pending.
//!
//! # Module Structure
//!
//! - [`game`]: the lifecycle trait plugins implement
//! - [`catalog`]: catalog entries and their load futures
//! - [`loader`]: the single-flight async loader
//! - [`menu`]: menu drawing
//! - [`shell`]: the state machine itself

pub mod catalog;
pub mod game;
pub mod loader;
pub mod menu;
pub mod shell;

pub use arctui_input as input;
pub use arctui_store as store;
pub use arctui_term as term;
pub use arctui_types as types;

pub use catalog::{Catalog, CatalogEntry, LoadFuture};
pub use game::{Game, GameContext, GameCtor};
pub use loader::{LoadPoll, Loader, PendingLoad};
pub use shell::{LoopState, Nav, Shell, ShellConfig};
