//! The game lifecycle contract.

use std::rc::Rc;

use anyhow::Result;

use crate::input::InputDispatcher;
use crate::store::MemoryStore;
use crate::term::GridRenderer;

/// A pluggable game.
///
/// The shell calls `init` once after construction, then `update` and
/// `render` once per frame, and `destroy` once when the player leaves.
/// Errors and panics from any method are logged and contained; the shell
/// keeps running.
///
/// A game that subscribes handlers in `init` must keep its own
/// [`InputDispatcher`] clone and remove them in `destroy`.
pub trait Game {
    fn init(&mut self, grid: &mut GridRenderer, input: &InputDispatcher) -> Result<()>;

    /// Advance by `elapsed_ms` of wall time since the previous frame.
    fn update(&mut self, elapsed_ms: u32) -> Result<()>;

    /// Stage this frame. The shell flushes after it returns.
    fn render(&mut self, grid: &mut GridRenderer) -> Result<()>;

    fn destroy(&mut self);
}

/// Host services handed to a game's constructor.
#[derive(Debug, Clone)]
pub struct GameContext {
    pub store: Rc<MemoryStore>,
}

/// Builds a game instance. Produced by a catalog entry's load future.
pub type GameCtor = Box<dyn FnOnce(&GameContext) -> Box<dyn Game> + Send>;
