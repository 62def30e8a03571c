//! The menu / active-game state machine.

use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use std::time::Instant;

use anyhow::{anyhow, Result};

use crate::catalog::Catalog;
use crate::game::{Game, GameContext, GameCtor};
use crate::input::{panic_message, HandlerId, InputDispatcher};
use crate::loader::{LoadPoll, Loader, PendingLoad};
use crate::menu::draw_menu;
use crate::store::StoreProvider;
use crate::term::GridRenderer;
use crate::types::{grid_for_viewport, CellPitch, Color, Key, MAX_FRAME_ELAPSED_MS};

/// Who owns the grid right now.
pub enum LoopState {
    Menu,
    Active { slug: String, game: Box<dyn Game> },
}

impl LoopState {
    pub fn name(&self) -> &'static str {
        match self {
            LoopState::Menu => "menu",
            LoopState::Active { .. } => "active",
        }
    }
}

/// Menu cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShellConfig {
    /// Size of one grid cell in viewport units.
    pub pitch: CellPitch,
}

struct ShellCore {
    catalog: Catalog,
    grid: GridRenderer,
    input: InputDispatcher,
    stores: Rc<StoreProvider>,
    loader: Loader,
    config: ShellConfig,
    state: LoopState,
    /// `Some(i)` with `i < catalog.len()` iff the catalog is non-empty.
    selected: Option<usize>,
    pending: Option<PendingLoad>,
    last_tick: Option<Instant>,
}

/// Menu/game shell driven by [`Shell::tick`] once per frame.
///
/// Input reaches the shell through the [`InputDispatcher`] once
/// [`install_input`](Shell::install_input) has subscribed its handlers;
/// the same operations are also callable directly.
pub struct Shell {
    core: Rc<RefCell<ShellCore>>,
    input: InputDispatcher,
    subscriptions: Vec<(Key, HandlerId)>,
}

impl Shell {
    pub fn new(
        catalog: Catalog,
        grid: GridRenderer,
        input: InputDispatcher,
        stores: Rc<StoreProvider>,
        config: ShellConfig,
    ) -> Result<Self> {
        let selected = if catalog.is_empty() { None } else { Some(0) };
        let core = ShellCore {
            catalog,
            grid,
            input: input.clone(),
            stores,
            loader: Loader::new()?,
            config,
            state: LoopState::Menu,
            selected,
            pending: None,
            last_tick: None,
        };
        Ok(Self {
            core: Rc::new(RefCell::new(core)),
            input,
            subscriptions: Vec::new(),
        })
    }

    /// Subscribe Up/Down/Enter/Escape to the shell. Idempotent.
    pub fn install_input(&mut self) {
        if !self.subscriptions.is_empty() {
            return;
        }
        let bindings: [(Key, fn(&mut ShellCore)); 4] = [
            (Key::Up, |core: &mut ShellCore| core.navigate(Nav::Prev)),
            (Key::Down, |core: &mut ShellCore| core.navigate(Nav::Next)),
            (Key::Enter, |core: &mut ShellCore| {
                core.confirm();
            }),
            (Key::Escape, |core: &mut ShellCore| {
                core.cancel();
            }),
        ];
        for (key, action) in bindings {
            let core: Weak<RefCell<ShellCore>> = Rc::downgrade(&self.core);
            let id = self.input.on(key, move |_| {
                let Some(core) = core.upgrade() else {
                    return Ok(());
                };
                let mut core = core
                    .try_borrow_mut()
                    .map_err(|_| anyhow!("shell is busy"))?;
                action(&mut *core);
                Ok(())
            });
            self.subscriptions.push((key, id));
        }
    }

    pub fn uninstall_input(&mut self) {
        for (key, id) in self.subscriptions.drain(..) {
            self.input.off(key, id);
        }
    }

    /// Run one frame at time `now`.
    pub fn tick(&self, now: Instant) -> Result<()> {
        self.core.borrow_mut().tick(now)
    }

    /// Resize the grid for a `width × height` drawing area.
    pub fn resize_viewport(&self, width: f32, height: f32) -> Result<()> {
        self.core.borrow_mut().resize_viewport(width, height)
    }

    pub fn navigate(&self, nav: Nav) {
        self.core.borrow_mut().navigate(nav);
    }

    /// Start loading the selected game. Returns whether a load started.
    pub fn confirm(&self) -> bool {
        self.core.borrow_mut().confirm()
    }

    /// Leave the active game. Returns whether a game was torn down.
    pub fn cancel(&self) -> bool {
        self.core.borrow_mut().cancel()
    }

    pub fn state_name(&self) -> &'static str {
        self.core.borrow().state.name()
    }

    pub fn is_menu(&self) -> bool {
        matches!(self.core.borrow().state, LoopState::Menu)
    }

    /// Slug of the active game, if any.
    pub fn active_slug(&self) -> Option<String> {
        match &self.core.borrow().state {
            LoopState::Active { slug, .. } => Some(slug.clone()),
            LoopState::Menu => None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.core.borrow().selected
    }

    pub fn is_loading(&self) -> bool {
        self.core.borrow().pending.is_some()
    }

    /// Current grid dimensions `(cols, rows)`.
    pub fn grid_size(&self) -> (u16, u16) {
        let core = self.core.borrow();
        (core.grid.cols(), core.grid.rows())
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        self.uninstall_input();
        if let Ok(mut core) = self.core.try_borrow_mut() {
            core.cancel();
        }
    }
}

impl ShellCore {
    fn tick(&mut self, now: Instant) -> Result<()> {
        let elapsed_ms = self.last_tick.map_or(0, |last| {
            let ms = now.saturating_duration_since(last).as_millis();
            ms.min(MAX_FRAME_ELAPSED_MS as u128) as u32
        });
        self.last_tick = Some(now);

        self.poll_pending();

        let ShellCore {
            state,
            grid,
            catalog,
            selected,
            ..
        } = self;
        match state {
            LoopState::Menu => draw_menu(grid, catalog, *selected),
            LoopState::Active { slug, game } => {
                guarded("update", slug, || game.update(elapsed_ms));
                guarded("render", slug, || game.render(grid));
            }
        }
        grid.flush()
    }

    fn poll_pending(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let result = match pending.poll() {
            LoadPoll::Pending => return,
            LoadPoll::Ready(result) => result,
        };
        let slug = pending.slug().to_string();
        let took = pending.started().elapsed();
        self.pending = None;

        match result {
            Ok(ctor) => {
                log::debug!("shell: {slug} loaded in {took:?}");
                self.activate(slug, ctor);
            }
            Err(e) => log::warn!("shell: loading {slug} failed: {e:#}"),
        }
    }

    fn activate(&mut self, slug: String, ctor: GameCtor) {
        let context = GameContext {
            store: self.stores.get(),
        };
        let mut game = match catch_unwind(AssertUnwindSafe(|| ctor(&context))) {
            Ok(game) => game,
            Err(payload) => {
                log::warn!(
                    "shell: constructing {slug} panicked: {}",
                    panic_message(payload.as_ref())
                );
                return;
            }
        };

        // The game starts from a blank grid, not the menu's leftovers.
        self.grid.clear(Color::Fg, Color::Bg);
        let (grid, input) = (&mut self.grid, &self.input);
        if !guarded("init", &slug, || game.init(grid, input)) {
            guarded("destroy", &slug, || {
                game.destroy();
                Ok(())
            });
            return;
        }

        log::info!("shell: {slug} started");
        self.state = LoopState::Active { slug, game };
    }

    fn navigate(&mut self, nav: Nav) {
        if !matches!(self.state, LoopState::Menu) {
            return;
        }
        let n = self.catalog.len();
        let Some(i) = self.selected.filter(|_| n > 0) else {
            return;
        };
        self.selected = Some(match nav {
            Nav::Prev => (i + n - 1) % n,
            Nav::Next => (i + 1) % n,
        });
    }

    fn confirm(&mut self) -> bool {
        if !matches!(self.state, LoopState::Menu) {
            return false;
        }
        if let Some(pending) = &self.pending {
            log::debug!("shell: {} is still loading; ignoring confirm", pending.slug());
            return false;
        }
        let Some(entry) = self.selected.and_then(|i| self.catalog.get(i)) else {
            return false;
        };
        log::info!("shell: loading {}", entry.slug);
        self.pending = Some(self.loader.start(&entry.slug, entry.load()));
        true
    }

    fn cancel(&mut self) -> bool {
        let LoopState::Active { slug, mut game } =
            std::mem::replace(&mut self.state, LoopState::Menu)
        else {
            return false;
        };
        guarded("destroy", &slug, || {
            game.destroy();
            Ok(())
        });
        drop(game);
        self.grid.clear(Color::Fg, Color::Bg);
        log::info!("shell: {slug} closed");
        true
    }

    fn resize_viewport(&mut self, width: f32, height: f32) -> Result<()> {
        let size = grid_for_viewport(width, height, self.config.pitch);
        log::debug!("shell: viewport {width}x{height} -> grid {}x{}", size.cols, size.rows);
        self.grid.resize(size.cols, size.rows)?;
        if matches!(self.state, LoopState::Menu) {
            draw_menu(&mut self.grid, &self.catalog, self.selected);
            self.grid.flush()?;
        }
        Ok(())
    }
}

/// Run one game callback, containing errors and panics.
fn guarded(what: &str, slug: &str, f: impl FnOnce() -> Result<()>) -> bool {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            log::warn!("shell: {slug} {what} failed: {e:#}");
            false
        }
        Err(payload) => {
            log::warn!(
                "shell: {slug} {what} panicked: {}",
                panic_message(payload.as_ref())
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::store::MemoryStorage;
    use crate::term::RecordingSurface;

    struct Idle;

    impl Game for Idle {
        fn init(&mut self, _: &mut GridRenderer, _: &InputDispatcher) -> Result<()> {
            Ok(())
        }
        fn update(&mut self, _: u32) -> Result<()> {
            Ok(())
        }
        fn render(&mut self, _: &mut GridRenderer) -> Result<()> {
            Ok(())
        }
        fn destroy(&mut self) {}
    }

    fn shell(entries: usize) -> Shell {
        let catalog = (0..entries)
            .map(|i| {
                CatalogEntry::ready(format!("g{i}"), format!("Game {i}"), |_| {
                    Box::new(Idle) as Box<dyn Game>
                })
            })
            .collect();
        Shell::new(
            catalog,
            GridRenderer::new(RecordingSurface::new()),
            InputDispatcher::new(),
            Rc::new(StoreProvider::with_storage(MemoryStorage::new())),
            ShellConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn selection_starts_at_first_entry() {
        assert_eq!(shell(2).selected(), Some(0));
        assert_eq!(shell(0).selected(), None);
    }

    #[test]
    fn navigation_is_a_no_op_on_empty_catalog() {
        let s = shell(0);
        s.navigate(Nav::Next);
        s.navigate(Nav::Prev);
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn single_entry_wraps_onto_itself() {
        let s = shell(1);
        s.navigate(Nav::Next);
        assert_eq!(s.selected(), Some(0));
        s.navigate(Nav::Prev);
        assert_eq!(s.selected(), Some(0));
    }

    #[test]
    fn cancel_in_menu_does_nothing() {
        let s = shell(2);
        assert!(!s.cancel());
        assert_eq!(s.state_name(), "menu");
    }

    #[test]
    fn install_input_twice_subscribes_once() {
        let mut s = shell(2);
        s.install_input();
        s.install_input();
        assert_eq!(s.input.handler_count(Key::Enter), 1);
        s.uninstall_input();
        assert_eq!(s.input.handler_count(Key::Enter), 0);
    }
}
