//! Key-press fan-out to subscribed handlers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use anyhow::Result;

use crate::types::{InputEvent, KeyPattern};

type Handler = Rc<dyn Fn(&InputEvent) -> Result<()>>;

/// Identifies one subscription for [`InputDispatcher::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Outcome of dispatching one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatched {
    /// The key is a navigation/action key; the host must not apply its own
    /// default handling to it.
    pub default_prevented: bool,
    /// Handlers that ran to completion.
    pub delivered: usize,
    /// Handlers that returned an error or panicked.
    pub failed: usize,
}

#[derive(Default)]
struct Table {
    next_id: u64,
    handlers: HashMap<KeyPattern, Vec<(HandlerId, Handler)>>,
    detached: bool,
}

/// Routes [`InputEvent`]s to handlers.
///
/// This is a cheap handle: clones share one subscription table, so the
/// shell and each game can hold their own copy. Handlers may call `on`/`off`
/// while being dispatched; such changes take effect from the next event.
#[derive(Clone, Default)]
pub struct InputDispatcher {
    table: Rc<RefCell<Table>>,
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to one key or to every key.
    pub fn on<F>(&self, pattern: impl Into<KeyPattern>, handler: F) -> HandlerId
    where
        F: Fn(&InputEvent) -> Result<()> + 'static,
    {
        let mut table = self.table.borrow_mut();
        let id = HandlerId(table.next_id);
        table.next_id += 1;
        table
            .handlers
            .entry(pattern.into())
            .or_default()
            .push((id, Rc::new(handler)));
        id
    }

    /// Remove one subscription. Returns whether anything was removed.
    pub fn off(&self, pattern: impl Into<KeyPattern>, id: HandlerId) -> bool {
        let pattern = pattern.into();
        let mut table = self.table.borrow_mut();
        let Some(list) = table.handlers.get_mut(&pattern) else {
            return false;
        };
        let before = list.len();
        list.retain(|(hid, _)| *hid != id);
        let removed = list.len() != before;
        if list.is_empty() {
            table.handlers.remove(&pattern);
        }
        removed
    }

    /// Detach from the input source and drop every subscription.
    pub fn destroy(&self) {
        let mut table = self.table.borrow_mut();
        table.handlers.clear();
        table.detached = true;
    }

    pub fn is_attached(&self) -> bool {
        !self.table.borrow().detached
    }

    /// Number of handlers subscribed to exactly `pattern`.
    pub fn handler_count(&self, pattern: impl Into<KeyPattern>) -> usize {
        self.table
            .borrow()
            .handlers
            .get(&pattern.into())
            .map_or(0, Vec::len)
    }

    /// Deliver one key press: handlers for the key first, then wildcard
    /// handlers, each exactly once.
    pub fn dispatch(&self, event: &InputEvent) -> Dispatched {
        let mut out = Dispatched {
            default_prevented: event.key.is_navigation(),
            ..Dispatched::default()
        };

        // Snapshot so handlers can (un)subscribe without holding the borrow.
        let snapshot: Vec<Handler> = {
            let table = self.table.borrow();
            if table.detached {
                return Dispatched::default();
            }
            let exact = table.handlers.get(&KeyPattern::Exact(event.key));
            let wildcard = table.handlers.get(&KeyPattern::Wildcard);
            exact
                .into_iter()
                .chain(wildcard)
                .flatten()
                .map(|(_, h)| Rc::clone(h))
                .collect()
        };

        for handler in snapshot {
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => out.delivered += 1,
                Ok(Err(e)) => {
                    out.failed += 1;
                    log::warn!("input: handler for {} failed: {e:#}", event.key);
                }
                Err(payload) => {
                    out.failed += 1;
                    log::warn!(
                        "input: handler for {} panicked: {}",
                        event.key,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
        out
    }
}

impl std::fmt::Debug for InputDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.table.borrow();
        f.debug_struct("InputDispatcher")
            .field("patterns", &table.handlers.len())
            .field("detached", &table.detached)
            .finish()
    }
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
