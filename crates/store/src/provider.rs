//! Process-wide store handle.
//!
//! `main` builds one [`StoreProvider`] and hands it (or the [`MemoryStore`]
//! it yields) to whoever needs storage. There is no global: `reset` only
//! drops the cached instance, and the next `get` rebuilds it from the same
//! factory, so durable data written before the reset is still visible.

use std::cell::RefCell;
use std::rc::Rc;

use crate::memory::MemoryStore;
use crate::storage::Storage;

pub struct StoreProvider {
    factory: Box<dyn Fn() -> MemoryStore>,
    current: RefCell<Option<Rc<MemoryStore>>>,
}

impl StoreProvider {
    /// Provider whose store is built by `factory` on first access.
    pub fn new(factory: impl Fn() -> MemoryStore + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            current: RefCell::new(None),
        }
    }

    /// Provider over a clonable backend; each rebuild gets a clone of it.
    pub fn with_storage<S: Storage + Clone + 'static>(storage: S) -> Self {
        Self::new(move || MemoryStore::new(storage.clone()))
    }

    /// The current store, creating it if needed.
    pub fn get(&self) -> Rc<MemoryStore> {
        let mut current = self.current.borrow_mut();
        if let Some(store) = current.as_ref() {
            return Rc::clone(store);
        }
        log::debug!("store: constructing memory store");
        let store = Rc::new((self.factory)());
        *current = Some(Rc::clone(&store));
        store
    }

    /// Drop the cached store. Outstanding `Rc`s stay valid.
    pub fn reset(&self) {
        self.current.borrow_mut().take();
    }
}

impl std::fmt::Debug for StoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreProvider")
            .field("constructed", &self.current.borrow().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::cell::Cell;

    #[test]
    fn factory_runs_once_per_reset() {
        let built = Rc::new(Cell::new(0));
        let counter = Rc::clone(&built);
        let storage = MemoryStorage::new();
        let provider = StoreProvider::new(move || {
            counter.set(counter.get() + 1);
            MemoryStore::new(storage.clone())
        });

        assert_eq!(built.get(), 0);
        provider.get();
        provider.get();
        assert_eq!(built.get(), 1);

        provider.reset();
        provider.reset();
        assert_eq!(built.get(), 1);
        provider.get();
        assert_eq!(built.get(), 2);
    }
}
