//! Catalog of selectable games.

use anyhow::Result;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::game::{Game, GameContext, GameCtor};

/// Resolves to a constructor for the entry's game.
pub type LoadFuture = BoxFuture<'static, Result<GameCtor>>;

/// One selectable game.
pub struct CatalogEntry {
    /// URL-safe identifier; also the game's store key by convention.
    pub slug: String,
    /// Shown in the menu.
    pub name: String,
    load: Box<dyn Fn() -> LoadFuture>,
}

impl CatalogEntry {
    pub fn new<F>(slug: impl Into<String>, name: impl Into<String>, load: F) -> Self
    where
        F: Fn() -> LoadFuture + 'static,
    {
        Self {
            slug: slug.into(),
            name: name.into(),
            load: Box::new(load),
        }
    }

    /// Entry whose load resolves immediately to `make`.
    pub fn ready<F>(slug: impl Into<String>, name: impl Into<String>, make: F) -> Self
    where
        F: Fn(&GameContext) -> Box<dyn Game> + Clone + Send + 'static,
    {
        Self::new(slug, name, move || {
            let make = make.clone();
            async move { Ok(Box::new(move |ctx: &GameContext| make(ctx)) as GameCtor) }.boxed()
        })
    }

    /// Start a fresh load.
    pub fn load(&self) -> LoadFuture {
        (self.load)()
    }
}

impl std::fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("slug", &self.slug)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered list of entries. The shell only reads it.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, entry: CatalogEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }
}

impl FromIterator<CatalogEntry> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
