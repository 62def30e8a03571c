//! Game registry.
//!
//! Each entry maps a slug to a display name and a load future resolving to
//! the game's constructor. Games are loaded when selected in the menu.
//!
//! Registering a game:
//!
//! ```ignore
//! Catalog::new().with(CatalogEntry::ready("snake", "Snake", |ctx| {
//!     Box::new(snake::Snake::new(ctx.store.clone()))
//! }))
//! ```

use crate::shell::Catalog;

/// Games shown in the menu, in display order.
pub fn registry() -> Catalog {
    Catalog::new()
}
