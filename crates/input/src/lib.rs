//! Terminal input.
//!
//! Raw terminal key events are normalized into [`crate::types::InputEvent`]s
//! by [`map`], then fanned out by an [`InputDispatcher`] to handlers
//! subscribed per key or on the `*` wildcard.

pub mod dispatcher;
pub mod map;

pub use arctui_types as types;

pub use dispatcher::{panic_message, Dispatched, HandlerId, InputDispatcher};
pub use map::{event_from_key, is_host_quit};
