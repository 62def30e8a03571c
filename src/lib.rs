//! arctui (workspace facade crate).
//!
//! Re-exports the workspace crates under one name and holds the host-level
//! pieces the binary needs: environment configuration, logging setup and the
//! game registry.

pub use arctui_input as input;
pub use arctui_shell as shell;
pub use arctui_store as store;
pub use arctui_term as term;
pub use arctui_types as types;

pub mod config;
pub mod games;
pub mod logging;

pub use config::HostConfig;
