//! File logging.
//!
//! The terminal belongs to the grid, so log lines go to a file.

use std::fs::{self, File};
use std::sync::Once;

use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::HostConfig;

static PANIC_HOOK: Once = Once::new();

/// Install the global logger. Without a log path, logging stays off.
///
/// The panic hook is installed either way: panics inside handlers and games
/// are contained, and the default hook would print over the grid.
pub fn init(config: &HostConfig) -> Result<()> {
    install_panic_hook();

    let Some(path) = config.log_path.as_ref() else {
        return Ok(());
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    WriteLogger::init(config.log_level, log_config, file)
        .context("a global logger is already installed")?;
    Ok(())
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            log::error!("panic: {info}");
        }));
    });
}
