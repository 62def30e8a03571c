//! Host configuration from environment variables.
//!
//! - `ARCTUI_DATA_DIR`: where records are stored (default: the platform data
//!   directory + `/arctui`)
//! - `ARCTUI_MEMORY_ONLY`: set to "1" or "true" to keep records in memory only
//! - `ARCTUI_LOG_PATH`: log file (default: `arctui.log` in the data dir)
//! - `ARCTUI_LOG_LEVEL`: `off`, `error`, `warn`, `info`, `debug`, `trace`
//!   (default `info`)
//! - `ARCTUI_FRAME_MS`: frame interval in milliseconds (default 16)
//! - `ARCTUI_CELL_WIDTH` / `ARCTUI_CELL_HEIGHT`: terminal columns/rows per
//!   grid cell (default 1)

use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;

use crate::types::{CellPitch, FRAME_MS};

#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// `None` when no data directory could be determined.
    pub data_dir: Option<PathBuf>,
    pub memory_only: bool,
    pub log_path: Option<PathBuf>,
    pub log_level: LevelFilter,
    pub frame: Duration,
    pub pitch: CellPitch,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl HostConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset or unparseable values fall back
    /// to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let data_dir = var("ARCTUI_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::data_dir().map(|d| d.join("arctui")));

        let memory_only = var("ARCTUI_MEMORY_ONLY")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let log_path = var("ARCTUI_LOG_PATH")
            .map(PathBuf::from)
            .or_else(|| data_dir.as_ref().map(|d| d.join("arctui.log")));

        let log_level = var("ARCTUI_LOG_LEVEL")
            .and_then(|s| s.parse().ok())
            .unwrap_or(LevelFilter::Info);

        let frame_ms = var("ARCTUI_FRAME_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(FRAME_MS);

        let cell = |name: &str| {
            var(name)
                .and_then(|s| s.parse::<f32>().ok())
                .filter(|v| v.is_finite() && *v >= 1.0)
                .unwrap_or(1.0)
        };

        Self {
            data_dir,
            memory_only,
            log_path,
            log_level,
            frame: Duration::from_millis(frame_ms),
            pitch: CellPitch::new(cell("ARCTUI_CELL_WIDTH"), cell("ARCTUI_CELL_HEIGHT")),
        }
    }
}
