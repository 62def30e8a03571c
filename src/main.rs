//! Terminal arcade host (default binary).
//!
//! Owns the terminal, reads crossterm key events into the input dispatcher
//! and drives the shell once per frame.

use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;
use crossterm::event::{self, Event};

use arctui::input::{event_from_key, is_host_quit, InputDispatcher};
use arctui::shell::{Shell, ShellConfig};
use arctui::store::{FileStorage, MemoryStorage, StoreProvider, DEFAULT_NAMESPACE};
use arctui::term::{GridRenderer, TerminalSession, TerminalSurface};
use arctui::types::Theme;
use arctui::{games, logging, HostConfig};

fn main() -> Result<()> {
    let config = HostConfig::from_env();
    logging::init(&config)?;
    log::info!("arctui starting: {config:?}");

    let mut session = TerminalSession::enter()?;
    let result = run(&session, &config);

    // Always try to restore terminal state.
    let _ = session.exit();
    if let Err(e) = &result {
        log::error!("arctui stopped: {e:#}");
    }
    result
}

fn store_provider(config: &HostConfig) -> StoreProvider {
    match config.data_dir.as_ref().filter(|_| !config.memory_only) {
        Some(dir) => StoreProvider::with_storage(FileStorage::new(dir, DEFAULT_NAMESPACE)),
        None => {
            log::info!("store: records are kept in memory for this session");
            StoreProvider::with_storage(MemoryStorage::new())
        }
    }
}

fn run(session: &TerminalSession, config: &HostConfig) -> Result<()> {
    let grid = GridRenderer::new(TerminalSurface::stdout(Theme::default(), config.pitch));
    let input = InputDispatcher::new();
    let mut shell = Shell::new(
        games::registry(),
        grid,
        input.clone(),
        Rc::new(store_provider(config)),
        ShellConfig {
            pitch: config.pitch,
        },
    )?;
    shell.install_input();

    let (w, h) = session.size()?;
    shell.resize_viewport(w as f32, h as f32)?;

    loop {
        let frame_start = Instant::now();
        shell.tick(frame_start)?;

        // Input with timeout until next frame.
        let deadline = frame_start + config.frame;
        while let Some(timeout) = deadline.checked_duration_since(Instant::now()) {
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) => {
                    let Some(ev) = event_from_key(key) else {
                        continue;
                    };
                    input.dispatch(&ev);
                    if is_host_quit(&ev) {
                        log::info!("arctui: quit requested");
                        return Ok(());
                    }
                }
                Event::Resize(w, h) => shell.resize_viewport(w as f32, h as f32)?,
                _ => {}
            }
        }
    }
}
