//! TerminalSurface: flushes grid runs to a real terminal.
//!
//! Runs are encoded as crossterm commands into an in-memory buffer and the
//! buffer is written to the terminal in a single `write_all` on `present`.

use std::io::{self, IsTerminal, Write};

use anyhow::{bail, Result};

use crossterm::{
    cursor,
    style::{
        Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
        SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::surface::Surface;
use crate::types::{Cell, CellPitch, GridSize, Rgb, Theme, BLANK};

/// Raw mode + alternate screen for the lifetime of the host.
pub struct TerminalSession {
    stdout: io::Stdout,
    active: bool,
}

impl TerminalSession {
    /// Take over the terminal.
    ///
    /// Fails straight away when stdout is not a terminal: there is nothing to
    /// draw into.
    pub fn enter() -> Result<Self> {
        let mut stdout = io::stdout();
        if !stdout.is_terminal() {
            bail!("stdout is not a terminal; arctui needs one to draw into");
        }
        terminal::enable_raw_mode()?;
        stdout.queue(terminal::EnterAlternateScreen)?;
        stdout.queue(cursor::Hide)?;
        stdout.queue(terminal::DisableLineWrap)?;
        stdout.flush()?;
        Ok(Self {
            stdout,
            active: true,
        })
    }

    /// Current terminal size in columns and rows.
    pub fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    pub fn exit(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

/// [`Surface`] that draws into a terminal (or any writer).
pub struct TerminalSurface<W: Write = io::Stdout> {
    out: W,
    buf: Vec<u8>,
    theme: Theme,
    scale_x: u16,
    scale_y: u16,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout(theme: Theme, pitch: CellPitch) -> Self {
        Self::new(io::stdout(), theme, pitch)
    }
}

impl<W: Write> TerminalSurface<W> {
    /// `pitch` is rounded to whole terminal columns/rows per grid cell.
    pub fn new(out: W, theme: Theme, pitch: CellPitch) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(64 * 1024),
            theme,
            scale_x: whole_cells(pitch.width),
            scale_y: whole_cells(pitch.height),
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}

fn whole_cells(pitch: f32) -> u16 {
    if pitch.is_finite() && pitch >= 1.0 {
        pitch.round() as u16
    } else {
        1
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn clear(&mut self, _size: GridSize) -> Result<()> {
        self.buf.queue(SetBackgroundColor(rgb_to_color(self.theme.bg)))?;
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn draw_run(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()> {
        encode_run_into(
            &mut self.buf,
            &self.theme,
            (self.scale_x, self.scale_y),
            x,
            y,
            cells,
        )
    }

    fn present(&mut self) -> Result<()> {
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        // Drop the batch even if the write fails; the grid resends what it
        // still considers dirty.
        let written = self.out.write_all(&self.buf).and_then(|()| self.out.flush());
        self.buf.clear();
        Ok(written?)
    }
}

/// Encode one run of grid cells into `out`.
///
/// Each grid cell covers `scale.0 × scale.1` terminal cells; the glyph sits
/// in the top-left one and the rest are painted with the cell background.
pub fn encode_run_into(
    out: &mut Vec<u8>,
    theme: &Theme,
    scale: (u16, u16),
    x: u16,
    y: u16,
    cells: &[Cell],
) -> Result<()> {
    let (sx, sy) = scale;
    let mut current: Option<(Rgb, Rgb)> = None;

    for dy in 0..sy {
        out.queue(cursor::MoveTo(
            x.saturating_mul(sx),
            y.saturating_mul(sy).saturating_add(dy),
        ))?;
        for cell in cells {
            let colors = (theme.resolve(cell.fg), theme.resolve(cell.bg));
            if current != Some(colors) {
                out.queue(SetForegroundColor(rgb_to_color(colors.0)))?;
                out.queue(SetBackgroundColor(rgb_to_color(colors.1)))?;
                current = Some(colors);
            }
            out.queue(Print(if dy == 0 { cell.ch } else { BLANK }))?;
            for _ in 1..sx {
                out.queue(Print(BLANK))?;
            }
        }
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> TermColor {
    TermColor::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
