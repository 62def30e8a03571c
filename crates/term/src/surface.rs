//! Physical drawing surfaces.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use crate::types::{Cell, GridSize};

/// The medium a [`crate::GridRenderer`] flushes into.
pub trait Surface {
    /// Reset the whole surface to `size` blank default cells.
    fn clear(&mut self, size: GridSize) -> Result<()>;

    /// Draw `cells` left to right starting at grid cell `(x, y)`. A run never
    /// wraps past the end of a row.
    fn draw_run(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()>;

    /// Make everything drawn since the last call visible.
    fn present(&mut self) -> Result<()>;
}

#[derive(Debug, Default)]
struct Recording {
    size: GridSize,
    screen: Vec<Cell>,
    cell_writes: usize,
    runs: usize,
    clears: usize,
    presents: usize,
}

/// In-memory surface that records what reached it.
///
/// Clones share state, so a test can keep one clone while the renderer owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells physically written by `draw_run` since creation or the last
    /// [`reset_counters`](Self::reset_counters).
    pub fn cell_writes(&self) -> usize {
        self.inner.borrow().cell_writes
    }

    pub fn runs(&self) -> usize {
        self.inner.borrow().runs
    }

    pub fn clears(&self) -> usize {
        self.inner.borrow().clears
    }

    pub fn presents(&self) -> usize {
        self.inner.borrow().presents
    }

    pub fn reset_counters(&self) {
        let mut rec = self.inner.borrow_mut();
        rec.cell_writes = 0;
        rec.runs = 0;
        rec.clears = 0;
        rec.presents = 0;
    }

    pub fn size(&self) -> GridSize {
        self.inner.borrow().size
    }

    /// What is currently "on screen" at `(x, y)`.
    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        let rec = self.inner.borrow();
        if x >= rec.size.cols || y >= rec.size.rows {
            return None;
        }
        rec.screen
            .get(y as usize * rec.size.cols as usize + x as usize)
            .copied()
    }

    /// Screen glyphs, one line per row.
    pub fn text(&self) -> String {
        let rec = self.inner.borrow();
        let cols = rec.size.cols.max(1) as usize;
        rec.screen
            .chunks(cols)
            .map(|row| row.iter().map(|c| c.ch).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, size: GridSize) -> Result<()> {
        let mut rec = self.inner.borrow_mut();
        rec.size = size;
        rec.screen = vec![Cell::default(); size.cols as usize * size.rows as usize];
        rec.clears += 1;
        Ok(())
    }

    fn draw_run(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()> {
        let mut rec = self.inner.borrow_mut();
        let cols = rec.size.cols as usize;
        anyhow::ensure!(
            x as usize + cells.len() <= cols && y < rec.size.rows,
            "run at ({x}, {y}) of {} cells is outside the {}x{} surface",
            cells.len(),
            rec.size.cols,
            rec.size.rows
        );
        let start = y as usize * cols + x as usize;
        rec.screen[start..start + cells.len()].copy_from_slice(cells);
        rec.cell_writes += cells.len();
        rec.runs += 1;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.inner.borrow_mut().presents += 1;
        Ok(())
    }
}
