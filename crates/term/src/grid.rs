//! Staged character grid with dirty-cell tracking.

use anyhow::Result;

use crate::surface::Surface;
use crate::types::{Cell, Color, GridSize, BLANK};

/// Character grid that redraws only what changed.
///
/// Two buffers are kept: `staged` (what callers asked for) and `drawn` (what
/// the surface shows after the last flush). A cell is dirty exactly when the
/// two differ; `flush` pushes the dirty cells and then they agree again.
pub struct GridRenderer {
    cols: u16,
    rows: u16,
    staged: Vec<Cell>,
    drawn: Vec<Cell>,
    /// `dirty_mask[i]` iff `staged[i] != drawn[i]`.
    dirty_mask: Vec<bool>,
    /// Indices that became dirty since the last flush. May hold stale or
    /// repeated entries; `dirty_mask` is authoritative.
    dirty: Vec<usize>,
    dirty_len: usize,
    surface: Box<dyn Surface>,
}

impl GridRenderer {
    /// A 0×0 renderer; call [`resize`](Self::resize) before drawing.
    pub fn new(surface: impl Surface + 'static) -> Self {
        Self {
            cols: 0,
            rows: 0,
            staged: Vec::new(),
            drawn: Vec::new(),
            dirty_mask: Vec::new(),
            dirty: Vec::new(),
            dirty_len: 0,
            surface: Box::new(surface),
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn size(&self) -> GridSize {
        GridSize::new(self.cols, self.rows)
    }

    /// Number of cells whose staged value is not on screen yet.
    pub fn dirty_len(&self) -> usize {
        self.dirty_len
    }

    /// Reallocate to `cols × rows` blank cells and blank the surface.
    ///
    /// Anything staged but not flushed is discarded. Since the surface is
    /// reset to the same blanks, a flush right after this writes nothing.
    pub fn resize(&mut self, cols: u16, rows: u16) -> Result<()> {
        let len = cols as usize * rows as usize;
        self.cols = cols;
        self.rows = rows;
        self.staged.clear();
        self.staged.resize(len, Cell::default());
        self.drawn.clear();
        self.drawn.resize(len, Cell::default());
        self.dirty_mask.clear();
        self.dirty_mask.resize(len, false);
        self.dirty.clear();
        self.dirty_len = 0;

        self.surface.clear(self.size())?;
        self.surface.present()
    }

    #[inline(always)]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.cols as i32 || y >= self.rows as i32 {
            return None;
        }
        Some(y as usize * self.cols as usize + x as usize)
    }

    /// Staged value at `(x, y)`.
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.idx(x, y).map(|i| self.staged[i])
    }

    /// Stage one cell. Out-of-bounds coordinates are ignored.
    pub fn put(&mut self, x: i32, y: i32, ch: char, fg: Color, bg: Color) {
        if let Some(i) = self.idx(x, y) {
            self.stage(i, Cell { ch, fg, bg });
        }
    }

    /// Stage `s` left to right from `(x, y)`, one cell per `char`.
    pub fn put_str(&mut self, x: i32, y: i32, s: &str, fg: Color, bg: Color) {
        for (dx, ch) in s.chars().enumerate() {
            let cx = x.saturating_add(dx as i32);
            if cx >= self.cols as i32 {
                break;
            }
            self.put(cx, y, ch, fg, bg);
        }
    }

    /// Stage a blank in every cell.
    pub fn clear(&mut self, fg: Color, bg: Color) {
        let blank = Cell { ch: BLANK, fg, bg };
        for i in 0..self.staged.len() {
            self.stage(i, blank);
        }
    }

    fn stage(&mut self, i: usize, cell: Cell) {
        if self.staged[i] == cell {
            return;
        }
        self.staged[i] = cell;

        let dirty = cell != self.drawn[i];
        if dirty == self.dirty_mask[i] {
            return;
        }
        self.dirty_mask[i] = dirty;
        if dirty {
            self.dirty_len += 1;
            self.dirty.push(i);
        } else {
            self.dirty_len -= 1;
        }
    }

    /// Push every dirty cell to the surface in one row-major pass, then
    /// present. Does nothing at all when no cell is dirty.
    ///
    /// If the surface fails, every cell that was dirty stays dirty and the
    /// next flush sends it again.
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty_len == 0 {
            self.dirty.clear();
            return Ok(());
        }

        let mut pending = std::mem::take(&mut self.dirty);
        pending.sort_unstable();
        pending.dedup();
        pending.retain(|&i| self.dirty_mask[i]);

        if let Err(e) = self
            .draw_runs(&pending)
            .and_then(|()| self.surface.present())
        {
            self.dirty = pending;
            return Err(e);
        }

        for &i in &pending {
            self.drawn[i] = self.staged[i];
            self.dirty_mask[i] = false;
        }
        self.dirty_len = 0;

        pending.clear();
        self.dirty = pending;
        Ok(())
    }

    /// Draw sorted, deduplicated cell indices as row runs.
    fn draw_runs(&mut self, pending: &[usize]) -> Result<()> {
        let cols = self.cols as usize;
        let mut k = 0;
        while k < pending.len() {
            let start = pending[k];
            let mut end = start + 1;
            k += 1;
            // Coalesce adjacent cells on the same row into one run.
            while k < pending.len() && pending[k] == end && end % cols != 0 {
                end += 1;
                k += 1;
            }
            self.surface.draw_run(
                (start % cols) as u16,
                (start / cols) as u16,
                &self.staged[start..end],
            )?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for GridRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridRenderer")
            .field("cols", &self.cols)
            .field("rows", &self.rows)
            .field("dirty_len", &self.dirty_len)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use std::cell::Cell as Flag;
    use std::rc::Rc;

    /// Records like [`RecordingSurface`] but fails runs while `down` is set.
    struct Unreliable {
        inner: RecordingSurface,
        down: Rc<Flag<bool>>,
    }

    impl Surface for Unreliable {
        fn clear(&mut self, size: GridSize) -> Result<()> {
            self.inner.clear(size)
        }

        fn draw_run(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()> {
            anyhow::ensure!(!self.down.get(), "surface is down");
            self.inner.draw_run(x, y, cells)
        }

        fn present(&mut self) -> Result<()> {
            self.inner.present()
        }
    }

    fn grid(cols: u16, rows: u16) -> (GridRenderer, RecordingSurface) {
        let surface = RecordingSurface::new();
        let mut grid = GridRenderer::new(surface.clone());
        grid.resize(cols, rows).unwrap();
        surface.reset_counters();
        (grid, surface)
    }

    #[test]
    fn adjacent_writes_coalesce_into_one_run() {
        let (mut g, surface) = grid(5, 2);
        for x in 1..=3 {
            g.put(x, 0, 'X', Color::Fg, Color::Bg);
        }
        g.flush().unwrap();
        assert_eq!(surface.runs(), 1);
        assert_eq!(surface.cell_writes(), 3);
    }

    #[test]
    fn runs_break_at_row_ends() {
        let (mut g, surface) = grid(3, 2);
        g.put(2, 0, 'a', Color::Fg, Color::Bg);
        g.put(0, 1, 'b', Color::Fg, Color::Bg);
        g.flush().unwrap();
        assert_eq!(surface.runs(), 2);
        assert_eq!(surface.text(), "  a\nb  ");
    }

    #[test]
    fn restoring_a_cell_before_flush_clears_its_dirty_bit() {
        let (mut g, surface) = grid(4, 1);
        g.put(0, 0, 'Z', Color::Accent, Color::Bg);
        assert_eq!(g.dirty_len(), 1);
        g.put(0, 0, ' ', Color::Fg, Color::Bg);
        assert_eq!(g.dirty_len(), 0);

        // Toggle again: the index is queued twice but drawn once.
        g.put(0, 0, 'Z', Color::Accent, Color::Bg);
        g.put(0, 0, ' ', Color::Fg, Color::Bg);
        g.put(0, 0, 'Z', Color::Accent, Color::Bg);
        g.flush().unwrap();
        assert_eq!(surface.cell_writes(), 1);
    }

    #[test]
    fn put_str_clips_at_right_edge() {
        let (mut g, _) = grid(4, 1);
        g.put_str(2, 0, "hello", Color::Fg, Color::Bg);
        assert_eq!(g.cell(2, 0).unwrap().ch, 'h');
        assert_eq!(g.cell(3, 0).unwrap().ch, 'e');
        assert_eq!(g.dirty_len(), 2);
    }

    #[test]
    fn put_str_starting_left_of_grid_keeps_visible_tail() {
        let (mut g, _) = grid(4, 1);
        g.put_str(-2, 0, "abcd", Color::Fg, Color::Bg);
        assert_eq!(g.cell(0, 0).unwrap().ch, 'c');
        assert_eq!(g.cell(1, 0).unwrap().ch, 'd');
    }

    #[test]
    fn zero_sized_grid_ignores_everything() {
        let (mut g, surface) = grid(0, 0);
        g.put(0, 0, 'x', Color::Fg, Color::Bg);
        g.clear(Color::Dim, Color::Dim);
        g.flush().unwrap();
        assert_eq!(surface.cell_writes(), 0);
        assert_eq!(surface.presents(), 0);
    }

    #[test]
    fn failed_flush_keeps_cells_dirty() {
        let recording = RecordingSurface::new();
        let down = Rc::new(Flag::new(false));
        let mut g = GridRenderer::new(Unreliable {
            inner: recording.clone(),
            down: Rc::clone(&down),
        });
        g.resize(3, 2).unwrap();

        g.put(0, 0, 'x', Color::Fg, Color::Bg);
        g.put(2, 1, 'z', Color::Fg, Color::Bg);
        down.set(true);
        assert!(g.flush().is_err());
        assert_eq!(g.dirty_len(), 2);

        down.set(false);
        g.flush().unwrap();
        assert_eq!(g.dirty_len(), 0);
        assert_eq!(recording.text(), "x  \n  z");

        // Later edits to the same cells still reach the surface.
        g.put(0, 0, 'y', Color::Fg, Color::Bg);
        g.flush().unwrap();
        assert_eq!(recording.cell(0, 0).map(|c| c.ch), Some('y'));
    }
}
