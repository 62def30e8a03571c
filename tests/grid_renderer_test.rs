//! Integration tests for the dirty-cell grid renderer.
//!
//! A `RecordingSurface` stands in for the terminal so every cell the
//! renderer pushes can be counted and inspected.

use std::cell::Cell as Flag;
use std::rc::Rc;

use anyhow::Result;

use arctui::term::{GridRenderer, RecordingSurface, Surface};
use arctui::types::{Cell, Color, GridSize};

fn grid(cols: u16, rows: u16) -> (GridRenderer, RecordingSurface) {
    let surface = RecordingSurface::new();
    let mut grid = GridRenderer::new(surface.clone());
    grid.resize(cols, rows).unwrap();
    surface.reset_counters();
    (grid, surface)
}

#[test]
fn flushed_surface_matches_staged_grid() {
    let (mut g, surface) = grid(6, 3);
    g.put_str(0, 0, "score", Color::Accent, Color::Bg);
    g.put(5, 2, '@', Color::Fg, Color::Dim);
    g.flush().unwrap();

    assert_eq!(g.dirty_len(), 0);
    for y in 0..3 {
        for x in 0..6 {
            assert_eq!(surface.cell(x, y), g.cell(x as i32, y as i32), "cell ({x}, {y})");
        }
    }
    assert_eq!(surface.text(), "score \n      \n     @");
}

#[test]
fn second_flush_writes_nothing() {
    let (mut g, surface) = grid(4, 4);
    g.put(1, 1, '#', Color::Fg, Color::Bg);
    g.flush().unwrap();
    let writes = surface.cell_writes();
    let presents = surface.presents();

    g.flush().unwrap();
    assert_eq!(surface.cell_writes(), writes);
    assert_eq!(surface.presents(), presents);
}

#[test]
fn restaging_identical_cell_is_not_dirty() {
    let (mut g, surface) = grid(4, 4);
    g.put(2, 3, 'o', Color::Fg, Color::Bg);
    g.flush().unwrap();
    surface.reset_counters();

    g.put(2, 3, 'o', Color::Fg, Color::Bg);
    assert_eq!(g.dirty_len(), 0);
    g.flush().unwrap();
    assert_eq!(surface.cell_writes(), 0);
}

#[test]
fn color_change_alone_marks_cell_dirty() {
    let (mut g, surface) = grid(3, 1);
    g.put(0, 0, 'x', Color::Fg, Color::Bg);
    g.flush().unwrap();
    surface.reset_counters();

    g.put(0, 0, 'x', Color::Accent, Color::Bg);
    assert_eq!(g.dirty_len(), 1);
    g.flush().unwrap();
    assert_eq!(surface.cell(0, 0), Some(Cell::new('x', Color::Accent, Color::Bg)));
}

#[test]
fn flush_right_after_resize_writes_nothing() {
    let (mut g, surface) = grid(2, 2);
    g.put(0, 0, 'a', Color::Fg, Color::Bg);

    g.resize(10, 5).unwrap();
    surface.reset_counters();
    assert_eq!((g.cols(), g.rows()), (10, 5));
    assert_eq!(g.dirty_len(), 0);

    g.flush().unwrap();
    assert_eq!(surface.cell_writes(), 0);
    assert_eq!(surface.text().lines().count(), 5);
    assert!(surface.text().lines().all(|l| l == "          "));
}

#[test]
fn clear_then_restore_redraws_only_what_changed() {
    let (mut g, surface) = grid(8, 2);
    g.put_str(0, 0, "keep", Color::Fg, Color::Bg);
    g.put_str(0, 1, "drop", Color::Fg, Color::Bg);
    g.flush().unwrap();
    surface.reset_counters();

    // Typical frame: clear everything and stage the next picture.
    g.clear(Color::Fg, Color::Bg);
    g.put_str(0, 0, "keep", Color::Fg, Color::Bg);
    assert_eq!(g.dirty_len(), 4);

    g.flush().unwrap();
    assert_eq!(surface.cell_writes(), 4);
    assert_eq!(surface.text(), "keep    \n        ");
}

#[test]
fn out_of_bounds_puts_are_ignored() {
    let (mut g, surface) = grid(3, 3);
    g.put(-1, 0, 'x', Color::Fg, Color::Bg);
    g.put(0, -1, 'x', Color::Fg, Color::Bg);
    g.put(3, 0, 'x', Color::Fg, Color::Bg);
    g.put(0, 3, 'x', Color::Fg, Color::Bg);
    g.put(i32::MAX, i32::MIN, 'x', Color::Fg, Color::Bg);
    assert_eq!(g.dirty_len(), 0);
    assert_eq!(g.cell(3, 0), None);

    g.flush().unwrap();
    assert_eq!(surface.cell_writes(), 0);
}

#[test]
fn one_flush_presents_once() {
    let (mut g, surface) = grid(5, 5);
    for i in 0..5 {
        g.put(i, i, '\\', Color::Fg, Color::Bg);
    }
    g.flush().unwrap();
    assert_eq!(surface.runs(), 5);
    assert_eq!(surface.presents(), 1);
}

/// Surface whose runs fail while `down` is set; otherwise records.
struct Flaky {
    inner: RecordingSurface,
    down: Rc<Flag<bool>>,
}

impl Surface for Flaky {
    fn clear(&mut self, size: GridSize) -> Result<()> {
        self.inner.clear(size)
    }

    fn draw_run(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()> {
        anyhow::ensure!(!self.down.get(), "surface unavailable");
        self.inner.draw_run(x, y, cells)
    }

    fn present(&mut self) -> Result<()> {
        self.inner.present()
    }
}

/// Small deterministic LCG so the sequence is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    fn below(&mut self, n: u32) -> u32 {
        self.next() % n
    }
}

fn assert_surface_matches(g: &GridRenderer, surface: &RecordingSurface, step: usize) {
    assert_eq!(g.dirty_len(), 0, "step {step}");
    for y in 0..g.rows() {
        for x in 0..g.cols() {
            assert_eq!(
                surface.cell(x, y),
                g.cell(x as i32, y as i32),
                "step {step}, cell ({x}, {y})"
            );
        }
    }
}

#[test]
fn generated_sequences_converge_after_every_flush() {
    const COLS: u16 = 7;
    const ROWS: u16 = 5;
    let glyphs = ['a', 'b', '#', ' '];
    let colors = [Color::Fg, Color::Bg, Color::Accent, Color::Dim];

    for seed in 1..=20u64 {
        let surface = RecordingSurface::new();
        let down = Rc::new(Flag::new(false));
        let mut g = GridRenderer::new(Flaky {
            inner: surface.clone(),
            down: Rc::clone(&down),
        });
        g.resize(COLS, ROWS).unwrap();
        let mut rng = Lcg(seed);

        for step in 0..400 {
            match rng.below(20) {
                // Mostly puts, some of them out of bounds by up to two cells.
                0..=13 => {
                    let x = rng.below(COLS as u32 + 4) as i32 - 2;
                    let y = rng.below(ROWS as u32 + 4) as i32 - 2;
                    let ch = glyphs[rng.below(glyphs.len() as u32) as usize];
                    let fg = colors[rng.below(colors.len() as u32) as usize];
                    g.put(x, y, ch, fg, Color::Bg);
                }
                14 => g.clear(Color::Fg, Color::Bg),
                15 => {
                    down.set(true);
                    let had_dirty = g.dirty_len() > 0;
                    assert_eq!(g.flush().is_err(), had_dirty, "step {step}");
                    down.set(false);
                }
                _ => {
                    g.flush().unwrap();
                    assert_surface_matches(&g, &surface, step);
                }
            }
        }

        g.flush().unwrap();
        assert_surface_matches(&g, &surface, usize::MAX);
    }
}
