//! Core types module - shared data structures and constants
//!
//! Everything here is plain data with no external dependencies, so the
//! renderer, the input dispatcher, the shell and game plugins can all agree
//! on the same vocabulary.
//!
//! # Grid model
//!
//! The display is a `cols × rows` grid of [`Cell`]s. A cell carries one
//! glyph and two color tokens; the tokens are resolved to real colors by the
//! physical surface through a [`Theme`].
//!
//! # Timing constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_MS` | 16 | Default frame interval of the host loop (~60 FPS) |
//! | `MAX_FRAME_ELAPSED_MS` | 1000 | Cap on elapsed time handed to a game per tick |
//!
//! # Examples
//!
//! ```
//! use arctui_types::{grid_for_viewport, CellPitch, Key, KeyPattern};
//!
//! // Keys use browser-style names.
//! assert_eq!(Key::Up.name(), "ArrowUp");
//! assert_eq!("Enter".parse::<Key>().unwrap(), Key::Enter);
//!
//! // "*" subscribes to every key.
//! assert_eq!("*".parse::<KeyPattern>().unwrap(), KeyPattern::Wildcard);
//!
//! // Viewport sizing floors.
//! let size = grid_for_viewport(100.0, 41.0, CellPitch::new(9.6, 19.2));
//! assert_eq!((size.cols, size.rows), (10, 2));
//! ```

use std::fmt;
use std::str::FromStr;

/// Default frame interval in milliseconds (16ms ≈ 60 FPS)
pub const FRAME_MS: u64 = 16;

/// Upper bound on the elapsed time reported to a game in one tick.
///
/// A suspended terminal (Ctrl+Z, a slow SSH link) can stall the loop for
/// seconds; games should see one long frame, not a minute-long one.
pub const MAX_FRAME_ELAPSED_MS: u32 = 1000;

/// Glyph used for blank cells.
pub const BLANK: char = ' ';

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Color token stored in a cell.
///
/// The named tokens follow the host theme; `Rgb` is an explicit color that
/// bypasses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Default foreground.
    Fg,
    /// Default background.
    Bg,
    /// Highlight color (titles, current selection).
    Accent,
    /// Low-contrast color (hints, rules).
    Dim,
    Rgb(Rgb),
}

/// Maps color tokens to concrete colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub fg: Rgb,
    pub bg: Rgb,
    pub accent: Rgb,
    pub dim: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            accent: Rgb::new(0, 255, 140),
            dim: Rgb::new(110, 110, 120),
        }
    }
}

impl Theme {
    pub fn resolve(&self, color: Color) -> Rgb {
        match color {
            Color::Fg => self.fg,
            Color::Bg => self.bg,
            Color::Accent => self.accent,
            Color::Dim => self.dim,
            Color::Rgb(rgb) => rgb,
        }
    }
}

// ---------------------------------------------------------------------------
// Cells and grid sizing
// ---------------------------------------------------------------------------

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    pub const fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }

    /// A blank cell with the given colors.
    pub const fn blank(fg: Color, bg: Color) -> Self {
        Self { ch: BLANK, fg, bg }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(Color::Fg, Color::Bg)
    }
}

/// Size of one grid cell measured in host-surface units.
///
/// For the terminal host the unit is one terminal column/row, so
/// `CellPitch::new(2.0, 1.0)` draws every grid cell two columns wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPitch {
    pub width: f32,
    pub height: f32,
}

impl CellPitch {
    /// One terminal column by one terminal row.
    pub const UNIT: CellPitch = CellPitch {
        width: 1.0,
        height: 1.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for CellPitch {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Grid dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridSize {
    pub cols: u16,
    pub rows: u16,
}

impl GridSize {
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

/// Compute how many cells of `pitch` fit in a `width × height` drawing area.
///
/// Floor-rounds, never goes below zero, and yields an empty grid for a
/// non-positive or non-finite pitch.
pub fn grid_for_viewport(width: f32, height: f32, pitch: CellPitch) -> GridSize {
    if !(valid_pitch(pitch.width) && valid_pitch(pitch.height)) {
        return GridSize::default();
    }
    GridSize {
        cols: cells_along(width, pitch.width),
        rows: cells_along(height, pitch.height),
    }
}

fn valid_pitch(pitch: f32) -> bool {
    pitch.is_finite() && pitch > 0.0
}

fn cells_along(extent: f32, pitch: f32) -> u16 {
    if !extent.is_finite() || extent <= 0.0 {
        return 0;
    }
    // `as` saturates for out-of-range floats.
    (extent / pitch).floor() as u16
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Key identifier, named after the browser `KeyboardEvent.key` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Backspace,
    Tab,
    /// Printable character; the space bar is `Char(' ')`.
    Char(char),
    /// Function key `F1`..`F24`.
    F(u8),
}

impl Key {
    pub const SPACE: Key = Key::Char(' ');

    /// Browser-style identifier (`"ArrowUp"`, `"Enter"`, `" "`, `"a"`, `"F5"`).
    pub fn name(&self) -> String {
        match self {
            Key::Up => "ArrowUp".to_string(),
            Key::Down => "ArrowDown".to_string(),
            Key::Left => "ArrowLeft".to_string(),
            Key::Right => "ArrowRight".to_string(),
            Key::Enter => "Enter".to_string(),
            Key::Escape => "Escape".to_string(),
            Key::Backspace => "Backspace".to_string(),
            Key::Tab => "Tab".to_string(),
            Key::Char(c) => c.to_string(),
            Key::F(n) => format!("F{n}"),
        }
    }

    /// Keys whose host default handling is suppressed on dispatch.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::Up | Key::Down | Key::Left | Key::Right | Key::Char(' ')
        )
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Error returned when a key identifier cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError(pub String);

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key identifier: {:?}", self.0)
    }
}

impl std::error::Error for ParseKeyError {}

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            "Enter" => Key::Enter,
            "Escape" => Key::Escape,
            "Backspace" => Key::Backspace,
            "Tab" => Key::Tab,
            "Space" => Key::SPACE,
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => match s.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                        Some(n) if (1..=24).contains(&n) => Key::F(n),
                        _ => return Err(ParseKeyError(s.to_string())),
                    },
                }
            }
        };
        Ok(key)
    }
}

/// Subscription target: one specific key, or every key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPattern {
    Exact(Key),
    /// Matches every key (`"*"`).
    Wildcard,
}

impl From<Key> for KeyPattern {
    fn from(key: Key) -> Self {
        KeyPattern::Exact(key)
    }
}

impl FromStr for KeyPattern {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            Ok(KeyPattern::Wildcard)
        } else {
            s.parse().map(KeyPattern::Exact)
        }
    }
}

/// A normalized key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl InputEvent {
    /// A press without modifiers.
    pub const fn key(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
            alt: false,
        }
    }

    pub const fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }
}
