//! Title screen and game list.
//!
//! Layout (rows): title on 1, subtitle on 2, a rule on 4, entries from 6,
//! key hint on `rows - 2`.

use crate::catalog::Catalog;
use crate::term::GridRenderer;
use crate::types::Color;

pub const TITLE: &str = "A R C T U I  G A M E S";
pub const SUBTITLE: &str = "arcade games - terminal style";
pub const EMPTY_CATALOG: &str = "(no games registered yet)";
pub const HINT: &str = "↑ ↓  navigate    Enter  select    Esc  back";
pub const SELECTED_PREFIX: &str = "▶ ";
pub const UNSELECTED_PREFIX: &str = "  ";

const TITLE_ROW: i32 = 1;
const SUBTITLE_ROW: i32 = 2;
const RULE_ROW: i32 = 4;
pub const LIST_ROW: i32 = 6;

/// Column at which `text` starts when centered in `width` cells.
pub fn centered_x(text: &str, width: u16) -> i32 {
    let len = text.chars().count() as i32;
    ((width as i32 - len) / 2).max(0)
}

fn centered(grid: &mut GridRenderer, y: i32, text: &str, fg: Color) {
    let x = centered_x(text, grid.cols());
    grid.put_str(x, y, text, fg, Color::Bg);
}

/// Stage the whole menu. Does not flush.
pub fn draw_menu(grid: &mut GridRenderer, catalog: &Catalog, selected: Option<usize>) {
    grid.clear(Color::Fg, Color::Bg);

    centered(grid, TITLE_ROW, TITLE, Color::Accent);
    centered(grid, SUBTITLE_ROW, SUBTITLE, Color::Dim);
    for x in 0..grid.cols() as i32 {
        grid.put(x, RULE_ROW, '─', Color::Dim, Color::Bg);
    }

    if catalog.is_empty() {
        centered(grid, LIST_ROW, EMPTY_CATALOG, Color::Dim);
        return;
    }

    for (i, entry) in catalog.iter().enumerate() {
        let is_selected = selected == Some(i);
        let (prefix, fg) = if is_selected {
            (SELECTED_PREFIX, Color::Accent)
        } else {
            (UNSELECTED_PREFIX, Color::Fg)
        };
        let line = format!("{prefix}{}", entry.name);
        centered(grid, LIST_ROW + i as i32, &line, fg);
    }

    centered(grid, grid.rows() as i32 - 2, HINT, Color::Dim);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centering_clamps_wide_text_to_column_zero() {
        assert_eq!(centered_x("abcd", 10), 3);
        assert_eq!(centered_x("abc", 10), 3);
        assert_eq!(centered_x("much too long", 4), 0);
        assert_eq!(centered_x("▶ x", 7), 2);
    }
}
