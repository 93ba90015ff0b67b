//! Terminal grid with scrollback, scroll regions, BCE, and selection.

pub mod cursor;
mod editing;
mod navigation;
pub mod row;
mod scroll;
mod view;

#[cfg(test)]
mod tests;

use std::collections::VecDeque;

use crate::cell::{Cell, CellFlags, Color};
use crate::selection::Selection;
use cursor::Cursor;
use row::Row;

const TAB_INTERVAL: usize = 8;

/// Scrollback cap; eviction is oldest-first.
pub const MAX_SCROLLBACK: usize = 10_000;

/// The character written by the REP sequence: the most recent graphic
/// character together with the attributes it was written with.
#[derive(Debug, Clone)]
pub(crate) struct LastGraphic {
    pub c: char,
    pub fg: Color,
    pub bg: Color,
    pub flags: CellFlags,
    pub wide: bool,
}

#[derive(Debug, Clone)]
pub struct Grid {
    rows: Vec<Row>,
    pub cols: usize,
    pub lines: usize,
    pub cursor: Cursor,
    saved_cursor: Option<Cursor>,
    scroll_top: usize,
    scroll_bottom: usize,
    /// DECAWM. When off, prints at the last column overwrite in place.
    pub auto_wrap: bool,
    pub scrollback: VecDeque<Row>,
    max_scrollback: usize,
    /// 0 = live bottom; n = viewport is n rows into scrollback.
    pub display_offset: usize,
    pub(crate) last_graphic: Option<LastGraphic>,
    pub(crate) selection: Option<Selection>,
}

impl Grid {
    pub fn new(cols: usize, lines: usize) -> Self {
        Self::with_max_scrollback(cols, lines, MAX_SCROLLBACK)
    }

    pub fn with_max_scrollback(cols: usize, lines: usize, max_scrollback: usize) -> Self {
        let cols = cols.max(1);
        let lines = lines.max(1);
        Self {
            rows: (0..lines).map(|_| Row::new(cols)).collect(),
            cols,
            lines,
            cursor: Cursor::default(),
            saved_cursor: None,
            scroll_top: 0,
            scroll_bottom: lines - 1,
            auto_wrap: true,
            scrollback: VecDeque::new(),
            max_scrollback,
            display_offset: 0,
            last_graphic: None,
            selection: None,
        }
    }

    pub fn row(&self, line: usize) -> &Row {
        &self.rows[line]
    }

    pub fn row_mut(&mut self, line: usize) -> &mut Row {
        &mut self.rows[line]
    }

    /// The background used when erase/scroll/resize paths produce blank
    /// cells. SGR keeps the cursor template current, so this is always the
    /// live BCE color.
    pub fn erase_bg(&self) -> Color {
        self.cursor.template.bg
    }

    /// The blank cell all clear paths fill with.
    pub(crate) fn erase_cell(&self) -> Cell {
        Cell::blank(self.cursor.template.bg)
    }

    /// Resize the grid in place, keeping the overlap anchored at (0,0).
    ///
    /// New cells carry the erase background. The cursor is clamped, a
    /// pending wrap is dropped, and a sub-screen scroll region survives
    /// only while it still fits.
    pub fn resize(&mut self, cols: usize, lines: usize) {
        let cols = cols.max(1);
        let lines = lines.max(1);
        if cols == self.cols && lines == self.lines {
            return;
        }

        let blank = self.erase_cell();
        for row in &mut self.rows {
            row.resize(cols, &blank);
        }
        if lines < self.lines {
            self.rows.truncate(lines);
        } else {
            while self.rows.len() < lines {
                self.rows.push(Row::blank(cols, &blank));
            }
        }

        let was_full_region = self.scroll_top == 0 && self.scroll_bottom + 1 == self.lines;
        self.cols = cols;
        self.lines = lines;
        if was_full_region || self.scroll_bottom >= lines || self.scroll_top >= self.scroll_bottom {
            self.scroll_top = 0;
            self.scroll_bottom = lines - 1;
        }

        self.cursor.col = self.cursor.col.min(cols - 1);
        self.cursor.row = self.cursor.row.min(lines - 1);
        self.cursor.input_needs_wrap = false;
        self.display_offset = self.display_offset.min(self.scrollback.len());
        // Viewport coordinates changed shape; the overlay no longer maps.
        self.selection = None;

        // A wide pair split by the new right edge loses its lead.
        for r in 0..lines {
            if self.rows[r][cols - 1].is_wide() {
                self.rows[r][cols - 1].reset(&blank);
            }
        }
    }
}
