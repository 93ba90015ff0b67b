//! Character writing, erasing, and insertion/deletion operations.

use crate::cell::CellFlags;

use super::{Grid, LastGraphic};

impl Grid {
    /// Write a single-width character at the cursor.
    pub fn put_char(&mut self, c: char) {
        if self.cursor.input_needs_wrap {
            self.cursor.input_needs_wrap = false;
            if self.auto_wrap {
                self.wrap_cursor();
            }
        }

        let row = self.cursor.row;
        let col = self.cursor.col.min(self.cols - 1);
        self.clear_wide_at(row, col);

        let template = &self.cursor.template;
        let cell = &mut self.rows[row][col];
        cell.c = c;
        cell.fg = template.fg;
        cell.bg = template.bg;
        cell.flags = template.flags & !CellFlags::LAYOUT;

        self.record_graphic(c, false);
        self.advance_after_write(col + 1);
    }

    /// Write a double-width character: the lead cell plus a spacer with
    /// identical styling in the next column.
    pub fn put_wide_char(&mut self, c: char) {
        if self.cols < 2 {
            return;
        }
        if self.cursor.input_needs_wrap {
            self.cursor.input_needs_wrap = false;
            if self.auto_wrap {
                self.wrap_cursor();
            }
        }

        if self.cursor.col + 1 >= self.cols {
            if !self.auto_wrap {
                // No room for the pair and no wrap permitted.
                return;
            }
            // Pad the final column with a blank carrying the current bg,
            // then wrap to the next line.
            let row = self.cursor.row;
            let col = self.cursor.col;
            self.clear_wide_at(row, col);
            self.rows[row][col] = self.erase_cell();
            self.wrap_cursor();
        }

        let row = self.cursor.row;
        let col = self.cursor.col;
        self.clear_wide_at(row, col);
        self.clear_wide_at(row, col + 1);

        let template = self.cursor.template.clone();
        let lead = &mut self.rows[row][col];
        lead.c = c;
        lead.fg = template.fg;
        lead.bg = template.bg;
        lead.flags = (template.flags & !CellFlags::LAYOUT) | CellFlags::WIDE_CHAR;

        let spacer = &mut self.rows[row][col + 1];
        spacer.c = ' ';
        spacer.fg = template.fg;
        spacer.bg = template.bg;
        spacer.flags = (template.flags & !CellFlags::LAYOUT) | CellFlags::WIDE_CHAR_SPACER;

        self.record_graphic(c, true);
        self.advance_after_write(col + 2);
    }

    /// Replay the most recent graphic character `count` times with the
    /// attributes it was originally written with (REP).
    pub fn repeat_last(&mut self, count: usize) {
        let Some(last) = self.last_graphic.clone() else { return };
        let saved = self.cursor.template.clone();
        self.cursor.template.fg = last.fg;
        self.cursor.template.bg = last.bg;
        self.cursor.template.flags = last.flags;
        for _ in 0..count {
            if last.wide {
                self.put_wide_char(last.c);
            } else {
                self.put_char(last.c);
            }
        }
        self.cursor.template = saved;
    }

    fn record_graphic(&mut self, c: char, wide: bool) {
        let template = &self.cursor.template;
        self.last_graphic = Some(LastGraphic {
            c,
            fg: template.fg,
            bg: template.bg,
            flags: template.flags,
            wide,
        });
    }

    fn advance_after_write(&mut self, next_col: usize) {
        if next_col >= self.cols {
            self.cursor.col = self.cols - 1;
            self.cursor.input_needs_wrap = self.auto_wrap;
        } else {
            self.cursor.col = next_col;
        }
    }

    /// Column 0 of the next line, scrolling as needed.
    fn wrap_cursor(&mut self) {
        self.cursor.col = 0;
        self.linefeed();
    }

    /// Blank the halves of any wide pair overlapping (`row`, `col`) so a
    /// write or shift there cannot leave a torn glyph.
    pub(super) fn clear_wide_at(&mut self, row: usize, col: usize) {
        if self.rows[row][col].is_wide_spacer() && col > 0 && self.rows[row][col - 1].is_wide() {
            let lead = &mut self.rows[row][col - 1];
            lead.c = ' ';
            lead.flags.remove(CellFlags::WIDE_CHAR);
        }
        if self.rows[row][col].is_wide() && col + 1 < self.cols {
            let spacer = &mut self.rows[row][col + 1];
            spacer.c = ' ';
            spacer.flags.remove(CellFlags::WIDE_CHAR_SPACER);
        }
    }

    /// Reset cells in `[start, end)` of `row` to the erase cell, blanking
    /// any wide pair broken at either boundary.
    fn clear_cols(&mut self, row: usize, start: usize, end: usize) {
        let end = end.min(self.cols);
        if start >= end {
            return;
        }
        let blank = self.erase_cell();
        if self.rows[row][start].is_wide_spacer() && start > 0 {
            self.rows[row][start - 1].reset(&blank);
        }
        if end < self.cols && self.rows[row][end].is_wide_spacer() {
            self.rows[row][end].reset(&blank);
        }
        for c in start..end {
            self.rows[row][c].reset(&blank);
        }
    }

    /// ED 0: cursor to end of screen.
    pub fn clear_below(&mut self) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        self.clear_cols(row, col, self.cols);
        let blank = self.erase_cell();
        for r in row + 1..self.lines {
            self.rows[r].reset(&blank);
        }
    }

    /// ED 1: start of screen to cursor, inclusive.
    pub fn clear_above(&mut self) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        let blank = self.erase_cell();
        for r in 0..row {
            self.rows[r].reset(&blank);
        }
        self.clear_cols(row, 0, col + 1);
    }

    /// ED 2: the whole screen. The cursor stays put.
    pub fn clear_all(&mut self) {
        let blank = self.erase_cell();
        for row in &mut self.rows {
            row.reset(&blank);
        }
    }

    /// ED 3: drop scrollback history.
    pub fn clear_scrollback(&mut self) {
        self.scrollback.clear();
        self.display_offset = 0;
    }

    /// EL 0: cursor to end of line.
    pub fn clear_line_to_end(&mut self) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        self.clear_cols(row, col, self.cols);
    }

    /// EL 1: start of line to cursor, inclusive.
    pub fn clear_line_to_start(&mut self) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        self.clear_cols(row, 0, col + 1);
    }

    /// EL 2: the whole line.
    pub fn clear_line(&mut self) {
        let blank = self.erase_cell();
        let row = self.cursor.row;
        self.rows[row].reset(&blank);
    }

    /// ECH: blank `count` cells in place from the cursor.
    pub fn erase_chars(&mut self, count: usize) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        self.clear_cols(row, col, col + count.max(1));
    }

    /// ICH: shift the tail of the line right, opening blank cells.
    pub fn insert_blank_chars(&mut self, count: usize) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        if col >= self.cols {
            return;
        }
        let count = count.max(1).min(self.cols - col);
        let blank = self.erase_cell();
        // A pair straddling the insertion point would be torn by the shift.
        if self.rows[row][col].is_wide_spacer() && col > 0 {
            self.rows[row][col - 1].reset(&blank);
            self.rows[row][col].reset(&blank);
        }

        for c in (col + count..self.cols).rev() {
            self.rows[row][c] = self.rows[row][c - count].clone();
        }
        for c in col..col + count {
            self.rows[row][c].reset(&blank);
        }
        // A lead pushed against the right edge lost its spacer.
        if self.rows[row][self.cols - 1].is_wide() {
            self.rows[row][self.cols - 1].reset(&blank);
        }
    }

    /// DCH: shift the tail of the line left over `count` removed cells.
    pub fn delete_chars(&mut self, count: usize) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        if col >= self.cols {
            return;
        }
        let count = count.max(1).min(self.cols - col);
        self.clear_wide_at(row, col);

        let blank = self.erase_cell();
        // The first surviving cell may be the spacer of a removed lead.
        if col + count < self.cols && self.rows[row][col + count].is_wide_spacer() {
            self.rows[row][col + count].reset(&blank);
        }
        for c in col..self.cols - count {
            self.rows[row][c] = self.rows[row][c + count].clone();
        }
        for c in self.cols - count..self.cols {
            self.rows[row][c].reset(&blank);
        }
    }

    /// IL: open blank lines at the cursor, pushing lines below down within
    /// the scroll region. Outside the region this is a no-op.
    pub fn insert_lines(&mut self, count: usize) {
        let row = self.cursor.row;
        if row < self.scroll_top || row > self.scroll_bottom {
            return;
        }
        self.scroll_down_in_region(row, self.scroll_bottom, count.max(1));
    }

    /// DL: delete lines at the cursor, pulling lines below up within the
    /// scroll region. Outside the region this is a no-op.
    pub fn delete_lines(&mut self, count: usize) {
        let row = self.cursor.row;
        if row < self.scroll_top || row > self.scroll_bottom {
            return;
        }
        self.scroll_up_in_region(row, self.scroll_bottom, count.max(1));
    }
}
