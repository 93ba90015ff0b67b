//! Cursor movement, the scroll region, and cursor save/restore.

use super::Grid;
use super::cursor::Cursor;

impl Grid {
    /// Absolute move, clamped to the grid. Any motion drops a pending wrap
    /// and a landing on a wide-char spacer snaps back onto the lead cell.
    pub fn goto(&mut self, row: usize, col: usize) {
        self.cursor.row = row.min(self.lines - 1);
        self.cursor.col = col.min(self.cols - 1);
        self.cursor.input_needs_wrap = false;
        self.snap_to_wide_base();
    }

    pub fn goto_row(&mut self, row: usize) {
        self.cursor.row = row.min(self.lines - 1);
        self.cursor.input_needs_wrap = false;
        self.snap_to_wide_base();
    }

    pub fn goto_col(&mut self, col: usize) {
        self.cursor.col = col.min(self.cols - 1);
        self.cursor.input_needs_wrap = false;
        self.snap_to_wide_base();
    }

    pub fn move_up(&mut self, n: usize) {
        self.cursor.row = self.cursor.row.saturating_sub(n);
        self.cursor.input_needs_wrap = false;
        self.snap_to_wide_base();
    }

    pub fn move_down(&mut self, n: usize) {
        self.cursor.row = (self.cursor.row + n).min(self.lines - 1);
        self.cursor.input_needs_wrap = false;
        self.snap_to_wide_base();
    }

    pub fn move_forward(&mut self, n: usize) {
        self.cursor.col = (self.cursor.col + n).min(self.cols - 1);
        self.cursor.input_needs_wrap = false;
        self.snap_to_wide_base();
    }

    pub fn move_backward(&mut self, n: usize) {
        self.cursor.col = self.cursor.col.saturating_sub(n);
        self.cursor.input_needs_wrap = false;
        self.snap_to_wide_base();
    }

    /// DECSC: snapshot position and attributes into this grid's slot.
    pub fn save_cursor(&mut self) {
        self.saved_cursor = Some(self.cursor.clone());
    }

    /// DECRC: restore the saved snapshot, clamped to the current bounds.
    /// Without a prior save this homes the cursor with default attributes.
    pub fn restore_cursor(&mut self) {
        let saved = self.saved_cursor.clone().unwrap_or_default();
        self.cursor = saved;
        self.cursor.row = self.cursor.row.min(self.lines - 1);
        self.cursor.col = self.cursor.col.min(self.cols - 1);
        self.cursor.input_needs_wrap = false;
    }

    /// DECSTBM with 0-based inclusive bounds. Invalid regions are ignored.
    pub fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        if top < bottom && bottom < self.lines {
            self.scroll_top = top;
            self.scroll_bottom = bottom;
        }
    }

    pub fn reset_scroll_region(&mut self) {
        self.scroll_top = 0;
        self.scroll_bottom = self.lines - 1;
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn scroll_bottom(&self) -> usize {
        self.scroll_bottom
    }

    /// Restore a previously captured region if it still fits.
    pub(crate) fn restore_scroll_region(&mut self, top: usize, bottom: usize) {
        if top < bottom && bottom < self.lines {
            self.scroll_top = top;
            self.scroll_bottom = bottom;
        } else {
            self.reset_scroll_region();
        }
    }

    pub(super) fn snap_to_wide_base(&mut self) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        if col > 0 && col < self.cols && self.rows[row][col].is_wide_spacer() {
            self.cursor.col = col - 1;
        }
    }
}

impl Grid {
    /// The saved-cursor slot, for round-trip inspection.
    pub fn saved_cursor(&self) -> Option<&Cursor> {
        self.saved_cursor.as_ref()
    }
}
