//! Scrolling: line feeds, reverse index, and region scrolls feeding the
//! scrollback ring.

use super::Grid;
use super::row::Row;

impl Grid {
    /// LF/IND: move down one row. At the region bottom the region scrolls;
    /// at the screen bottom outside the region the whole screen scrolls.
    pub fn linefeed(&mut self) {
        self.cursor.input_needs_wrap = false;
        if self.cursor.row == self.scroll_bottom {
            self.scroll_up_in_region(self.scroll_top, self.scroll_bottom, 1);
        } else if self.cursor.row + 1 == self.lines {
            self.scroll_up_in_region(0, self.lines - 1, 1);
        } else {
            self.cursor.row += 1;
        }
    }

    pub fn carriage_return(&mut self) {
        self.cursor.col = 0;
        self.cursor.input_needs_wrap = false;
    }

    /// BS: one column left. Landing on a wide-char spacer pulls the cursor
    /// back onto the lead cell.
    pub fn backspace(&mut self) {
        self.cursor.input_needs_wrap = false;
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
            self.snap_to_wide_base();
        }
    }

    /// HT: advance to the next 8-column stop, clamped to the last column.
    pub fn tab(&mut self) {
        self.cursor.input_needs_wrap = false;
        let next = (self.cursor.col / super::TAB_INTERVAL + 1) * super::TAB_INTERVAL;
        self.cursor.col = next.min(self.cols - 1);
        self.snap_to_wide_base();
    }

    /// RI: move up one row, scrolling the region down at the region top.
    #[allow(clippy::else_if_without_else, reason = "no action at the top edge")]
    pub fn reverse_index(&mut self) {
        self.cursor.input_needs_wrap = false;
        if self.cursor.row == self.scroll_top {
            self.scroll_down_in_region(self.scroll_top, self.scroll_bottom, 1);
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
        }
    }

    /// SU: scroll the region up `count` lines.
    pub fn scroll_up(&mut self, count: usize) {
        self.scroll_up_in_region(self.scroll_top, self.scroll_bottom, count.max(1));
    }

    /// SD: scroll the region down `count` lines.
    pub fn scroll_down(&mut self, count: usize) {
        self.scroll_down_in_region(self.scroll_top, self.scroll_bottom, count.max(1));
    }

    /// Scroll `[top, bottom]` up, filling the bottom with BCE blanks.
    ///
    /// Rows leaving a region that starts at the top of the screen enter
    /// scrollback; the viewport offset is adjusted so a scrolled-back view
    /// stays anchored on the same content.
    pub(super) fn scroll_up_in_region(&mut self, top: usize, bottom: usize, count: usize) {
        if top > bottom || bottom >= self.lines {
            return;
        }
        let count = count.min(bottom - top + 1);
        let blank = self.erase_cell();

        for _ in 0..count {
            let scrolled_row = self.rows.remove(top);

            if top == 0 {
                if self.scrollback.len() >= self.max_scrollback {
                    self.scrollback.pop_front();
                    if self.display_offset > 0 {
                        self.display_offset -= 1;
                    }
                } else if self.display_offset > 0 {
                    self.display_offset = (self.display_offset + 1).min(self.max_scrollback);
                }
                self.scrollback.push_back(scrolled_row);
            }

            self.rows.insert(bottom, Row::blank(self.cols, &blank));
        }
    }

    /// Scroll `[top, bottom]` down, filling the top with BCE blanks.
    pub(super) fn scroll_down_in_region(&mut self, top: usize, bottom: usize, count: usize) {
        if top > bottom || bottom >= self.lines {
            return;
        }
        let count = count.min(bottom - top + 1);
        let blank = self.erase_cell();

        for _ in 0..count {
            self.rows.remove(bottom);
            self.rows.insert(top, Row::blank(self.cols, &blank));
        }
    }
}
