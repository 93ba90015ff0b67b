//! Viewport: scrollback navigation, display snapshots, and the selection
//! overlay.

use crate::cell::Cell;
use crate::selection::Selection;

use super::Grid;
use super::row::Row;

impl Grid {
    /// Scroll the view `n` rows into history, clamped to the scrollback
    /// length. An active selection's anchor moves with the content and the
    /// captured offset follows.
    pub fn scroll_view_up(&mut self, n: usize) {
        let target = (self.display_offset + n).min(self.scrollback.len());
        let delta = target - self.display_offset;
        self.display_offset = target;
        if let Some(sel) = self.selection.as_mut() {
            sel.start_row += delta;
            sel.captured_offset = target;
        }
    }

    /// Scroll the view `n` rows back toward the live bottom.
    pub fn scroll_view_down(&mut self, n: usize) {
        let delta = n.min(self.display_offset);
        self.display_offset -= delta;
        if let Some(sel) = self.selection.as_mut() {
            sel.start_row = sel.start_row.saturating_sub(delta);
            sel.captured_offset = self.display_offset;
        }
    }

    /// Jump back to the live bottom. A selection captured elsewhere is not
    /// mutated; it simply stops matching until cleared.
    pub fn reset_scroll_offset(&mut self) {
        self.display_offset = 0;
    }

    pub fn scroll_offset(&self) -> usize {
        self.display_offset
    }

    /// The row visible at viewport line `line`, accounting for the current
    /// scroll position.
    pub fn visible_row(&self, line: usize) -> &Row {
        let line = line.min(self.lines - 1);
        if self.display_offset == 0 {
            return &self.rows[line];
        }
        let scrollback_len = self.scrollback.len();
        let offset_line = line as isize - self.display_offset as isize;
        if offset_line < 0 {
            let sb_idx = scrollback_len as isize + offset_line;
            if sb_idx >= 0 && (sb_idx as usize) < scrollback_len {
                return &self.scrollback[sb_idx as usize];
            }
            return &self.rows[0];
        }
        &self.rows[offset_line as usize]
    }

    /// Snapshot of the cell visible at (`col`, `row`). Out-of-range
    /// coordinates yield a default cell.
    pub fn display_cell(&self, col: usize, row: usize) -> Cell {
        if row >= self.lines {
            return Cell::default();
        }
        let visible = self.visible_row(row);
        if col >= visible.len() {
            return Cell::default();
        }
        visible[col].clone()
    }

    /// The visible screen as text, one line per row, trailing blanks
    /// trimmed.
    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        for line in 0..self.lines {
            if line > 0 {
                out.push('\n');
            }
            out.push_str(&self.visible_row(line).text());
        }
        out
    }

    /// Begin or replace the selection, anchored at the current scroll
    /// position.
    pub fn set_selection(&mut self, start_col: usize, start_row: usize, end_col: usize, end_row: usize) {
        self.selection = Some(Selection::new(
            start_col,
            start_row,
            end_col,
            end_row,
            self.display_offset,
        ));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    /// Whether the viewport cell at (`col`, `row`) is selected. A selection
    /// whose captured offset no longer matches the live one is treated as
    /// inactive without being mutated.
    pub fn is_selected(&self, col: usize, row: usize) -> bool {
        match &self.selection {
            Some(sel) if sel.captured_offset == self.display_offset => sel.contains(col, row),
            _ => false,
        }
    }

    /// The selected text, right-trimmed per line. Empty when there is no
    /// valid selection at the current scroll position.
    pub fn selected_text(&self) -> String {
        let Some(sel) = &self.selection else { return String::new() };
        if sel.captured_offset != self.display_offset {
            return String::new();
        }

        let ((start_row, start_col), (end_row, end_col)) = sel.normalized();
        let mut out = String::new();
        for row in start_row..=end_row.min(self.lines - 1) {
            let visible = self.visible_row(row);
            let from = if row == start_row { start_col } else { 0 };
            let to = if row == end_row { end_col.min(visible.len().saturating_sub(1)) } else { visible.len().saturating_sub(1) };

            let mut line = String::new();
            for col in from..=to {
                if col >= visible.len() {
                    break;
                }
                let cell = &visible[col];
                if cell.is_wide_spacer() {
                    continue;
                }
                line.push(cell.c);
            }
            line.truncate(line.trim_end_matches(' ').len());

            if row > start_row {
                out.push('\n');
            }
            out.push_str(&line);
        }
        out
    }
}
