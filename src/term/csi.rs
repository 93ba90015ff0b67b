//! CSI sequence dispatch.

use crate::term_mode::TermMode;

use super::CursorStyle;
use super::performer::Performer;

/// First value of the `idx`-th parameter, with `default` standing in for
/// missing or zero parameters.
fn arg(params: &vte::Params, idx: usize, default: u16) -> u16 {
    params
        .iter()
        .nth(idx)
        .and_then(|group| group.first().copied())
        .filter(|&v| v != 0)
        .unwrap_or(default)
}

impl Performer<'_> {
    pub(super) fn csi(&mut self, params: &vte::Params, intermediates: &[u8], action: char) {
        match (action, intermediates.first().copied()) {
            ('m', None) => self.apply_sgr(params),
            ('h', marker @ (None | Some(b'?'))) => self.set_modes(params, marker.is_some(), true),
            ('l', marker @ (None | Some(b'?'))) => self.set_modes(params, marker.is_some(), false),
            // DECSCUSR: CSI Ps SP q.
            ('q', Some(b' ')) => self.set_cursor_style(arg(params, 0, 0)),
            // Secondary DA: terminal type 0, firmware 136.
            ('c', Some(b'>')) => self.write_pty(b"\x1b[>0;136;0c"),
            // Primary DA: VT220-compatible with ANSI color.
            ('c', None) => self.write_pty(b"\x1b[?62;22c"),
            (_, None) => self.csi_plain(params, action),
            // Unknown intermediates (XTMODKEYS and friends): no-op.
            _ => {}
        }
    }

    fn csi_plain(&mut self, params: &vte::Params, action: char) {
        let n = arg(params, 0, 1) as usize;
        match action {
            'A' => self.active_grid().move_up(n),
            'B' => self.active_grid().move_down(n),
            'C' => self.active_grid().move_forward(n),
            'D' => self.active_grid().move_backward(n),
            'E' => {
                let grid = self.active_grid();
                grid.move_down(n);
                grid.carriage_return();
            }
            'F' => {
                let grid = self.active_grid();
                grid.move_up(n);
                grid.carriage_return();
            }
            'G' => self.active_grid().goto_col(n - 1),
            'H' | 'f' => {
                let row = arg(params, 0, 1) as usize - 1;
                let col = arg(params, 1, 1) as usize - 1;
                self.goto_row_col(row, col);
            }
            'J' => match arg(params, 0, 0) {
                0 => self.active_grid().clear_below(),
                1 => self.active_grid().clear_above(),
                2 => self.active_grid().clear_all(),
                3 => self.active_grid().clear_scrollback(),
                _ => {}
            },
            'K' => match arg(params, 0, 0) {
                0 => self.active_grid().clear_line_to_end(),
                1 => self.active_grid().clear_line_to_start(),
                2 => self.active_grid().clear_line(),
                _ => {}
            },
            'L' => self.active_grid().insert_lines(n),
            'M' => self.active_grid().delete_lines(n),
            'P' => self.active_grid().delete_chars(n),
            '@' => self.active_grid().insert_blank_chars(n),
            'S' => self.active_grid().scroll_up(n),
            'T' => self.active_grid().scroll_down(n),
            'X' => self.active_grid().erase_chars(n),
            'd' => self.goto_row(n - 1),
            'b' => self.active_grid().repeat_last(n),
            'r' => self.set_scroll_region(params),
            's' => self.active_grid().save_cursor(),
            'u' => self.active_grid().restore_cursor(),
            'n' => self.device_status(arg(params, 0, 0)),
            _ => {}
        }
    }

    /// CUP/HVP target, shifted and clamped into the scroll region under
    /// origin mode.
    pub(super) fn goto_row_col(&mut self, row: usize, col: usize) {
        let origin = self.mode.contains(TermMode::ORIGIN);
        let grid = self.active_grid();
        if origin {
            let top = grid.scroll_top();
            let bottom = grid.scroll_bottom();
            grid.goto((top + row).min(bottom), col);
        } else {
            grid.goto(row, col);
        }
    }

    /// VPA target, origin-relative under DECOM.
    fn goto_row(&mut self, row: usize) {
        let origin = self.mode.contains(TermMode::ORIGIN);
        let grid = self.active_grid();
        if origin {
            let top = grid.scroll_top();
            let bottom = grid.scroll_bottom();
            grid.goto_row((top + row).min(bottom));
        } else {
            grid.goto_row(row);
        }
    }

    /// DECSTBM. Parameters are 1-based; the cursor homes afterwards,
    /// origin-relative when DECOM is set.
    fn set_scroll_region(&mut self, params: &vte::Params) {
        let lines = self.active_grid_ref().lines;
        let top = arg(params, 0, 1) as usize;
        let bottom = (arg(params, 1, lines as u16) as usize).min(lines);
        if top < bottom {
            self.active_grid().set_scroll_region(top - 1, bottom - 1);
        }
        self.goto_row_col(0, 0);
    }

    fn device_status(&mut self, code: u16) {
        match code {
            // DSR: terminal OK.
            5 => self.write_pty(b"\x1b[0n"),
            // CPR: 1-based cursor position, region-relative under DECOM.
            6 => {
                let origin = self.mode.contains(TermMode::ORIGIN);
                let grid = self.active_grid_ref();
                let mut row = grid.cursor.row;
                if origin {
                    row = row.saturating_sub(grid.scroll_top());
                }
                let col = grid.cursor.col;
                let report = format!("\x1b[{};{}R", row + 1, col + 1);
                self.write_pty(report.as_bytes());
            }
            _ => {}
        }
    }

    fn set_cursor_style(&mut self, style: u16) {
        *self.cursor_style = match style {
            0..=2 => CursorStyle::Block,
            3 | 4 => CursorStyle::Underline,
            5 | 6 => CursorStyle::Bar,
            _ => return,
        };
    }
}
