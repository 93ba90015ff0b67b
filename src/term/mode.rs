//! DEC private mode handling and the alternate-screen transitions.

use crate::charset::CharsetState;
use crate::grid::Grid;
use crate::term_mode::TermMode;

use super::performer::Performer;

impl Performer<'_> {
    /// SM/RM. Only `?`-prefixed (private) modes are honored; the ANSI set
    /// is accepted and ignored.
    pub(super) fn set_modes(&mut self, params: &vte::Params, private: bool, enable: bool) {
        if !private {
            return;
        }
        let modes: Vec<u16> = params
            .iter()
            .map(|group| group.first().copied().unwrap_or(0))
            .collect();
        for mode in modes {
            self.set_private_mode(mode, enable);
        }
    }

    fn set_private_mode(&mut self, mode: u16, enable: bool) {
        match mode {
            1 => self.mode.set(TermMode::APP_CURSOR, enable),
            6 => {
                self.mode.set(TermMode::ORIGIN, enable);
                // DECOM homes the cursor, to the region origin when set.
                self.goto_row_col(0, 0);
            }
            7 => self.active_grid().auto_wrap = enable,
            25 => self.mode.set(TermMode::SHOW_CURSOR, enable),
            47 | 1047 => {
                if enable {
                    self.enter_alt_screen(false);
                } else {
                    self.leave_alt_screen(false);
                }
            }
            1048 => {
                if enable {
                    self.active_grid().save_cursor();
                } else {
                    self.active_grid().restore_cursor();
                }
            }
            1049 => {
                if enable {
                    self.enter_alt_screen(true);
                } else {
                    self.leave_alt_screen(true);
                }
            }
            1000 => self.mode.set(TermMode::MOUSE_REPORT, enable),
            1002 => self.mode.set(TermMode::MOUSE_MOTION, enable),
            1003 => self.mode.set(TermMode::MOUSE_ALL, enable),
            1006 => self.mode.set(TermMode::SGR_MOUSE, enable),
            2004 => self.mode.set(TermMode::BRACKETED_PASTE, enable),
            _ => {}
        }
    }

    /// Switch to a freshly allocated blank alternate screen. The primary
    /// screen's cursor (for 1049), scroll region, and mode subset are
    /// captured for the way back.
    fn enter_alt_screen(&mut self, save_cursor: bool) {
        if *self.active_is_alt {
            return;
        }
        if save_cursor {
            self.grid.save_cursor();
        }
        *self.saved_region = Some((self.grid.scroll_top(), self.grid.scroll_bottom()));
        *self.saved_modes = *self.mode & TermMode::SAVED_ON_ALT;

        *self.alt_grid = Grid::with_max_scrollback(self.grid.cols, self.grid.lines, 0);
        self.alt_grid.cursor.template = self.grid.cursor.template.clone();
        self.alt_grid.auto_wrap = self.grid.auto_wrap;

        *self.active_is_alt = true;
        self.mode.insert(TermMode::ALT_SCREEN);
    }

    /// Return to the primary screen: restore the scroll region without
    /// moving the cursor, drop any pending wrap, reset SGR and charsets so
    /// TUI state cannot bleed through, restore the captured modes, then
    /// (for 1049) the saved cursor.
    fn leave_alt_screen(&mut self, restore_cursor: bool) {
        if !*self.active_is_alt {
            return;
        }
        *self.active_is_alt = false;

        if let Some((top, bottom)) = self.saved_region.take() {
            self.grid.restore_scroll_region(top, bottom);
        }
        self.grid.cursor.input_needs_wrap = false;
        self.grid.cursor.reset_attrs();
        *self.charset = CharsetState::default();

        *self.mode = (*self.mode - TermMode::SAVED_ON_ALT) | *self.saved_modes;
        self.mode.remove(TermMode::ALT_SCREEN);
        *self.saved_modes = TermMode::empty();

        if restore_cursor {
            self.grid.restore_cursor();
        }
    }
}
