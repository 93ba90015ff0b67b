//! The `vte::Perform` implementation dispatching parser actions to the
//! grid and terminal state.

use std::io::Write;
use std::path::PathBuf;

use unicode_width::UnicodeWidthChar;

use crate::charset::CharsetState;
use crate::grid::Grid;
use crate::term_mode::TermMode;

use super::CursorStyle;
use super::osc;

/// Borrows every piece of terminal state for the duration of one
/// `Parser::advance` call.
pub(super) struct Performer<'a> {
    pub grid: &'a mut Grid,
    pub alt_grid: &'a mut Grid,
    pub active_is_alt: &'a mut bool,
    pub mode: &'a mut TermMode,
    pub charset: &'a mut CharsetState,
    pub cursor_style: &'a mut CursorStyle,
    pub title: &'a mut String,
    pub cwd: &'a mut Option<PathBuf>,
    pub saved_region: &'a mut Option<(usize, usize)>,
    pub saved_modes: &'a mut TermMode,
    pub termcap_query: &'a mut Option<Vec<u8>>,
    pub writer: &'a mut Option<Box<dyn Write + Send>>,
}

/// Longest DCS payload retained; anything bigger is a garbage query.
const MAX_DCS_PAYLOAD: usize = 256;

impl Performer<'_> {
    /// The currently active screen grid.
    pub(super) fn active_grid(&mut self) -> &mut Grid {
        if *self.active_is_alt { self.alt_grid } else { self.grid }
    }

    pub(super) fn active_grid_ref(&self) -> &Grid {
        if *self.active_is_alt { self.alt_grid } else { self.grid }
    }

    pub(super) fn write_pty(&mut self, data: &[u8]) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.write_all(data);
            let _ = w.flush();
        }
    }

    /// RIS: drop everything and start from a cold terminal.
    fn reset_state(&mut self) {
        let cols = self.grid.cols;
        let lines = self.grid.lines;
        *self.grid = Grid::new(cols, lines);
        *self.alt_grid = Grid::with_max_scrollback(cols, lines, 0);
        *self.active_is_alt = false;
        *self.mode = TermMode::default();
        *self.charset = CharsetState::default();
        *self.cursor_style = CursorStyle::default();
        *self.saved_region = None;
        *self.saved_modes = TermMode::empty();
        *self.termcap_query = None;
    }

    /// XTGETTCAP: reply per queried capability. Only RGB truecolor
    /// (hex "524742") is advertised.
    fn respond_termcap(&mut self, query: &[u8]) {
        for cap in query.split(|&b| b == b';') {
            if cap == b"524742" {
                self.write_pty(b"\x1bP1+r524742\x1b\\");
            } else {
                self.write_pty(b"\x1bP0+r\x1b\\");
            }
        }
    }
}

impl vte::Perform for Performer<'_> {
    fn print(&mut self, c: char) {
        let c = self.charset.map(c);
        let grid = self.active_grid();
        match UnicodeWidthChar::width(c) {
            Some(2) => grid.put_wide_char(c),
            Some(1) => grid.put_char(c),
            // Zero-width marks and stray controls are dropped.
            _ => {}
        }
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            0x08 => self.active_grid().backspace(),
            0x09 => self.active_grid().tab(),
            0x0a | 0x0b | 0x0c => self.active_grid().linefeed(),
            0x0d => self.active_grid().carriage_return(),
            // SO/SI: shift to G1/G0.
            0x0e => self.charset.active = 1,
            0x0f => self.charset.active = 0,
            // BEL and everything else: ignored.
            _ => {}
        }
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        match (intermediates.first().copied(), byte) {
            (Some(b'('), c) => self.charset.designate(0, c),
            (Some(b')'), c) => self.charset.designate(1, c),
            // G2/G3 designation and DEC screen tests: accepted, unused.
            (Some(b'*' | b'+' | b'#'), _) => {}
            (None, b'7') => self.active_grid().save_cursor(),
            (None, b'8') => self.active_grid().restore_cursor(),
            (None, b'c') => self.reset_state(),
            (None, b'D') => self.active_grid().linefeed(),
            (None, b'E') => {
                let grid = self.active_grid();
                grid.linefeed();
                grid.carriage_return();
            }
            (None, b'M') => self.active_grid().reverse_index(),
            // DECKPAM/DECKPNM: keypad modes are not surfaced.
            (None, b'=' | b'>') => {}
            _ => {}
        }
    }

    fn csi_dispatch(
        &mut self,
        params: &vte::Params,
        intermediates: &[u8],
        ignore: bool,
        action: char,
    ) {
        if ignore {
            return;
        }
        self.csi(params, intermediates, action);
    }

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        if params.is_empty() {
            return;
        }
        match params[0] {
            b"0" | b"2" => {
                if let Some(text) = params.get(1) {
                    *self.title = String::from_utf8_lossy(text).into_owned();
                }
            }
            // Icon title and palette set/query: understood, not tracked.
            b"1" | b"4" => {}
            b"7" => {
                if let Some(uri) = params.get(1) {
                    if let Some(path) = osc::parse_cwd(uri) {
                        *self.cwd = Some(path);
                    }
                }
            }
            _ => {}
        }
    }

    fn hook(&mut self, _params: &vte::Params, intermediates: &[u8], _ignore: bool, action: char) {
        *self.termcap_query = if action == 'q' && intermediates == [b'+'] {
            Some(Vec::new())
        } else {
            None
        };
    }

    fn put(&mut self, byte: u8) {
        if let Some(buf) = self.termcap_query.as_mut() {
            if buf.len() < MAX_DCS_PAYLOAD {
                buf.push(byte);
            }
        }
    }

    fn unhook(&mut self) {
        if let Some(query) = self.termcap_query.take() {
            self.respond_termcap(&query);
        }
    }
}
