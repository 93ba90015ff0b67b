//! Terminal state machine.
//!
//! `Term` owns the byte-stream parser, two grids (primary + alternate),
//! mode flags, charset state, title, and working directory, and exposes the
//! snapshot/control surface the renderer and input translator consume.
//! Device reports are written back through an injected writer wired to the
//! PTY.

mod csi;
mod mode;
mod mouse;
mod osc;
mod performer;
mod sgr;


pub use mouse::MouseMode;

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cell::Cell;
use crate::charset::CharsetState;
use crate::grid::Grid;
use crate::term_mode::TermMode;
use performer::Performer;

/// Cursor rendering style selected by DECSCUSR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Block,
    Underline,
    Bar,
}

/// The terminal interpreter for one pane.
pub struct Term {
    parser: vte::Parser,
    grid: Grid,
    alt_grid: Grid,
    active_is_alt: bool,
    mode: TermMode,
    charset: CharsetState,
    cursor_style: CursorStyle,
    title: String,
    cwd: Option<PathBuf>,
    /// Primary-screen scroll region captured on alt-screen entry.
    saved_region: Option<(usize, usize)>,
    /// Mode subset captured on alt-screen entry.
    saved_modes: TermMode,
    /// XTGETTCAP payload being accumulated between DCS hook and unhook.
    termcap_query: Option<Vec<u8>>,
    writer: Option<Box<dyn Write + Send>>,
}

impl Term {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            parser: vte::Parser::new(),
            grid: Grid::new(cols, rows),
            alt_grid: Grid::with_max_scrollback(cols, rows, 0),
            active_is_alt: false,
            mode: TermMode::default(),
            charset: CharsetState::default(),
            cursor_style: CursorStyle::default(),
            title: String::new(),
            cwd: None,
            saved_region: None,
            saved_modes: TermMode::empty(),
            termcap_query: None,
            writer: None,
        }
    }

    /// Wire the response writer used for DSR/DA/XTGETTCAP replies. The pane
    /// points this at its PTY writer.
    pub fn set_writer(&mut self, writer: Box<dyn Write + Send>) {
        self.writer = Some(writer);
    }

    /// Feed a chunk of PTY output through the interpreter. Bytes are applied
    /// in order; partial UTF-8 and escape sequences carry over to the next
    /// chunk.
    pub fn process(&mut self, bytes: &[u8]) {
        let Self {
            parser,
            grid,
            alt_grid,
            active_is_alt,
            mode,
            charset,
            cursor_style,
            title,
            cwd,
            saved_region,
            saved_modes,
            termcap_query,
            writer,
        } = self;
        let mut performer = Performer {
            grid,
            alt_grid,
            active_is_alt,
            mode,
            charset,
            cursor_style,
            title,
            cwd,
            saved_region,
            saved_modes,
            termcap_query,
            writer,
        };
        parser.advance(&mut performer, bytes);
    }

    /// The active screen grid.
    pub fn grid(&self) -> &Grid {
        if self.active_is_alt { &self.alt_grid } else { &self.grid }
    }

    /// Mutable access to the active screen grid.
    pub fn grid_mut(&mut self) -> &mut Grid {
        if self.active_is_alt { &mut self.alt_grid } else { &mut self.grid }
    }

    /// Resize both screens; the PTY winsize update is the caller's job.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.grid.resize(cols, rows);
        self.alt_grid.resize(cols, rows);
    }

    pub fn mode(&self) -> TermMode {
        self.mode
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.mode.contains(TermMode::SHOW_CURSOR)
    }

    pub fn cursor_style(&self) -> CursorStyle {
        self.cursor_style
    }

    pub fn app_cursor_keys(&self) -> bool {
        self.mode.contains(TermMode::APP_CURSOR)
    }

    pub fn bracketed_paste_enabled(&self) -> bool {
        self.mode.contains(TermMode::BRACKETED_PASTE)
    }

    pub fn mouse_sgr_enabled(&self) -> bool {
        self.mode.contains(TermMode::SGR_MOUSE)
    }

    pub fn is_alt_screen(&self) -> bool {
        self.active_is_alt
    }

    pub fn window_title(&self) -> &str {
        &self.title
    }

    /// Working directory reported by the shell via OSC 7.
    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Cursor position on the active screen, (col, row).
    pub fn cursor_pos(&self) -> (usize, usize) {
        let grid = self.grid();
        (grid.cursor.col, grid.cursor.row)
    }

    // Snapshot and view delegation for the renderer.

    pub fn display_cell(&self, col: usize, row: usize) -> Cell {
        self.grid().display_cell(col, row)
    }

    pub fn visible_text(&self) -> String {
        self.grid().visible_text()
    }

    pub fn scroll_view_up(&mut self, n: usize) {
        self.grid_mut().scroll_view_up(n);
    }

    pub fn scroll_view_down(&mut self, n: usize) {
        self.grid_mut().scroll_view_down(n);
    }

    pub fn reset_scroll_offset(&mut self) {
        self.grid_mut().reset_scroll_offset();
    }

    pub fn scroll_offset(&self) -> usize {
        self.grid().scroll_offset()
    }

    pub fn set_selection(&mut self, start_col: usize, start_row: usize, end_col: usize, end_row: usize) {
        self.grid_mut().set_selection(start_col, start_row, end_col, end_row);
    }

    pub fn clear_selection(&mut self) {
        self.grid_mut().clear_selection();
    }

    pub fn has_selection(&self) -> bool {
        self.grid().has_selection()
    }

    pub fn is_selected(&self, col: usize, row: usize) -> bool {
        self.grid().is_selected(col, row)
    }

    pub fn selected_text(&self) -> String {
        self.grid().selected_text()
    }
}

impl std::fmt::Debug for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Term")
            .field("cols", &self.grid.cols)
            .field("lines", &self.grid.lines)
            .field("active_is_alt", &self.active_is_alt)
            .field("mode", &self.mode)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}
