//! Terminal core for the Raven terminal emulator.
//!
//! This crate turns raw PTY output into a structured, styled character grid
//! and multiplexes several such interpreters across tabs and nested split
//! panes. It contains no rendering, windowing, or platform UI code; the
//! renderer and input translator consume the contracts exposed here.

pub mod cell;
pub mod charset;
pub mod grid;
pub mod pane;
pub mod pty;
pub mod selection;
pub mod tab;
pub mod term;
pub mod term_mode;

pub use cell::{Cell, CellFlags, Color};
pub use grid::Grid;
pub use pane::{Pane, PaneId};
pub use pty::{PtyConfig, PtySession};
pub use selection::Selection;
pub use tab::{NodeId, PaneLayout, SplitDir, Tab, TabId, TabManager};
pub use term::{CursorStyle, MouseMode, Term};
pub use term_mode::TermMode;
