//! Terminal mode flags toggled by DECSET/DECRST.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TermMode: u32 {
        const SHOW_CURSOR     = 1 << 0;
        const APP_CURSOR      = 1 << 1;
        const ORIGIN          = 1 << 2;
        const ALT_SCREEN      = 1 << 3;
        const MOUSE_REPORT    = 1 << 4;
        const MOUSE_MOTION    = 1 << 5;
        const MOUSE_ALL       = 1 << 6;
        const SGR_MOUSE       = 1 << 7;
        const BRACKETED_PASTE = 1 << 8;
    }
}

impl TermMode {
    /// The modes saved on alt-screen entry and restored on exit, so a TUI
    /// cannot leave the primary screen with its mouse/paste settings.
    pub const SAVED_ON_ALT: Self = Self::APP_CURSOR
        .union(Self::BRACKETED_PASTE)
        .union(Self::MOUSE_REPORT)
        .union(Self::MOUSE_MOTION)
        .union(Self::MOUSE_ALL)
        .union(Self::SGR_MOUSE);

    /// All three mouse tracking modes.
    pub const ANY_MOUSE: Self = Self::MOUSE_REPORT
        .union(Self::MOUSE_MOTION)
        .union(Self::MOUSE_ALL);
}

impl Default for TermMode {
    fn default() -> Self {
        Self::SHOW_CURSOR
    }
}
