//! Terminal grid cell representation with colors and attribute flags.

use bitflags::bitflags;

/// A cell color as written by SGR sequences.
///
/// `Default` stands for "whatever the theme says" and is resolved to a
/// concrete value only at render time, so theme switches restyle existing
/// content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Theme foreground/background, depending on position.
    #[default]
    Default,
    /// One of the 256 palette entries (0-15 ANSI, 16-231 cube, 232-255 gray).
    Indexed(u8),
    /// Direct 24-bit color from SGR 38;2 / 48;2.
    Rgb { r: u8, g: u8, b: u8 },
}

bitflags! {
    /// Bitflags for cell text attributes and layout hints.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u16 {
        const BOLD             = 0b0000_0000_0001;
        const DIM              = 0b0000_0000_0010;
        const ITALIC           = 0b0000_0000_0100;
        const UNDERLINE        = 0b0000_0000_1000;
        const INVERSE          = 0b0000_0001_0000;
        const HIDDEN           = 0b0000_0010_0000;
        const STRIKETHROUGH    = 0b0000_0100_0000;
        const WIDE_CHAR        = 0b0000_1000_0000;
        const WIDE_CHAR_SPACER = 0b0001_0000_0000;
    }
}

impl CellFlags {
    /// Mask of the layout flags that encode wide-character geometry.
    /// These never survive a cell reset; only styling flags do.
    pub const LAYOUT: Self = Self::WIDE_CHAR.union(Self::WIDE_CHAR_SPACER);
}

/// A single grid cell: one scalar plus its styling.
///
/// Wide characters occupy two adjacent cells: the first carries the scalar
/// with `WIDE_CHAR` set, the second is a spacer with `WIDE_CHAR_SPACER`
/// and identical styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub c: char,
    pub fg: Color,
    pub bg: Color,
    pub flags: CellFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            c: ' ',
            fg: Color::Default,
            bg: Color::Default,
            flags: CellFlags::empty(),
        }
    }
}

impl Cell {
    /// A blank cell carrying an erase background.
    ///
    /// Everything produced by clears, scrolling, and resize fills goes
    /// through here so background-color-erase never leaks fg or attributes.
    pub fn blank(bg: Color) -> Self {
        Self {
            c: ' ',
            fg: Color::Default,
            bg,
            flags: CellFlags::empty(),
        }
    }

    /// Resets this cell to the template, dropping any layout flags.
    pub fn reset(&mut self, template: &Self) {
        self.c = template.c;
        self.fg = template.fg;
        self.bg = template.bg;
        self.flags = template.flags & !CellFlags::LAYOUT;
    }

    /// True for a wide-character lead cell.
    pub fn is_wide(&self) -> bool {
        self.flags.contains(CellFlags::WIDE_CHAR)
    }

    /// True for the placeholder cell following a wide character.
    pub fn is_wide_spacer(&self) -> bool {
        self.flags.contains(CellFlags::WIDE_CHAR_SPACER)
    }
}
