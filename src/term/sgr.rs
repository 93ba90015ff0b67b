//! SGR attribute runs, including ISO 8613-6 extended colors.

use crate::cell::{CellFlags, Color};

use super::performer::Performer;

impl Performer<'_> {
    /// Apply an SGR parameter list to the active grid's cursor template.
    /// The template bg doubles as the BCE color, so every completed run
    /// leaves the erase background in sync.
    pub(super) fn apply_sgr(&mut self, params: &vte::Params) {
        let groups: Vec<&[u16]> = params.iter().collect();
        let template = &mut self.active_grid().cursor.template;

        if groups.is_empty() {
            *template = crate::cell::Cell::default();
            return;
        }

        let mut i = 0;
        while i < groups.len() {
            let group = groups[i];
            let code = group.first().copied().unwrap_or(0);
            match code {
                0 => *template = crate::cell::Cell::default(),
                1 => template.flags.insert(CellFlags::BOLD),
                2 => template.flags.insert(CellFlags::DIM),
                3 => template.flags.insert(CellFlags::ITALIC),
                4 => template.flags.insert(CellFlags::UNDERLINE),
                7 => template.flags.insert(CellFlags::INVERSE),
                8 => template.flags.insert(CellFlags::HIDDEN),
                9 => template.flags.insert(CellFlags::STRIKETHROUGH),
                22 => template.flags.remove(CellFlags::BOLD | CellFlags::DIM),
                23 => template.flags.remove(CellFlags::ITALIC),
                24 => template.flags.remove(CellFlags::UNDERLINE),
                27 => template.flags.remove(CellFlags::INVERSE),
                28 => template.flags.remove(CellFlags::HIDDEN),
                29 => template.flags.remove(CellFlags::STRIKETHROUGH),
                30..=37 => template.fg = Color::Indexed((code - 30) as u8),
                38 => {
                    let (color, consumed) = extended_color(&groups, i);
                    if let Some(color) = color {
                        template.fg = color;
                    }
                    i += consumed;
                    continue;
                }
                39 => template.fg = Color::Default,
                40..=47 => template.bg = Color::Indexed((code - 40) as u8),
                48 => {
                    let (color, consumed) = extended_color(&groups, i);
                    if let Some(color) = color {
                        template.bg = color;
                    }
                    i += consumed;
                    continue;
                }
                49 => template.bg = Color::Default,
                90..=97 => template.fg = Color::Indexed((code - 90 + 8) as u8),
                100..=107 => template.bg = Color::Indexed((code - 100 + 8) as u8),
                // Underline color (58/59) and less common attributes are
                // accepted and dropped.
                58 => {
                    let (_, consumed) = extended_color(&groups, i);
                    i += consumed;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }
    }
}

/// Parse an extended color starting at the 38/48/58 introducer.
///
/// Handles both encodings: colon sub-parameters keep everything in one
/// group (`38:2:R:G:B`, optionally with a color-space id), the legacy
/// semicolon form spreads the values over the following groups
/// (`38;2;R;G;B`). Returns the color and how many groups were consumed.
fn extended_color(groups: &[&[u16]], at: usize) -> (Option<Color>, usize) {
    let group = groups[at];

    if group.len() > 1 {
        // Colon form: all values in this one group.
        let color = match group[1] {
            5 => group.get(2).map(|&idx| Color::Indexed(idx as u8)),
            2 => {
                // A 6-element group carries a color-space id before RGB.
                let rgb = if group.len() >= 6 { &group[3..6] } else { group.get(2..5).unwrap_or(&[]) };
                match rgb {
                    &[r, g, b] => Some(Color::Rgb { r: r as u8, g: g as u8, b: b as u8 }),
                    _ => None,
                }
            }
            _ => None,
        };
        return (color, 1);
    }

    // Semicolon form: values follow as separate groups.
    let kind = groups.get(at + 1).and_then(|g| g.first().copied());
    match kind {
        Some(5) => {
            let idx = groups.get(at + 2).and_then(|g| g.first().copied());
            (idx.map(|idx| Color::Indexed(idx as u8)), 3)
        }
        Some(2) => {
            let r = groups.get(at + 2).and_then(|g| g.first().copied());
            let g = groups.get(at + 3).and_then(|g| g.first().copied());
            let b = groups.get(at + 4).and_then(|g| g.first().copied());
            match (r, g, b) {
                (Some(r), Some(g), Some(b)) => (
                    Some(Color::Rgb { r: r as u8, g: g as u8, b: b as u8 }),
                    5,
                ),
                _ => (None, 5),
            }
        }
        _ => (None, 1),
    }
}
