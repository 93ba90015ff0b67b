//! Grid behavior tests: writing, wrapping, wide characters, BCE, regions,
//! scrollback, viewport, and selection.

use crate::cell::{Cell, CellFlags, Color};

use super::Grid;

fn grid() -> Grid {
    Grid::new(80, 24)
}

fn small() -> Grid {
    Grid::new(10, 4)
}

fn write_str(grid: &mut Grid, s: &str) {
    for c in s.chars() {
        grid.put_char(c);
    }
}

// --- writing and pending wrap ---

#[test]
fn put_char_places_and_advances() {
    let mut g = grid();
    write_str(&mut g, "hi");
    assert_eq!(g.row(0)[0].c, 'h');
    assert_eq!(g.row(0)[1].c, 'i');
    assert_eq!(g.cursor.col, 2);
    assert_eq!(g.cursor.row, 0);
}

#[test]
fn put_char_uses_template_attrs() {
    let mut g = grid();
    g.cursor.template.fg = Color::Indexed(1);
    g.cursor.template.bg = Color::Indexed(4);
    g.cursor.template.flags = CellFlags::BOLD;
    g.put_char('x');
    let cell = &g.row(0)[0];
    assert_eq!(cell.fg, Color::Indexed(1));
    assert_eq!(cell.bg, Color::Indexed(4));
    assert!(cell.flags.contains(CellFlags::BOLD));
}

#[test]
fn write_at_last_column_sets_pending_wrap() {
    let mut g = small();
    g.goto(0, 9);
    g.put_char('x');
    assert_eq!(g.cursor.col, 9);
    assert!(g.cursor.input_needs_wrap);
    assert_eq!(g.row(0)[9].c, 'x');
}

#[test]
fn pending_wrap_defers_until_next_printable() {
    let mut g = small();
    g.goto(0, 9);
    g.put_char('x');
    // Still on row 0 until the next printable arrives.
    assert_eq!(g.cursor.row, 0);
    g.put_char('y');
    assert_eq!(g.cursor.row, 1);
    assert_eq!(g.row(1)[0].c, 'y');
    assert_eq!(g.cursor.col, 1);
}

#[test]
fn motion_clears_pending_wrap() {
    let mut g = small();
    g.goto(0, 9);
    g.put_char('x');
    assert!(g.cursor.input_needs_wrap);
    g.move_backward(1);
    assert!(!g.cursor.input_needs_wrap);
    g.put_char('y');
    // No wrap happened; 'y' overwrote in place.
    assert_eq!(g.cursor.row, 0);
    assert_eq!(g.row(0)[8].c, 'y');
}

#[test]
fn auto_wrap_off_overwrites_last_column() {
    let mut g = small();
    g.auto_wrap = false;
    g.goto(0, 8);
    write_str(&mut g, "abcd");
    assert_eq!(g.cursor.row, 0);
    assert_eq!(g.cursor.col, 9);
    assert!(!g.cursor.input_needs_wrap);
    // Successive prints land on the last column in place.
    assert_eq!(g.row(0)[8].c, 'a');
    assert_eq!(g.row(0)[9].c, 'd');
}

#[test]
fn backspace_stays_on_cell() {
    let mut g = grid();
    g.put_char('a');
    g.backspace();
    assert_eq!(g.cursor.col, 0);
    assert_eq!(g.row(0)[0].c, 'a');
}

#[test]
fn tab_advances_to_eight_column_stops() {
    let mut g = grid();
    g.tab();
    assert_eq!(g.cursor.col, 8);
    g.put_char('x');
    g.tab();
    assert_eq!(g.cursor.col, 16);
    // Clamped at the final column.
    g.goto(0, 76);
    g.tab();
    assert_eq!(g.cursor.col, 79);
}

// --- wide characters ---

#[test]
fn wide_char_occupies_pair_with_matching_style() {
    let mut g = grid();
    g.cursor.template.bg = Color::Indexed(2);
    g.put_wide_char('好');
    let lead = &g.row(0)[0];
    let spacer = &g.row(0)[1];
    assert_eq!(lead.c, '好');
    assert!(lead.is_wide());
    assert!(spacer.is_wide_spacer());
    assert_eq!(spacer.bg, lead.bg);
    assert_eq!(spacer.fg, lead.fg);
    assert_eq!(g.cursor.col, 2);
}

#[test]
fn wide_char_at_last_column_pads_and_wraps() {
    let mut g = small();
    g.cursor.template.bg = Color::Indexed(3);
    g.goto(0, 9);
    g.put_wide_char('好');
    // Final column became a blank carrying the bg; the glyph moved down.
    let pad = &g.row(0)[9];
    assert_eq!(pad.c, ' ');
    assert_eq!(pad.bg, Color::Indexed(3));
    assert!(!pad.is_wide());
    assert!(g.row(1)[0].is_wide());
    assert!(g.row(1)[1].is_wide_spacer());
    assert_eq!(g.cursor.row, 1);
    assert_eq!(g.cursor.col, 2);
}

#[test]
fn overwriting_lead_clears_the_spacer() {
    let mut g = grid();
    g.put_wide_char('好');
    g.goto(0, 0);
    g.put_char('x');
    assert_eq!(g.row(0)[0].c, 'x');
    assert!(!g.row(0)[0].is_wide());
    assert!(!g.row(0)[1].is_wide_spacer());
}

#[test]
fn wide_write_over_following_pair_clears_it() {
    let mut g = grid();
    g.goto(0, 1);
    g.put_wide_char('好');
    g.goto(0, 0);
    g.put_wide_char('字');
    // New pair at 0..2; the old lead at 1 is gone and its spacer at 2 was
    // replaced by the new spacer.
    assert_eq!(g.row(0)[0].c, '字');
    assert!(g.row(0)[1].is_wide_spacer());
    assert!(!g.row(0)[2].is_wide_spacer());
    assert_eq!(g.row(0)[2].c, ' ');
}

#[test]
fn motion_onto_spacer_snaps_to_lead() {
    let mut g = grid();
    g.put_wide_char('好');
    g.goto(0, 1);
    assert_eq!(g.cursor.col, 0);
}

#[test]
fn backspace_from_after_wide_lands_on_lead() {
    let mut g = grid();
    g.put_wide_char('好');
    assert_eq!(g.cursor.col, 2);
    g.backspace();
    // Column 1 holds the spacer; the cursor lands on the lead at 0.
    assert_eq!(g.cursor.col, 0);
}

#[test]
fn delete_chars_landing_inside_wide_pair_clears_glyph() {
    let mut g = grid();
    write_str(&mut g, "ab");
    g.put_wide_char('好');
    g.goto(0, 0);
    // Shift source starts at column 3 = the spacer of the pair at 2..4.
    g.delete_chars(3);
    for col in 0..4 {
        assert!(!g.row(0)[col].is_wide(), "col {col} still wide");
        assert!(!g.row(0)[col].is_wide_spacer(), "col {col} still spacer");
    }
}

#[test]
fn insert_chars_pushing_wide_off_edge_clears_lead() {
    let mut g = small();
    g.goto(0, 7);
    g.put_wide_char('好');
    g.goto(0, 0);
    g.insert_blank_chars(2);
    // The spacer fell off the edge; the lead shifted to the last column
    // must not survive alone.
    assert!(!g.row(0)[9].is_wide());
    assert_eq!(g.row(0)[9].c, ' ');
}

// --- REP ---

#[test]
fn repeat_last_replays_char_and_attrs() {
    let mut g = grid();
    g.cursor.template.fg = Color::Indexed(5);
    g.put_char('z');
    g.cursor.template.fg = Color::Indexed(2);
    g.repeat_last(3);
    for col in 1..4 {
        assert_eq!(g.row(0)[col].c, 'z');
        assert_eq!(g.row(0)[col].fg, Color::Indexed(5));
    }
    // The live template is untouched by the replay.
    assert_eq!(g.cursor.template.fg, Color::Indexed(2));
}

#[test]
fn repeat_last_without_prior_write_is_noop() {
    let mut g = grid();
    g.repeat_last(5);
    assert_eq!(g.cursor.col, 0);
    assert_eq!(g.row(0)[0].c, ' ');
}

#[test]
fn repeat_last_wraps_like_writes() {
    let mut g = small();
    g.goto(0, 8);
    g.put_char('w');
    g.repeat_last(3);
    assert_eq!(g.row(0)[9].c, 'w');
    assert_eq!(g.row(1)[0].c, 'w');
    assert_eq!(g.row(1)[1].c, 'w');
}

// --- erase and BCE ---

#[test]
fn clear_line_to_end_uses_erase_bg() {
    let mut g = grid();
    write_str(&mut g, "hello");
    g.cursor.template.bg = Color::Indexed(4);
    g.goto(0, 2);
    g.clear_line_to_end();
    assert_eq!(g.row(0)[1].c, 'e');
    for col in 2..80 {
        assert_eq!(g.row(0)[col].c, ' ');
        assert_eq!(g.row(0)[col].bg, Color::Indexed(4));
        assert_eq!(g.row(0)[col].fg, Color::Default);
        assert!(g.row(0)[col].flags.is_empty());
    }
}

#[test]
fn clear_below_spans_cursor_line_and_rest() {
    let mut g = small();
    for row in 0..4 {
        g.goto(row, 0);
        write_str(&mut g, "xxxxxxxxxx");
    }
    g.goto(1, 4);
    g.clear_below();
    assert_eq!(g.row(0)[9].c, 'x');
    assert_eq!(g.row(1)[3].c, 'x');
    assert_eq!(g.row(1)[4].c, ' ');
    assert_eq!(g.row(2)[0].c, ' ');
    assert_eq!(g.row(3)[9].c, ' ');
}

#[test]
fn clear_above_spans_start_through_cursor() {
    let mut g = small();
    for row in 0..4 {
        g.goto(row, 0);
        write_str(&mut g, "xxxxxxxxxx");
    }
    g.goto(2, 4);
    g.clear_above();
    assert_eq!(g.row(0)[0].c, ' ');
    assert_eq!(g.row(2)[4].c, ' ');
    assert_eq!(g.row(2)[5].c, 'x');
    assert_eq!(g.row(3)[0].c, 'x');
}

#[test]
fn erase_chars_blanks_in_place() {
    let mut g = grid();
    write_str(&mut g, "abcdef");
    g.goto(0, 1);
    g.erase_chars(3);
    assert_eq!(g.row(0)[0].c, 'a');
    assert_eq!(g.row(0)[1].c, ' ');
    assert_eq!(g.row(0)[3].c, ' ');
    assert_eq!(g.row(0)[4].c, 'e');
    // In place: nothing shifted.
    assert_eq!(g.row(0)[5].c, 'f');
}

#[test]
fn insert_blank_chars_shifts_right() {
    let mut g = grid();
    write_str(&mut g, "abc");
    g.goto(0, 1);
    g.insert_blank_chars(2);
    assert_eq!(g.row(0)[0].c, 'a');
    assert_eq!(g.row(0)[1].c, ' ');
    assert_eq!(g.row(0)[2].c, ' ');
    assert_eq!(g.row(0)[3].c, 'b');
    assert_eq!(g.row(0)[4].c, 'c');
}

#[test]
fn delete_chars_shifts_left_and_backfills() {
    let mut g = small();
    write_str(&mut g, "abcdefghij");
    g.cursor.template.bg = Color::Indexed(1);
    g.goto(0, 2);
    g.delete_chars(3);
    assert_eq!(g.row(0)[2].c, 'f');
    assert_eq!(g.row(0)[6].c, 'j');
    for col in 7..10 {
        assert_eq!(g.row(0)[col].c, ' ');
        assert_eq!(g.row(0)[col].bg, Color::Indexed(1));
    }
}

// --- lines and scroll regions ---

#[test]
fn linefeed_scrolls_at_bottom_into_scrollback() {
    let mut g = small();
    write_str(&mut g, "top");
    g.goto(3, 0);
    g.linefeed();
    assert_eq!(g.cursor.row, 3);
    assert_eq!(g.scrollback.len(), 1);
    assert_eq!(g.scrollback[0].text(), "top");
    assert_eq!(g.row(0)[0].c, ' ');
}

#[test]
fn linefeed_inside_region_does_not_touch_scrollback() {
    let mut g = small();
    g.set_scroll_region(1, 2);
    g.goto(1, 0);
    write_str(&mut g, "keep");
    g.goto(2, 0);
    g.linefeed();
    assert_eq!(g.scrollback.len(), 0);
    // Region scrolled: row 1 content moved up out of the region? No —
    // rows 1..=2 shifted up by one, so "keep" is gone and row 2 is blank.
    assert_eq!(g.row(1)[0].c, ' ');
    assert_eq!(g.cursor.row, 2);
}

#[test]
fn linefeed_below_region_at_screen_bottom_scrolls_screen() {
    let mut g = small();
    g.set_scroll_region(0, 1);
    g.goto(0, 0);
    write_str(&mut g, "first");
    g.goto(3, 0);
    g.linefeed();
    // Whole screen scrolled and the top row entered scrollback.
    assert_eq!(g.scrollback.len(), 1);
    assert_eq!(g.scrollback[0].text(), "first");
}

#[test]
fn insert_lines_confined_to_region() {
    let mut g = small();
    for row in 0..4 {
        g.goto(row, 0);
        g.put_char((b'a' + row as u8) as char);
    }
    g.set_scroll_region(1, 2);
    g.goto(1, 0);
    g.insert_lines(5);
    // Clamped to the region: rows 1..=2 are blank, row 3 untouched.
    assert_eq!(g.row(0)[0].c, 'a');
    assert_eq!(g.row(1)[0].c, ' ');
    assert_eq!(g.row(2)[0].c, ' ');
    assert_eq!(g.row(3)[0].c, 'd');
}

#[test]
fn insert_lines_outside_region_ignored() {
    let mut g = small();
    g.goto(3, 0);
    g.put_char('d');
    g.set_scroll_region(0, 1);
    g.goto(3, 0);
    g.insert_lines(1);
    assert_eq!(g.row(3)[0].c, 'd');
}

#[test]
fn delete_lines_pulls_up_within_region() {
    let mut g = small();
    for row in 0..4 {
        g.goto(row, 0);
        g.put_char((b'a' + row as u8) as char);
    }
    g.set_scroll_region(1, 3);
    g.goto(1, 0);
    g.delete_lines(1);
    assert_eq!(g.row(0)[0].c, 'a');
    assert_eq!(g.row(1)[0].c, 'c');
    assert_eq!(g.row(2)[0].c, 'd');
    assert_eq!(g.row(3)[0].c, ' ');
}

#[test]
fn scroll_down_fills_top_with_bce() {
    let mut g = small();
    write_str(&mut g, "gone");
    g.cursor.template.bg = Color::Indexed(6);
    g.scroll_down(1);
    assert_eq!(g.row(0)[0].c, ' ');
    assert_eq!(g.row(0)[0].bg, Color::Indexed(6));
    assert_eq!(g.row(1)[0].c, 'g');
}

#[test]
fn region_scroll_with_offset_top_skips_scrollback() {
    let mut g = small();
    g.set_scroll_region(1, 3);
    g.goto(1, 0);
    write_str(&mut g, "mid");
    g.scroll_up(1);
    assert_eq!(g.scrollback.len(), 0);
}

#[test]
fn scrollback_caps_and_evicts_oldest() {
    let mut g = Grid::with_max_scrollback(4, 2, 3);
    for i in 0..6u8 {
        g.goto(1, 0);
        g.put_char(char::from(b'0' + i));
        g.linefeed();
    }
    assert_eq!(g.scrollback.len(), 3);
    // Oldest rows were evicted.
    assert!(g.scrollback[0].text() != "0");
}

#[test]
fn reverse_index_at_region_top_scrolls_down() {
    let mut g = small();
    write_str(&mut g, "down");
    g.goto(0, 0);
    g.reverse_index();
    assert_eq!(g.row(1)[0].c, 'd');
    assert_eq!(g.row(0)[0].c, ' ');
    assert_eq!(g.cursor.row, 0);
}

// --- cursor save/restore ---

#[test]
fn save_restore_round_trips_position_and_attrs() {
    let mut g = grid();
    g.goto(5, 7);
    g.cursor.template.fg = Color::Indexed(3);
    g.cursor.template.flags = CellFlags::ITALIC;
    g.save_cursor();
    g.goto(0, 0);
    g.cursor.reset_attrs();
    g.restore_cursor();
    assert_eq!(g.cursor.row, 5);
    assert_eq!(g.cursor.col, 7);
    assert_eq!(g.cursor.template.fg, Color::Indexed(3));
    assert!(g.cursor.template.flags.contains(CellFlags::ITALIC));
}

#[test]
fn restore_clamps_to_current_bounds() {
    let mut g = grid();
    g.goto(20, 70);
    g.save_cursor();
    g.resize(10, 5);
    g.restore_cursor();
    assert!(g.cursor.row < 5);
    assert!(g.cursor.col < 10);
}

// --- resize ---

#[test]
fn resize_preserves_overlap_and_clamps_cursor() {
    let mut g = grid();
    write_str(&mut g, "keep");
    g.goto(0, 79);
    g.put_char('x');
    assert!(g.cursor.input_needs_wrap);
    g.resize(4, 2);
    assert_eq!(g.row(0)[0].c, 'k');
    assert_eq!(g.row(0)[3].c, 'p');
    assert!(g.cursor.col < 4);
    assert!(g.cursor.row < 2);
    assert!(!g.cursor.input_needs_wrap);
}

#[test]
fn resize_fills_new_cells_with_erase_bg() {
    let mut g = small();
    g.cursor.template.bg = Color::Indexed(5);
    g.resize(12, 6);
    assert_eq!(g.row(5)[11].bg, Color::Indexed(5));
    assert_eq!(g.row(0)[11].bg, Color::Indexed(5));
}

#[test]
fn resize_resets_invalid_region_keeps_valid() {
    let mut g = grid();
    g.set_scroll_region(2, 10);
    g.resize(80, 12);
    // Still valid: preserved.
    assert_eq!(g.scroll_top(), 2);
    assert_eq!(g.scroll_bottom(), 10);
    g.resize(80, 8);
    // Bottom no longer fits: reset to full screen.
    assert_eq!(g.scroll_top(), 0);
    assert_eq!(g.scroll_bottom(), 7);
}

#[test]
fn resize_splitting_wide_pair_blanks_lead() {
    let mut g = small();
    g.goto(0, 4);
    g.put_wide_char('好');
    g.resize(5, 4);
    // Columns 4..5: the lead would sit on the new edge without a spacer.
    assert!(!g.row(0)[4].is_wide());
}

// --- viewport and selection ---

#[test]
fn scroll_view_clamps_to_scrollback() {
    let mut g = small();
    for _ in 0..3 {
        g.goto(3, 0);
        g.linefeed();
    }
    assert_eq!(g.scrollback.len(), 3);
    g.scroll_view_up(99);
    assert_eq!(g.scroll_offset(), 3);
    g.scroll_view_down(1);
    assert_eq!(g.scroll_offset(), 2);
    g.reset_scroll_offset();
    assert_eq!(g.scroll_offset(), 0);
}

#[test]
fn display_cell_reads_scrollback_when_offset() {
    let mut g = small();
    g.goto(0, 0);
    write_str(&mut g, "old");
    for _ in 0..4 {
        g.goto(3, 0);
        g.linefeed();
    }
    assert!(g.scrollback.len() >= 4);
    g.scroll_view_up(4);
    assert_eq!(g.display_cell(0, 0).c, 'o');
    assert_eq!(g.display_cell(1, 0).c, 'l');
}

#[test]
fn display_offset_anchors_while_output_scrolls() {
    let mut g = small();
    g.goto(3, 0);
    g.linefeed();
    g.scroll_view_up(1);
    let offset = g.scroll_offset();
    g.goto(3, 0);
    g.linefeed();
    // New scrollback row: the view keeps pointing at the same content.
    assert_eq!(g.scroll_offset(), offset + 1);
}

#[test]
fn selection_anchor_tracks_view_scrolling() {
    let mut g = small();
    for _ in 0..3 {
        g.goto(3, 0);
        g.linefeed();
    }
    g.set_selection(0, 1, 5, 1);
    g.scroll_view_up(2);
    let sel = g.selection.expect("selection active");
    assert_eq!(sel.start_row, 3);
    assert_eq!(sel.captured_offset, 2);
    // Captured offset followed the view, so the selection still displays.
    assert!(g.is_selected(3, 2));
    g.scroll_view_down(1);
    let sel = g.selection.expect("selection active");
    assert_eq!(sel.start_row, 2);
    assert_eq!(sel.captured_offset, 1);
}

#[test]
fn selection_invalid_after_offset_divergence() {
    let mut g = small();
    g.goto(3, 0);
    g.linefeed();
    g.scroll_view_up(1);
    g.set_selection(0, 0, 5, 0);
    assert!(g.is_selected(2, 0));
    g.reset_scroll_offset();
    // Offset no longer matches the captured one.
    assert!(!g.is_selected(2, 0));
    assert_eq!(g.selected_text(), "");
    // The selection itself was not mutated.
    assert!(g.has_selection());
}

#[test]
fn selected_text_trims_trailing_blanks() {
    let mut g = small();
    write_str(&mut g, "ab");
    g.goto(1, 0);
    write_str(&mut g, "cdef");
    g.set_selection(0, 0, 9, 1);
    assert_eq!(g.selected_text(), "ab\ncdef");
}

#[test]
fn selected_text_skips_wide_spacers() {
    let mut g = small();
    g.put_wide_char('好');
    g.put_char('x');
    g.set_selection(0, 0, 3, 0);
    assert_eq!(g.selected_text(), "好x");
}

#[test]
fn visible_text_right_trims_each_line() {
    let mut g = small();
    write_str(&mut g, "hi");
    assert_eq!(g.visible_text(), "hi\n\n\n");
}

// --- invariants after a workload ---

#[test]
fn wide_invariant_holds_after_mixed_operations() {
    let mut g = small();
    for i in 0..20 {
        g.put_wide_char('好');
        g.put_char('a');
        if i % 3 == 0 {
            g.goto(i % 4, i % 10);
            g.insert_blank_chars(1);
        }
        if i % 4 == 0 {
            g.delete_chars(2);
        }
        if i % 5 == 0 {
            g.linefeed();
        }
    }
    for row in 0..g.lines {
        for col in 0..g.cols {
            let cell = &g.row(row)[col];
            if cell.is_wide() {
                assert!(col + 1 < g.cols, "wide lead at right edge ({row},{col})");
                assert!(
                    g.row(row)[col + 1].is_wide_spacer(),
                    "wide lead without spacer at ({row},{col})"
                );
            }
            if cell.is_wide_spacer() {
                assert!(col > 0 && g.row(row)[col - 1].is_wide(),
                    "orphan spacer at ({row},{col})");
            }
        }
        assert!(g.cursor.col < g.cols);
        assert!(g.cursor.row < g.lines);
    }
}

#[test]
fn erase_cell_follows_template_bg() {
    let mut g = grid();
    assert_eq!(g.erase_bg(), Color::Default);
    g.cursor.template.bg = Color::Rgb { r: 1, g: 2, b: 3 };
    assert_eq!(g.erase_bg(), Color::Rgb { r: 1, g: 2, b: 3 });
    let blank = Cell::blank(g.erase_bg());
    assert_eq!(blank.bg, g.cursor.template.bg);
}
